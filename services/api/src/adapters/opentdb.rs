//! services/api/src/adapters/opentdb.rs
//!
//! This module contains the adapter for the Open Trivia DB HTTP API.
//! It implements the `QuestionSource` port from the `core` crate.

use async_trait::async_trait;
use quiz_core::{
    domain::{DifficultyFilter, Question, SourceKind},
    ports::{PortError, PortResult, QuestionSource, Shuffler},
    trivia::TriviaItem,
};
use reqwest::header::CACHE_CONTROL;
use std::sync::Arc;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `QuestionSource` port using the trivia HTTP API.
#[derive(Clone)]
pub struct OpenTdbAdapter {
    client: reqwest::Client,
    base_url: String,
    shuffler: Arc<dyn Shuffler>,
}

impl OpenTdbAdapter {
    /// Creates a new `OpenTdbAdapter`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, shuffler: Arc<dyn Shuffler>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            shuffler,
        }
    }
}

//=========================================================================================
// Response decoding
//=========================================================================================

/// Extracts the `results` array from a response body.
pub fn parse_results(body: &str) -> PortResult<Vec<TriviaItem>> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| PortError::Format(format!("body is not JSON: {}", e)))?;
    let results = value
        .get("results")
        .filter(|r| r.is_array())
        .cloned()
        .ok_or_else(|| PortError::Format("response has no `results` array".to_string()))?;
    serde_json::from_value(results).map_err(|e| PortError::Format(format!("malformed result: {}", e)))
}

/// The upstream HTML-encodes punctuation in every text field.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

//=========================================================================================
// `QuestionSource` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuestionSource for OpenTdbAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }

    async fn fetch_questions(
        &self,
        count: u32,
        difficulty: DifficultyFilter,
    ) -> PortResult<Vec<Question>> {
        let mut query = vec![
            ("amount", count.to_string()),
            ("type", "multiple".to_string()),
        ];
        if let Some(d) = difficulty.query_value() {
            query.push(("difficulty", d.to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .header(CACHE_CONTROL, "no-store")
            .query(&query)
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Network(format!("Network error {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        let items = parse_results(&body)?;
        debug!("Trivia API returned {} result(s).", items.len());

        Ok(items
            .into_iter()
            .take(count as usize)
            .map(|item| item.map_text(decode_entities).into_question(self.shuffler.as_ref()))
            .collect())
    }
}
