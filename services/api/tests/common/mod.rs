#![allow(dead_code)]

use async_trait::async_trait;
use quiz_api_lib::{config::Config, web::state::AppState};
use quiz_core::{
    domain::{Difficulty, DifficultyFilter, Question, SourceKind},
    memory::InMemoryStore,
    ports::{PortError, PortResult, QuestionSource},
    HighScoreStore, QuestionLoader, SettingsStore,
};
use std::{sync::Arc, time::Duration};

/// A question whose first option is always the right one.
pub fn question(n: usize) -> Question {
    Question {
        text: format!("Question {}?", n),
        options: vec![
            format!("Right {}", n),
            format!("Wrong {}a", n),
            format!("Wrong {}b", n),
            format!("Wrong {}c", n),
        ],
        correct_index: 0,
        category: "General".to_string(),
        difficulty: Difficulty::Easy,
    }
}

/// Serves `count` numbered questions from a pool of ten.
pub struct FixedSource {
    pub kind: SourceKind,
}

#[async_trait]
impl QuestionSource for FixedSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch_questions(
        &self,
        count: u32,
        _difficulty: DifficultyFilter,
    ) -> PortResult<Vec<Question>> {
        Ok((0..10).take(count as usize).map(question).collect())
    }
}

/// Answers like `FixedSource`, but only after `delay`.
pub struct SlowSource {
    pub delay: Duration,
}

#[async_trait]
impl QuestionSource for SlowSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Local
    }

    async fn fetch_questions(
        &self,
        count: u32,
        _difficulty: DifficultyFilter,
    ) -> PortResult<Vec<Question>> {
        tokio::time::sleep(self.delay).await;
        Ok((0..10).take(count as usize).map(question).collect())
    }
}

pub struct FailingSource;

#[async_trait]
impl QuestionSource for FailingSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }

    async fn fetch_questions(
        &self,
        _count: u32,
        _difficulty: DifficultyFilter,
    ) -> PortResult<Vec<Question>> {
        Err(PortError::Network("Network error 500".to_string()))
    }
}

pub fn app_state_with(loader: QuestionLoader) -> Arc<AppState> {
    let kv = Arc::new(InMemoryStore::new());
    Arc::new(AppState {
        config: Arc::new(Config::default()),
        loader: Arc::new(loader),
        settings: SettingsStore::new(kv.clone()),
        high_scores: HighScoreStore::new(kv),
    })
}

/// Both sources answer with the fixed pool.
pub fn app_state() -> Arc<AppState> {
    app_state_with(QuestionLoader::new(
        Arc::new(FixedSource {
            kind: SourceKind::Remote,
        }),
        Arc::new(FixedSource {
            kind: SourceKind::Local,
        }),
    ))
}
