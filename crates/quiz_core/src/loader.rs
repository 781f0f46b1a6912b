//! crates/quiz_core/src/loader.rs
//!
//! Loads the question list for a session, applying the single local fallback
//! when the remote source fails.

use crate::domain::{Question, QuizConfig, SourceKind};
use crate::ports::{PortError, PortResult, QuestionSource};
use std::sync::Arc;
use tracing::{info, warn};

/// A terminal load failure. No session is started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct LoadError {
    pub reason: String,
}

/// The questions for one session and where they came from.
#[derive(Debug, Clone)]
pub struct LoadedQuestions {
    pub questions: Vec<Question>,
    pub served_by: SourceKind,
    pub fell_back: bool,
}

pub struct QuestionLoader {
    remote: Arc<dyn QuestionSource>,
    local: Arc<dyn QuestionSource>,
}

impl QuestionLoader {
    pub fn new(remote: Arc<dyn QuestionSource>, local: Arc<dyn QuestionSource>) -> Self {
        Self { remote, local }
    }

    pub async fn load(&self, config: &QuizConfig) -> Result<LoadedQuestions, LoadError> {
        match config.source {
            SourceKind::Remote => match fetch_non_empty(self.remote.as_ref(), config).await {
                Ok(questions) => Ok(LoadedQuestions {
                    questions,
                    served_by: SourceKind::Remote,
                    fell_back: false,
                }),
                Err(e) => {
                    warn!("Remote question source failed ({}); falling back to local pool.", e);
                    fetch_non_empty(self.local.as_ref(), config)
                        .await
                        .map(|questions| LoadedQuestions {
                            questions,
                            served_by: SourceKind::Local,
                            fell_back: true,
                        })
                        .map_err(|e| {
                            warn!("Local fallback failed: {}", e);
                            LoadError {
                                reason: "Failed to load questions. Please try again.".to_string(),
                            }
                        })
                }
            },
            SourceKind::Local => fetch_non_empty(self.local.as_ref(), config)
                .await
                .map(|questions| LoadedQuestions {
                    questions,
                    served_by: SourceKind::Local,
                    fell_back: false,
                })
                .map_err(|e| {
                    warn!("Local question source failed: {}", e);
                    LoadError {
                        reason: "Failed to load local questions.".to_string(),
                    }
                }),
        }
    }
}

async fn fetch_non_empty(
    source: &dyn QuestionSource,
    config: &QuizConfig,
) -> PortResult<Vec<Question>> {
    let questions = source
        .fetch_questions(config.question_count, config.difficulty)
        .await?;
    if questions.is_empty() {
        return Err(PortError::EmptyResult);
    }
    if let Some(bad) = questions.iter().find_map(|q| q.validate().err()) {
        return Err(PortError::Format(bad));
    }
    info!(
        "Loaded {} question(s) from the {:?} source.",
        questions.len(),
        source.kind()
    );
    Ok(questions)
}
