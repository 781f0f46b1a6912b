//! crates/quiz_core/src/domain.rs
//!
//! Defines the pure, core data structures for the quiz.
//! These types carry serde derives because both stores persist them as JSON
//! blobs and the service hands them to the client as-is.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Enumerations
//=========================================================================================

/// The difficulty label carried by a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Unknown => "unknown",
        }
    }

    /// Parses an upstream label; anything unrecognised becomes `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Unknown,
        }
    }
}

/// The difficulty the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    #[default]
    Any,
    Easy,
    Medium,
    Hard,
}

impl DifficultyFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// The value of the upstream `difficulty` query parameter, if any.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            other => Some(other.as_str()),
        }
    }

    pub fn matches(&self, difficulty: Difficulty) -> bool {
        match self {
            Self::Any => true,
            Self::Easy => difficulty == Difficulty::Easy,
            Self::Medium => difficulty == Difficulty::Medium,
            Self::Hard => difficulty == Difficulty::Hard,
        }
    }
}

/// Where questions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    #[serde(alias = "api")]
    Remote,
    Local,
}

//=========================================================================================
// Question
//=========================================================================================

/// A single normalised trivia item. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub category: String,
    pub difficulty: Difficulty,
}

impl Question {
    /// Checks the structural invariants: at least two options and a correct
    /// index that points into them.
    pub fn validate(&self) -> Result<(), String> {
        if self.options.len() < 2 {
            return Err(format!(
                "question '{}' has {} option(s), need at least 2",
                self.text,
                self.options.len()
            ));
        }
        if self.correct_index >= self.options.len() {
            return Err(format!(
                "question '{}' has correct index {} but only {} options",
                self.text,
                self.correct_index,
                self.options.len()
            ));
        }
        Ok(())
    }

    /// `None` only for a question that fails `validate`.
    pub fn correct_answer(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

//=========================================================================================
// QuizConfig
//=========================================================================================

pub const MIN_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 10;
pub const MIN_TIMER_SECS: u32 = 10;
pub const MAX_TIMER_SECS: u32 = 120;

/// User-chosen configuration. Read-only for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub source: SourceKind,
    pub question_count: u32,
    pub difficulty: DifficultyFilter,
    pub timer_secs: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Remote,
            question_count: 10,
            difficulty: DifficultyFilter::Any,
            timer_secs: 30,
        }
    }
}

impl QuizConfig {
    /// Applies the input rules: count into [5, 10], timer into [10, 120].
    /// Zero values (an empty input field) fall back to 5 questions and 30 seconds.
    pub fn clamped(self) -> Self {
        let question_count = if self.question_count == 0 {
            MIN_QUESTION_COUNT
        } else {
            self.question_count
                .clamp(MIN_QUESTION_COUNT, MAX_QUESTION_COUNT)
        };
        let timer_secs = if self.timer_secs == 0 {
            30
        } else {
            self.timer_secs.clamp(MIN_TIMER_SECS, MAX_TIMER_SECS)
        };
        Self {
            question_count,
            timer_secs,
            ..self
        }
    }
}

//=========================================================================================
// AnswerRecord
//=========================================================================================

/// The committed outcome for one question slot. Copies the question by value
/// so it outlives the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub selected_index: Option<usize>,
    pub is_correct: bool,
    pub category: String,
    pub difficulty: Difficulty,
}

impl AnswerRecord {
    pub fn new(question: &Question, selected_index: Option<usize>) -> Self {
        Self {
            question: question.text.clone(),
            options: question.options.clone(),
            correct_index: question.correct_index,
            selected_index,
            is_correct: selected_index == Some(question.correct_index),
            category: question.category.clone(),
            difficulty: question.difficulty,
        }
    }
}

//=========================================================================================
// Results
//=========================================================================================

/// The completion payload handed to the results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub answers: Vec<AnswerRecord>,
    pub correct: usize,
    pub total: usize,
    pub percent_correct: f64,
}

impl QuizSummary {
    pub fn from_answers(answers: Vec<AnswerRecord>, total: usize) -> Self {
        let correct = answers.iter().filter(|a| a.is_correct).count();
        let percent_correct = if total == 0 {
            0.0
        } else {
            100.0 * correct as f64 / total as f64
        };
        Self {
            answers,
            correct,
            total,
            percent_correct,
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub percent_correct: f64,
    pub question_count: u32,
    pub difficulty: String,
    pub mode: SourceKind,
    pub timestamp: String,
}

impl HighScoreEntry {
    /// Builds the entry emitted when a session completes. `mode` records the
    /// configured source, even when the local pool stood in for the remote one.
    pub fn from_summary(summary: &QuizSummary, config: &QuizConfig, now: DateTime<Utc>) -> Self {
        Self {
            percent_correct: summary.percent_correct,
            question_count: summary.total as u32,
            difficulty: config.difficulty.as_str().to_string(),
            mode: config.source,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
