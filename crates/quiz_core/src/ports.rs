//! crates/quiz_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the quiz core.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the trivia HTTP API, the storage medium, and the RNG.

use crate::domain::{DifficultyFilter, Question, SourceKind};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Non-success HTTP status or a transport failure.
    #[error("Network error: {0}")]
    Network(String),
    /// The response body did not have the expected shape.
    #[error("Unexpected response format: {0}")]
    Format(String),
    /// Zero questions were available after filtering.
    #[error("No questions available")]
    EmptyResult,
    /// A persisted blob could not be parsed. Stores swallow this and treat it as absence.
    #[error("Stored data is corrupt: {0}")]
    StorageCorruption(String),
    /// The storage medium itself failed.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Which source this is; used for logging and the `ready` payload.
    fn kind(&self) -> SourceKind;

    /// Returns at most `count` normalised questions matching `difficulty`.
    async fn fetch_questions(
        &self,
        count: u32,
        difficulty: DifficultyFilter,
    ) -> PortResult<Vec<Question>>;
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw blob under `key`, `None` if absent.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    /// Persists `value` under `key`, replacing any previous blob.
    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// A source of uniformly random permutations.
pub trait Shuffler: Send + Sync {
    /// Returns a uniformly random permutation of `0..len`.
    fn permutation(&self, len: usize) -> Vec<usize>;
}
