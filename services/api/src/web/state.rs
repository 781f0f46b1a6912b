//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quiz_core::{HighScoreStore, QuestionLoader, SettingsStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub loader: Arc<QuestionLoader>,
    pub settings: SettingsStore,
    pub high_scores: HighScoreStore,
}
