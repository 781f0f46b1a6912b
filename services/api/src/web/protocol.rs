//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API
//! server for a quiz playthrough.

use quiz_core::{
    domain::{AnswerRecord, HighScoreEntry, QuizConfig, QuizSummary, SourceKind},
    session::QuestionView,
};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Loads questions and starts a session. Without `config` the saved settings
    /// are used; with it, the (clamped) config is saved first.
    Start {
        #[serde(default)]
        config: Option<QuizConfig>,
    },

    /// Changes the pending selection for the current question.
    Select { index: usize },

    /// Commits the pending selection.
    Lock,

    /// Commits the current question with no answer.
    Skip,

    /// Goes back one question to revise its answer.
    Previous,

    /// Reloads questions with the same config after a load failure.
    Retry,

    /// Discards the current session and returns to configuration.
    Abandon,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Questions are being fetched.
    Loading,

    /// Questions are loaded and the first one follows.
    Ready {
        total: usize,
        served_by: SourceKind,
        fell_back: bool,
    },

    /// The full state of the current question. Sent on entering a question and
    /// whenever the client needs to redraw it.
    Question { view: QuestionView },

    /// One second of the countdown elapsed.
    Tick { remaining: u32 },

    /// The pending selection changed.
    Selected { index: usize },

    /// The current question was committed; correctness can be shown.
    Revealed { record: AnswerRecord, timed_out: bool },

    /// The session finished.
    Completed {
        summary: QuizSummary,
        high_scores: Vec<HighScoreEntry>,
    },

    /// Loading failed on every permitted source. `retry` or `abandon` may follow.
    LoadFailed { reason: String },

    /// The session was discarded at the client's request.
    SessionDiscarded,

    /// Reports a protocol error, e.g. a message that does not apply right now.
    Error { message: String },
}
