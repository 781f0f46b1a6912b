pub mod domain;
pub mod high_scores;
pub mod loader;
pub mod local;
pub mod memory;
pub mod ports;
pub mod session;
pub mod settings;
pub mod shuffle;
pub mod trivia;

pub use domain::{
    AnswerRecord, Difficulty, DifficultyFilter, HighScoreEntry, Question, QuizConfig, QuizSummary,
    SourceKind,
};
pub use high_scores::HighScoreStore;
pub use loader::{LoadError, LoadedQuestions, QuestionLoader};
pub use ports::{KeyValueStore, PortError, PortResult, QuestionSource, Shuffler};
pub use session::{Phase, QuestionView, QuizSession, Transition};
pub use settings::SettingsStore;
