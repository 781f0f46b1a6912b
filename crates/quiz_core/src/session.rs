//! crates/quiz_core/src/session.rs
//!
//! The quiz session state machine.
//!
//! `QuizSession` owns no clock. The caller feeds it one `tick` per second while
//! a question is unanswered, forwards user input, and after a `Locked`
//! transition waits the reveal delay before calling `advance`. Every call
//! returns a `Transition` describing what changed, so the caller never has to
//! diff state to know what to render.

use crate::domain::{AnswerRecord, Question, QuizConfig, QuizSummary};
use serde::Serialize;
use std::time::Duration;

/// Time between a lock and the move to the next question.
pub const REVEAL_DELAY: Duration = Duration::from_millis(350);

/// Period of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("A session needs at least one question")]
    NoQuestions,
    #[error("Invalid question at position {index}: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

/// Per-question sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for an answer; the countdown runs.
    Unanswered,
    /// The answer is committed and an advance is pending. All input is ignored.
    Locked,
    /// The last question was advanced past.
    Completed,
}

/// What a single event did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The event does not apply in the current phase.
    Ignored,
    Ticked { remaining: u32 },
    Selected { index: usize },
    /// The current slot was recorded. The caller schedules `advance` after `REVEAL_DELAY`.
    Locked { record: AnswerRecord, timed_out: bool },
    Advanced { index: usize },
    Rewound { index: usize, restored: Option<usize> },
    Completed(QuizSummary),
}

/// The displayable state of the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<String>,
    pub category: String,
    pub selected: Option<usize>,
    pub time_remaining: u32,
    pub phase: Phase,
    /// Only revealed once the question is locked.
    pub correct_index: Option<usize>,
    pub can_go_back: bool,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    config: QuizConfig,
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<Option<AnswerRecord>>,
    pending: Option<usize>,
    time_remaining: u32,
    phase: Phase,
}

impl QuizSession {
    /// Builds a session positioned on the first question. Never produces a
    /// partially initialised session.
    pub fn new(questions: Vec<Question>, config: QuizConfig) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|reason| SessionError::InvalidQuestion { index, reason })?;
        }

        let answers = vec![None; questions.len()];
        Ok(Self {
            time_remaining: config.timer_secs,
            config,
            questions,
            current_index: 0,
            answers,
            pending: None,
            phase: Phase::Unanswered,
        })
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn pending_selection(&self) -> Option<usize> {
        self.pending
    }

    pub fn answer_at(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    /// True while the countdown should be running.
    pub fn is_timing(&self) -> bool {
        self.phase == Phase::Unanswered
    }

    pub fn view(&self) -> QuestionView {
        let question = self.current_question();
        QuestionView {
            index: self.current_index,
            total: self.total(),
            text: question.text.clone(),
            options: question.options.clone(),
            category: question.category.clone(),
            selected: self.pending,
            time_remaining: self.time_remaining,
            phase: self.phase,
            correct_index: (self.phase != Phase::Unanswered).then_some(question.correct_index),
            can_go_back: self.phase == Phase::Unanswered && self.current_index > 0,
        }
    }

    //-------------------------------------------------------------------------------------
    // Events
    //-------------------------------------------------------------------------------------

    /// One second elapsed. Reaching zero locks the question with no selection.
    pub fn tick(&mut self) -> Transition {
        if self.phase != Phase::Unanswered {
            return Transition::Ignored;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return self.commit(None, true);
        }
        Transition::Ticked {
            remaining: self.time_remaining,
        }
    }

    /// Changes the pending selection. Does not lock.
    pub fn select(&mut self, index: usize) -> Transition {
        if self.phase != Phase::Unanswered || index >= self.current_question().options.len() {
            return Transition::Ignored;
        }
        self.pending = Some(index);
        Transition::Selected { index }
    }

    /// Commits the pending selection. Without one, nothing happens.
    pub fn lock(&mut self) -> Transition {
        if self.phase != Phase::Unanswered {
            return Transition::Ignored;
        }
        match self.pending {
            Some(selected) => self.commit(Some(selected), false),
            None => Transition::Ignored,
        }
    }

    /// Commits the current question with no selection, counted as incorrect.
    pub fn skip(&mut self) -> Transition {
        if self.phase != Phase::Unanswered {
            return Transition::Ignored;
        }
        self.commit(None, false)
    }

    /// Moves past a locked question, or completes the session after the last one.
    pub fn advance(&mut self) -> Transition {
        if self.phase != Phase::Locked {
            return Transition::Ignored;
        }
        if self.current_index + 1 < self.total() {
            self.current_index += 1;
            self.enter_question(None);
            return Transition::Advanced {
                index: self.current_index,
            };
        }

        self.phase = Phase::Completed;
        Transition::Completed(self.summary())
    }

    /// Returns to the previous question with its recorded selection restored as
    /// the pending one, so the answer can be revised.
    pub fn previous(&mut self) -> Transition {
        if self.phase != Phase::Unanswered || self.current_index == 0 {
            return Transition::Ignored;
        }
        self.current_index -= 1;
        let restored = self
            .answer_at(self.current_index)
            .and_then(|record| record.selected_index);
        self.enter_question(restored);
        Transition::Rewound {
            index: self.current_index,
            restored,
        }
    }

    /// The score over every slot as it stands now.
    pub fn summary(&self) -> QuizSummary {
        let answers: Vec<AnswerRecord> = self.answers.iter().flatten().cloned().collect();
        QuizSummary::from_answers(answers, self.total())
    }

    //-------------------------------------------------------------------------------------
    // Internals
    //-------------------------------------------------------------------------------------

    fn enter_question(&mut self, pending: Option<usize>) {
        self.time_remaining = self.config.timer_secs;
        self.pending = pending;
        self.phase = Phase::Unanswered;
    }

    fn commit(&mut self, selected: Option<usize>, timed_out: bool) -> Transition {
        let record = AnswerRecord::new(self.current_question(), selected);
        self.answers[self.current_index] = Some(record.clone());
        self.pending = selected;
        self.phase = Phase::Locked;
        Transition::Locked { record, timed_out }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
