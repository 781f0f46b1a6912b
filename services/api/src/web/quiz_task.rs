//! services/api/src/web/quiz_task.rs
//!
//! This module contains the asynchronous "worker" that runs quiz sessions for one
//! client connection. It owns the clock: a one-second interval feeds the session's
//! countdown and a single pending sleep implements the reveal delay between a lock
//! and the next question. Everything else is decided by `QuizSession`.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    state::AppState,
};
use chrono::Utc;
use quiz_core::{
    domain::{HighScoreEntry, QuizConfig, QuizSummary},
    loader::{LoadError, LoadedQuestions},
    ports::{PortError, PortResult},
    session::{QuizSession, Transition, TICK_INTERVAL},
};
use std::{future, pin::Pin, sync::Arc};
use tokio::{
    sync::mpsc,
    time::{self, Instant, Interval, MissedTickBehavior, Sleep},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Result of one spawned load, tagged with the generation that requested it.
struct LoadOutcome {
    generation: u64,
    result: Result<LoadedQuestions, LoadError>,
}

/// Where this connection is in the quiz lifecycle.
enum RunnerPhase {
    /// On the configuration view; no session.
    Idle,
    Loading {
        config: QuizConfig,
        cancel: CancellationToken,
    },
    LoadFailed {
        config: QuizConfig,
    },
    Active(QuizSession),
}

struct QuizRunner {
    app_state: Arc<AppState>,
    outbox: mpsc::Sender<ServerMessage>,
    load_tx: mpsc::Sender<LoadOutcome>,
    phase: RunnerPhase,
    generation: u64,
    ticker: Interval,
    reveal: Option<Pin<Box<Sleep>>>,
}

/// The main asynchronous task for a quiz connection.
///
/// Runs until the client side of `inbox` is dropped or the client stops
/// accepting messages. Any load still in flight at that point is cancelled and
/// its late result ignored.
pub async fn quiz_process(
    app_state: Arc<AppState>,
    mut inbox: mpsc::Receiver<ClientMessage>,
    outbox: mpsc::Sender<ServerMessage>,
) -> PortResult<()> {
    info!("Quiz process started.");

    let (load_tx, mut load_rx) = mpsc::channel::<LoadOutcome>(4);
    let mut ticker = time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut runner = QuizRunner {
        app_state,
        outbox,
        load_tx,
        phase: RunnerPhase::Idle,
        generation: 0,
        ticker,
        reveal: None,
    };

    let result = runner.run(&mut inbox, &mut load_rx).await;
    runner.cancel_loading();
    info!("Quiz process finished.");
    result
}

impl QuizRunner {
    async fn run(
        &mut self,
        inbox: &mut mpsc::Receiver<ClientMessage>,
        load_rx: &mut mpsc::Receiver<LoadOutcome>,
    ) -> PortResult<()> {
        loop {
            let timing = self.reveal.is_none()
                && matches!(&self.phase, RunnerPhase::Active(session) if session.is_timing());
            let revealing = self.reveal.is_some();

            tokio::select! {
                msg = inbox.recv() => match msg {
                    Some(msg) => self.handle_client_message(msg).await?,
                    None => {
                        info!("Client disconnected.");
                        return Ok(());
                    }
                },
                Some(outcome) = load_rx.recv() => self.handle_load_outcome(outcome).await?,
                _ = self.ticker.tick(), if timing => {
                    let transition = self.with_session(QuizSession::tick);
                    self.apply(transition).await?;
                }
                _ = wait_reveal(&mut self.reveal), if revealing => {
                    self.reveal = None;
                    let transition = self.with_session(QuizSession::advance);
                    self.apply(transition).await?;
                }
            }
        }
    }

    //-------------------------------------------------------------------------------------
    // Client input
    //-------------------------------------------------------------------------------------

    async fn handle_client_message(&mut self, msg: ClientMessage) -> PortResult<()> {
        debug!("Client message: {:?}", msg);
        match msg {
            ClientMessage::Start { config } => {
                let config = match config {
                    Some(config) => {
                        let config = config.clamped();
                        if let Err(e) = self.app_state.settings.save(&config).await {
                            error!("Failed to save settings: {:?}", e);
                        }
                        config
                    }
                    None => self.app_state.settings.load().await,
                };
                self.begin_loading(config).await
            }
            ClientMessage::Retry => match &self.phase {
                RunnerPhase::LoadFailed { config } => {
                    let config = *config;
                    self.begin_loading(config).await
                }
                _ => self.send_error("There is no failed load to retry.").await,
            },
            ClientMessage::Abandon => {
                self.discard();
                info!("Session discarded by client.");
                self.send(ServerMessage::SessionDiscarded).await
            }
            ClientMessage::Select { index } => self.session_input(|s| s.select(index)).await,
            ClientMessage::Lock => self.session_input(QuizSession::lock).await,
            ClientMessage::Skip => self.session_input(QuizSession::skip).await,
            ClientMessage::Previous => self.session_input(QuizSession::previous).await,
        }
    }

    async fn session_input(
        &mut self,
        event: impl FnOnce(&mut QuizSession) -> Transition,
    ) -> PortResult<()> {
        if !matches!(self.phase, RunnerPhase::Active(_)) {
            return self.send_error("No question is active.").await;
        }
        let transition = self.with_session(event);
        self.apply(transition).await
    }

    fn with_session(&mut self, event: impl FnOnce(&mut QuizSession) -> Transition) -> Transition {
        match &mut self.phase {
            RunnerPhase::Active(session) => event(session),
            _ => Transition::Ignored,
        }
    }

    //-------------------------------------------------------------------------------------
    // Loading
    //-------------------------------------------------------------------------------------

    async fn begin_loading(&mut self, config: QuizConfig) -> PortResult<()> {
        self.discard();
        self.generation += 1;
        let generation = self.generation;
        let cancel = CancellationToken::new();
        self.phase = RunnerPhase::Loading {
            config,
            cancel: cancel.clone(),
        };
        info!("Loading questions (generation {}) with {:?}", generation, config);
        self.send(ServerMessage::Loading).await?;

        let loader = self.app_state.loader.clone();
        let load_tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = loader.load(&config).await;
            if cancel.is_cancelled() {
                debug!("Dropping result of cancelled load (generation {}).", generation);
                return;
            }
            let _ = load_tx.send(LoadOutcome { generation, result }).await;
        });
        Ok(())
    }

    async fn handle_load_outcome(&mut self, outcome: LoadOutcome) -> PortResult<()> {
        let config = match &self.phase {
            RunnerPhase::Loading { config, .. } if outcome.generation == self.generation => *config,
            _ => {
                debug!("Ignoring stale load result (generation {}).", outcome.generation);
                return Ok(());
            }
        };

        let loaded = match outcome.result {
            Ok(loaded) => loaded,
            Err(e) => return self.fail_load(config, e.reason).await,
        };
        let (served_by, fell_back) = (loaded.served_by, loaded.fell_back);
        let session = match QuizSession::new(loaded.questions, config) {
            Ok(session) => session,
            Err(e) => {
                error!("Loaded questions could not start a session: {}", e);
                return self
                    .fail_load(config, "Failed to load questions. Please try again.".to_string())
                    .await;
            }
        };

        let total = session.total();
        let view = session.view();
        self.phase = RunnerPhase::Active(session);
        self.ticker.reset();
        info!("Session ready with {} question(s) from {:?}.", total, served_by);
        self.send(ServerMessage::Ready {
            total,
            served_by,
            fell_back,
        })
        .await?;
        self.send(ServerMessage::Question { view }).await
    }

    async fn fail_load(&mut self, config: QuizConfig, reason: String) -> PortResult<()> {
        warn!("Question load failed: {}", reason);
        self.phase = RunnerPhase::LoadFailed { config };
        self.send(ServerMessage::LoadFailed { reason }).await
    }

    fn cancel_loading(&mut self) {
        if let RunnerPhase::Loading { cancel, .. } = &self.phase {
            cancel.cancel();
        }
    }

    fn discard(&mut self) {
        self.cancel_loading();
        self.reveal = None;
        self.phase = RunnerPhase::Idle;
    }

    //-------------------------------------------------------------------------------------
    // Session transitions
    //-------------------------------------------------------------------------------------

    async fn apply(&mut self, transition: Transition) -> PortResult<()> {
        match transition {
            Transition::Ignored => {
                debug!("Event ignored in the current phase.");
                Ok(())
            }
            Transition::Ticked { remaining } => self.send(ServerMessage::Tick { remaining }).await,
            Transition::Selected { index } => self.send(ServerMessage::Selected { index }).await,
            Transition::Locked { record, timed_out } => {
                self.reveal = Some(Box::pin(time::sleep(self.app_state.config.reveal_delay)));
                self.send(ServerMessage::Revealed { record, timed_out }).await
            }
            Transition::Advanced { .. } | Transition::Rewound { .. } => {
                self.ticker.reset();
                match &self.phase {
                    RunnerPhase::Active(session) => {
                        let view = session.view();
                        self.send(ServerMessage::Question { view }).await
                    }
                    _ => Ok(()),
                }
            }
            Transition::Completed(summary) => self.complete(summary).await,
        }
    }

    async fn complete(&mut self, summary: QuizSummary) -> PortResult<()> {
        let config = match std::mem::replace(&mut self.phase, RunnerPhase::Idle) {
            RunnerPhase::Active(session) => *session.config(),
            _ => return Ok(()),
        };
        info!(
            "Session completed: {}/{} correct ({:.1}%).",
            summary.correct, summary.total, summary.percent_correct
        );

        let entry = HighScoreEntry::from_summary(&summary, &config, Utc::now());
        let high_scores = match self.app_state.high_scores.append(entry).await {
            Ok(list) => list,
            Err(e) => {
                error!("Failed to record high score: {:?}", e);
                Vec::new()
            }
        };
        self.send(ServerMessage::Completed {
            summary,
            high_scores,
        })
        .await
    }

    //-------------------------------------------------------------------------------------
    // Output
    //-------------------------------------------------------------------------------------

    async fn send(&self, msg: ServerMessage) -> PortResult<()> {
        self.outbox
            .send(msg)
            .await
            .map_err(|_| PortError::Unexpected("Client is no longer receiving messages.".to_string()))
    }

    async fn send_error(&self, message: &str) -> PortResult<()> {
        self.send(ServerMessage::Error {
            message: message.to_string(),
        })
        .await
    }
}

async fn wait_reveal(reveal: &mut Option<Pin<Box<Sleep>>>) {
    match reveal {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}
