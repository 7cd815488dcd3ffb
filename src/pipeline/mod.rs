//! Pipeline orchestration.
//!
//! Drives the seven stages strictly in registry order, one generation call
//! in flight at a time. A stage's prompt is composed only after the prior
//! stage's output is recorded; a stage failure halts the run at that
//! ordinal. Every replacement of the session (start, reset, load) mints a
//! new epoch, and any response that resolves under a stale epoch is
//! discarded without touching state.

pub mod events;
pub mod session;

pub use events::{PipelineEvent, PipelineObserver, TracingObserver};
pub use session::{PipelinePosition, Session, SessionInputs, SessionResults};

use crate::compose;
use crate::generate::{GenerateError, GenerationClient};
use crate::stage::StageId;
use crate::storage::history::{HistoryArchive, HistoryRecord};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Errors surfaced by the orchestrator's public operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("a run is already in progress")]
    AlreadyRunning,

    #[error("both a title and a script brief are required")]
    EmptyInputs,

    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: StageId,
        #[source]
        source: GenerateError,
    },

    #[error("the run was cancelled")]
    Cancelled,
}

/// The core state machine: advances through the stages one at a time,
/// accumulating results into the session and archiving completed runs.
pub struct PipelineOrchestrator {
    session: Arc<RwLock<Session>>,
    client: Arc<dyn GenerationClient>,
    archive: Arc<HistoryArchive>,
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl PipelineOrchestrator {
    pub fn new(client: Arc<dyn GenerationClient>, archive: Arc<HistoryArchive>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::new())),
            client,
            archive,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Shared handle to the current-run session state.
    pub fn session(&self) -> Arc<RwLock<Session>> {
        Arc::clone(&self.session)
    }

    async fn notify(&self, event: PipelineEvent) {
        for observer in &self.observers {
            observer.on_event(&event).await;
        }
    }

    /// Starts a run and drives it to completion or first failure.
    ///
    /// Rejected when a run is already in progress or when either input is
    /// empty. On success the completed results snapshot is returned and a
    /// history record has been archived.
    pub async fn start(&self, inputs: SessionInputs) -> Result<SessionResults, PipelineError> {
        if !inputs.is_valid() {
            return Err(PipelineError::EmptyInputs);
        }
        let epoch = {
            let mut session = self.session.write().await;
            if session.running {
                return Err(PipelineError::AlreadyRunning);
            }
            session.begin_run(inputs)
        };
        self.run(epoch).await
    }

    /// Cancels any in-flight run and clears the session. A generation call
    /// still outstanding when this is invoked resolves under a stale epoch
    /// and is discarded.
    pub async fn reset(&self) {
        self.session.write().await.clear();
    }

    /// Installs an archived run as the current session, overwriting any
    /// in-progress run. The session takes copies; later session mutation
    /// never alters the archived record.
    pub async fn load_record(&self, record: &HistoryRecord) {
        self.session
            .write()
            .await
            .install_record(record.inputs.clone(), record.results.clone());
    }

    async fn run(&self, epoch: u64) -> Result<SessionResults, PipelineError> {
        loop {
            // Plan the next step under the lock; the generation call itself
            // runs outside it so reset() stays responsive mid-stage.
            let (stage, prompt) = {
                let mut session = self.session.write().await;
                if session.epoch != epoch {
                    return Err(PipelineError::Cancelled);
                }
                let Some(stage) = session.position.current_stage() else {
                    session.running = false;
                    let record =
                        HistoryRecord::new(session.inputs.clone(), session.results.clone());
                    let results = session.results.clone();
                    drop(session);
                    if let Err(err) = self.archive.append(record).await {
                        warn!("failed to persist history: {err:#}");
                    }
                    self.notify(PipelineEvent::RunCompleted {
                        results: results.clone(),
                    })
                    .await;
                    return Ok(results);
                };
                session.set_active_tab(stage.ordinal());
                match compose::compose(stage, &session.inputs, &session.results) {
                    Ok(prompt) => (stage, prompt),
                    Err(err) => {
                        session.running = false;
                        drop(session);
                        return self
                            .fail(stage, GenerateError::Unknown(err.to_string()))
                            .await;
                    }
                }
            };

            let ordinal = stage.ordinal();
            self.notify(PipelineEvent::StageStarted { ordinal }).await;
            debug!(stage = %stage, "dispatching generation request");

            let outcome = self.client.generate(stage, &prompt).await;

            let mut session = self.session.write().await;
            if session.epoch != epoch {
                // The session was reset or replaced while the call was in
                // flight; its resolution must not touch the newer state.
                debug!(stage = %stage, "discarding stale generation response");
                return Err(PipelineError::Cancelled);
            }
            match outcome {
                Ok(text) => {
                    session.results.insert(stage.slot(), text.clone());
                    session.position = session.position.advance();
                    drop(session);
                    self.notify(PipelineEvent::StageCompleted { ordinal, text })
                        .await;
                }
                Err(err) => {
                    // The failed stage is neither recorded nor advanced
                    // past; the only recovery is a fresh start().
                    session.running = false;
                    drop(session);
                    return self.fail(stage, err).await;
                }
            }
        }
    }

    async fn fail(
        &self,
        stage: StageId,
        source: GenerateError,
    ) -> Result<SessionResults, PipelineError> {
        self.notify(PipelineEvent::RunFailed {
            ordinal: stage.ordinal(),
            kind: source.kind(),
        })
        .await;
        Err(PipelineError::Stage { stage, source })
    }
}
