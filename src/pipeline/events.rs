//! Pipeline progress events.

use crate::generate::FailureKind;
use crate::pipeline::session::SessionResults;
use crate::stage::{StageId, STAGE_COUNT};
use async_trait::async_trait;
use tracing::{error, info};

/// Signals emitted by the orchestrator as a run progresses.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A stage's generation request has been dispatched.
    StageStarted { ordinal: usize },
    /// A stage's output has been recorded.
    StageCompleted { ordinal: usize, text: String },
    /// All seven stages are done and the snapshot has been archived.
    RunCompleted { results: SessionResults },
    /// A stage failed; the run has halted.
    RunFailed { ordinal: usize, kind: FailureKind },
}

fn label(ordinal: usize) -> &'static str {
    StageId::at(ordinal).map(StageId::label).unwrap_or("?")
}

impl PipelineEvent {
    /// Human-readable description of the event.
    pub fn description(&self) -> String {
        match self {
            PipelineEvent::StageStarted { ordinal } => {
                format!("stage {}/{STAGE_COUNT} started: {}", ordinal + 1, label(*ordinal))
            }
            PipelineEvent::StageCompleted { ordinal, text } => {
                format!(
                    "stage {}/{STAGE_COUNT} completed: {} ({} chars)",
                    ordinal + 1,
                    label(*ordinal),
                    text.chars().count()
                )
            }
            PipelineEvent::RunCompleted { results } => {
                format!("run completed: {} stage outputs archived", results.len())
            }
            PipelineEvent::RunFailed { ordinal, kind } => {
                format!(
                    "run failed at stage {}/{STAGE_COUNT} ({}): {kind}",
                    ordinal + 1,
                    label(*ordinal)
                )
            }
        }
    }
}

/// Observer for pipeline events.
#[async_trait]
pub trait PipelineObserver: Send + Sync {
    async fn on_event(&self, event: &PipelineEvent);
}

/// Logs each event through `tracing`.
pub struct TracingObserver;

#[async_trait]
impl PipelineObserver for TracingObserver {
    async fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RunFailed { .. } => error!("{}", event.description()),
            _ => info!("{}", event.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_descriptions() {
        let event = PipelineEvent::StageStarted { ordinal: 0 };
        assert_eq!(event.description(), "stage 1/7 started: Script");

        let event = PipelineEvent::StageCompleted {
            ordinal: 2,
            text: "abc".to_string(),
        };
        assert_eq!(event.description(), "stage 3/7 completed: Storyboard (3 chars)");

        let event = PipelineEvent::RunFailed {
            ordinal: 6,
            kind: FailureKind::Network,
        };
        assert_eq!(
            event.description(),
            "run failed at stage 7/7 (SEO Assets): network_error"
        );
    }

    #[tokio::test]
    async fn test_tracing_observer_accepts_all_events() {
        let observer = TracingObserver;
        observer
            .on_event(&PipelineEvent::RunCompleted {
                results: SessionResults::default(),
            })
            .await;
    }
}
