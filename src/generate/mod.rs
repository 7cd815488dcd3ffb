//! Generation provider boundary.
//!
//! One request/response round trip per stage; failures are classified so
//! the surface layer can show a stable, human-readable message.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::stage::StageId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Classified failure from the generation provider.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation API key is missing from the environment")]
    CredentialsMissing,

    #[error("generation provider rejected the API key: {0}")]
    AuthFailed(String),

    #[error("network failure reaching the generation provider: {0}")]
    Network(String),

    #[error("generation failed: {0}")]
    Unknown(String),
}

/// Stable classification tag carried on run-failed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CredentialsMissing,
    AuthFailed,
    Network,
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            FailureKind::CredentialsMissing => "credentials_missing",
            FailureKind::AuthFailed => "auth_failed",
            FailureKind::Network => "network_error",
            FailureKind::Unknown => "unknown",
        };
        write!(f, "{tag}")
    }
}

impl GenerateError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GenerateError::CredentialsMissing => FailureKind::CredentialsMissing,
            GenerateError::AuthFailed(_) => FailureKind::AuthFailed,
            GenerateError::Network(_) => FailureKind::Network,
            GenerateError::Unknown(_) => FailureKind::Unknown,
        }
    }

    /// Message shown to the user when a run halts on this failure. Every
    /// failure is terminal for the run; recovery is a fresh start.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerateError::CredentialsMissing => {
                "The GEMINI_API_KEY environment variable is not set. \
                 Configure the API key, then start the run again."
            }
            GenerateError::AuthFailed(_) => {
                "The generation provider rejected the configured API key. \
                 Check GEMINI_API_KEY, then start the run again."
            }
            GenerateError::Network(_) => {
                "Could not reach the generation provider. \
                 Check the network connection, then start the run again."
            }
            GenerateError::Unknown(_) => {
                "Content generation failed unexpectedly. Start the run again."
            }
        }
    }
}

/// One outbound generation request for a composed stage prompt.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Executes the request and returns the generated text.
    async fn generate(&self, stage: StageId, prompt: &str) -> Result<String, GenerateError>;
}
