//! Validation stage errors.

use super::error_code::{self, ErrorCode};

/// Errors raised inside a single validation stage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageError {
    #[error("Malformed input for signal {signal}: {message}")]
    MalformedInput { signal: String, message: String },

    #[error("Invariant violated in {stage}: {message}")]
    InvariantViolated { stage: String, message: String },

    #[error("Stage {stage} panicked: {message}")]
    Panicked { stage: String, message: String },

    #[error("Stage {stage} skipped after an earlier stage error")]
    Aborted { stage: String },
}

impl ErrorCode for StageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Panicked { .. } => error_code::STAGE_PANIC,
            _ => error_code::STAGE_ERROR,
        }
    }
}
