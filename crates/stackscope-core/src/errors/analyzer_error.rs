//! Whole-component failures.

use super::error_code::{self, ErrorCode};

/// Errors that make an entire analyzer component give up.
/// Converted by the component into a minimal failed result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Required evidence collection missing: {dimension}")]
    MissingEvidence { dimension: String },

    #[error("{component} panicked: {message}")]
    Panicked { component: String, message: String },
}

impl ErrorCode for AnalyzerError {
    fn error_code(&self) -> &'static str {
        error_code::ANALYZER_ERROR
    }
}
