//! Input data errors. Tolerated: recorded as issues, never abort a run.

use super::error_code::{self, ErrorCode};

/// Problems found on upstream site records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Site {site} has no header map; treated as empty")]
    MissingHeaders { site: String },

    #[error("Site {site} has a malformed detection ({reason}); ignored")]
    MalformedDetection { site: String, reason: String },

    #[error("Duplicate site {site}; keeping the first record")]
    DuplicateSite { site: String },

    #[error("Record #{position} has an empty site identifier; skipped")]
    EmptySiteId { position: usize },
}

impl ErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        error_code::INPUT_ERROR
    }
}
