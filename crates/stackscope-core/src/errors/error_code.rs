//! ErrorCode trait for stable, machine-readable error identifiers.

/// Every error enum implements this so downstream reporting can group
/// failures without matching on message text.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "STAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INPUT_ERROR: &str = "INPUT_ERROR";
pub const STAGE_ERROR: &str = "STAGE_ERROR";
pub const STAGE_PANIC: &str = "STAGE_PANIC";
pub const ANALYZER_ERROR: &str = "ANALYZER_ERROR";
