//! Error handling for stackscope.
//! One error enum per concern, `thiserror` only.
//!
//! None of these escape the public analysis operations: the analysis crate
//! converts them into failed-but-inspectable result data.

pub mod analyzer_error;
pub mod config_error;
pub mod error_code;
pub mod input_error;
pub mod stage_error;

pub use analyzer_error::AnalyzerError;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use input_error::InputError;
pub use stage_error::StageError;
