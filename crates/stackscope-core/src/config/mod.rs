//! Configuration system for stackscope.
//! TOML-based, 3-layer resolution: CLI > env > file > defaults.
//!
//! The analysis crate only ever receives a constructed `StackscopeConfig`;
//! environment and file lookups happen here, at the caller's request.

pub mod analysis_config;
pub mod bias_config;
pub mod signature_config;
pub mod stackscope_config;
pub mod validation_config;

pub use analysis_config::AnalysisConfig;
pub use bias_config::BiasThresholds;
pub use signature_config::SignatureConfig;
pub use stackscope_config::{CliOverrides, StackscopeConfig};
pub use validation_config::ValidationConfig;
