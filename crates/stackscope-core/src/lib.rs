//! stackscope-core: shared types, configuration, errors, tracing, and constants
//! for the stackscope signal analysis engine.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::StackscopeConfig;
pub use types::{
    Detection, Dimension, MetaTag, PageType, PageTypeFilter, Platform, PlatformLabel,
    SiteRecord,
};
