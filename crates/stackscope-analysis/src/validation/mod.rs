//! Validation pipeline: a fixed, ordered sequence of filtering stages that
//! turns raw correlations into a statistically defensible set.

pub mod context;
pub mod pipeline;
pub mod stage;
pub mod stages;
pub mod types;

pub use context::StageContext;
pub use pipeline::ValidationPipeline;
pub use stage::{StageOutput, ValidationStage};
pub use types::{
    PipelineResult, PipelineStageResult, SanityReport, SanityViolation, StageId, StageStatus,
};
