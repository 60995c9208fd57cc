//! The stage trait.

use stackscope_core::errors::StageError;

use super::context::StageContext;
use super::types::{PipelineStageResult, SanityReport, StageId};
use crate::bias::SignalCorrelation;

/// Surviving items plus the stage's report.
pub struct StageOutput {
    pub items: Vec<SignalCorrelation>,
    pub result: PipelineStageResult,
    /// Set by the sanity stage.
    pub sanity: Option<SanityReport>,
}

impl StageOutput {
    pub fn new(items: Vec<SignalCorrelation>, result: PipelineStageResult) -> Self {
        Self {
            items,
            result,
            sanity: None,
        }
    }

    pub fn with_sanity(mut self, report: SanityReport) -> Self {
        self.sanity = Some(report);
        self
    }
}

/// One validation stage. Pure: output depends only on `items` and `ctx`.
///
/// Recoverable per-item problems go into the result's warnings. Returning
/// `Err` marks the stage errored; the pipeline then continues with the stage's
/// input or aborts, depending on `stop_on_error`.
pub trait ValidationStage: Send + Sync {
    fn id(&self) -> StageId;

    fn description(&self) -> &'static str;

    fn run(
        &self,
        items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError>;
}
