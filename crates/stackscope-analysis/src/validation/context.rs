//! Read-only inputs shared by every stage.

use stackscope_core::StackscopeConfig;

use crate::bias::{DatasetBiasAnalysis, LabelBaseline};
use crate::signals::SignalIndex;

use super::types::StageId;

/// Context handed to each stage.
pub struct StageContext<'a> {
    pub config: &'a StackscopeConfig,
    pub bias: &'a DatasetBiasAnalysis,
    pub index: &'a SignalIndex,
    pub baseline: LabelBaseline,
}

impl<'a> StageContext<'a> {
    pub fn new(
        config: &'a StackscopeConfig,
        bias: &'a DatasetBiasAnalysis,
        index: &'a SignalIndex,
    ) -> Self {
        Self {
            config,
            bias,
            index,
            baseline: LabelBaseline::new(bias.label_counts()),
        }
    }

    pub fn total_sites(&self) -> usize {
        self.bias.total_sites
    }

    pub fn min_occurrences(&self) -> usize {
        self.config.analysis.effective_min_occurrences() as usize
    }

    /// Per-item trace, emitted only in debug mode.
    pub fn trace_item(&self, stage: StageId, signal: &str, outcome: &str) {
        if self.config.validation.effective_debug_mode() {
            tracing::debug!(stage = %stage, signal, outcome, "validation item");
        }
    }
}
