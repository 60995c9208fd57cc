//! Significance testing (stage 6): chi-square per survivor, or skipped.

use serde_json::json;
use stackscope_core::errors::StageError;

use crate::bias::{chi_square_independence, SignalCorrelation};
use crate::validation::context::StageContext;
use crate::validation::stage::{StageOutput, ValidationStage};
use crate::validation::types::{PipelineStageResult, StageId};

pub struct SignificanceTestingStage;

impl ValidationStage for SignificanceTestingStage {
    fn id(&self) -> StageId {
        StageId::SignificanceTesting
    }

    fn description(&self) -> &'static str {
        "Marks each signal significant when p < alpha with an adequate platform sample"
    }

    fn run(
        &self,
        mut items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        let processed = items.len();

        // No statistical claims when testing is disabled.
        if ctx.config.validation.effective_skip_statistical_tests() {
            for item in &mut items {
                item.significance = None;
            }
            let result = PipelineStageResult::skipped(
                self.id(),
                "Statistical tests disabled by configuration".to_string(),
            )
            .with_counts(processed, 0);
            return Ok(StageOutput::new(items, result));
        }

        let thresholds = &ctx.config.bias;
        for item in &mut items {
            let sample = item
                .top_platform
                .as_ref()
                .map(|label| ctx.baseline.count(label))
                .unwrap_or(0);
            let result = chi_square_independence(
                &item.platform_counts,
                &ctx.baseline,
                item.occurrences,
                sample,
                thresholds,
            );
            ctx.trace_item(
                self.id(),
                &item.signal,
                if result.significant { "significant" } else { "not significant" },
            );
            item.significance = Some(result);
        }

        let significant = items.iter().filter(|c| c.is_significant()).count();
        let result = PipelineStageResult::pass(
            self.id(),
            format!("{significant} of {processed} signals significant"),
        )
        .with_counts(processed, 0)
        .with_details(json!({
            "significant": significant,
            "significance_level": thresholds.effective_significance_level(),
            "min_platform_sample": thresholds.effective_min_platform_sample(),
        }));

        Ok(StageOutput::new(items, result))
    }
}
