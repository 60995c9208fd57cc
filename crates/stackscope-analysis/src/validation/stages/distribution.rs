//! Distribution analysis (stage 3): drop distributions implausible for their
//! sample size.

use serde_json::json;
use stackscope_core::constants::FLOAT_TOLERANCE;
use stackscope_core::errors::StageError;
use stackscope_core::PlatformLabel;

use crate::bias::SignalCorrelation;
use crate::validation::context::StageContext;
use crate::validation::stage::{StageOutput, ValidationStage};
use crate::validation::types::{PipelineStageResult, StageId};

/// Conditional probability on `Unknown` above which a signal is flagged as
/// mostly seen on unidentified sites.
const UNKNOWN_HEAVY_SHARE: f64 = 0.9;

pub struct DistributionAnalysisStage;

/// Largest conditional probability and its label.
fn peak(item: &SignalCorrelation) -> Option<(&PlatformLabel, f64)> {
    item.conditional_probability
        .iter()
        .filter(|(_, p)| p.is_finite())
        .fold(None, |best, (label, &p)| match best {
            Some((_, best_p)) if p <= best_p => best,
            _ => Some((label, p)),
        })
}

impl ValidationStage for DistributionAnalysisStage {
    fn id(&self) -> StageId {
        StageId::DistributionAnalysis
    }

    fn description(&self) -> &'static str {
        "Drops signals fully concentrated on one label with too few supporting sites"
    }

    fn run(
        &self,
        items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        let min_support = ctx.config.validation.effective_min_concentrated_support() as usize;
        let processed = items.len();
        let mut warnings = Vec::new();
        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(processed);

        for item in items {
            if item.conditional_probability.values().any(|p| !p.is_finite()) {
                warnings.push(format!(
                    "{}: non-finite conditional probability, left for sanity checks",
                    item.signal
                ));
                kept.push(item);
                continue;
            }

            match peak(&item) {
                Some((label, p)) if p >= 1.0 - FLOAT_TOLERANCE && item.occurrences < min_support => {
                    ctx.trace_item(self.id(), &item.signal, "implausible concentration");
                    dropped.push(json!({
                        "signal": item.signal,
                        "label": label.as_str(),
                        "sites": item.occurrences,
                    }));
                    continue;
                }
                Some((PlatformLabel::Unknown, p)) if p >= UNKNOWN_HEAVY_SHARE => {
                    warnings.push(format!(
                        "{}: {:.0}% of occurrences are on unidentified sites",
                        item.signal,
                        p * 100.0
                    ));
                }
                _ => {}
            }
            ctx.trace_item(self.id(), &item.signal, "kept");
            kept.push(item);
        }

        let result = PipelineStageResult::warn(
            self.id(),
            format!(
                "{} of {processed} signals have a plausible label distribution",
                kept.len()
            ),
            warnings,
        )
        .with_counts(processed, dropped.len())
        .with_details(json!({
            "min_concentrated_support": min_support,
            "dropped": dropped,
        }));

        Ok(StageOutput::new(kept, result))
    }
}
