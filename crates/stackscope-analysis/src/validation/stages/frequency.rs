//! Frequency filter (stage 1): drop signals below `min_occurrences / total_sites`.

use serde_json::json;
use stackscope_core::errors::StageError;

use crate::bias::SignalCorrelation;
use crate::validation::context::StageContext;
use crate::validation::stage::{StageOutput, ValidationStage};
use crate::validation::types::{PipelineStageResult, StageId};

pub struct FrequencyFilterStage;

impl ValidationStage for FrequencyFilterStage {
    fn id(&self) -> StageId {
        StageId::FrequencyFilter
    }

    fn description(&self) -> &'static str {
        "Drops signals occurring on fewer than min_occurrences sites"
    }

    fn run(
        &self,
        items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        let total = ctx.total_sites();
        if total == 0 && !items.is_empty() {
            return Err(StageError::InvariantViolated {
                stage: self.id().to_string(),
                message: format!("{} correlations on an empty dataset", items.len()),
            });
        }

        let min_occurrences = ctx.min_occurrences();
        let threshold = if total > 0 {
            min_occurrences as f64 / total as f64
        } else {
            0.0
        };

        let processed = items.len();
        let mut dropped = Vec::new();
        let kept: Vec<SignalCorrelation> = items
            .into_iter()
            .filter(|item| {
                // Integer comparison; equivalent to frequency >= threshold.
                let keep = item.occurrences >= min_occurrences;
                ctx.trace_item(self.id(), &item.signal, if keep { "kept" } else { "dropped" });
                if !keep {
                    dropped.push(item.signal.clone());
                }
                keep
            })
            .collect();

        let result = PipelineStageResult::pass(
            self.id(),
            format!(
                "{} of {processed} signals at or above frequency {threshold:.4}",
                kept.len()
            ),
        )
        .with_counts(processed, dropped.len())
        .with_details(json!({
            "frequency_threshold": threshold,
            "min_occurrences": min_occurrences,
            "dropped": dropped,
        }));

        Ok(StageOutput::new(kept, result))
    }
}
