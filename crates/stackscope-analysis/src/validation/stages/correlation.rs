//! Correlation calculation (stage 4): recompute every survivor from the index.

use serde_json::json;
use stackscope_core::errors::{ErrorCode, StageError};

use crate::bias::{compute_correlation, SignalCorrelation};
use crate::signals::SignalKey;
use crate::validation::context::StageContext;
use crate::validation::stage::{StageOutput, ValidationStage};
use crate::validation::types::{PipelineStageResult, StageId};

pub struct CorrelationCalculationStage;

impl ValidationStage for CorrelationCalculationStage {
    fn id(&self) -> StageId {
        StageId::CorrelationCalculation
    }

    fn description(&self) -> &'static str {
        "Recomputes correlation fields for surviving signals"
    }

    fn run(
        &self,
        items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        let processed = items.len();
        let mut warnings = Vec::new();
        let mut recomputed = 0usize;
        let mut output = Vec::with_capacity(processed);

        for item in items {
            let occurrence = SignalKey::parse(&item.signal)
                .and_then(|key| ctx.index.get(&key).map(|occ| (key, occ)));

            let Some((key, occurrence)) = occurrence else {
                let error = StageError::MalformedInput {
                    signal: item.signal.clone(),
                    message: "not present in the signal index; kept as supplied".to_string(),
                };
                warnings.push(error.coded_message());
                ctx.trace_item(self.id(), &item.signal, "malformed");
                output.push(item);
                continue;
            };

            if occurrence.occurrences() != item.occurrences {
                let error = StageError::MalformedInput {
                    signal: item.signal.clone(),
                    message: format!(
                        "stale occurrence count {} (index has {})",
                        item.occurrences,
                        occurrence.occurrences()
                    ),
                };
                warnings.push(error.coded_message());
            }

            let mut fresh = compute_correlation(
                &key,
                &occurrence.sites,
                ctx.index,
                &ctx.baseline,
                &ctx.config.bias,
            );
            fresh.recommendation = item.recommendation;
            ctx.trace_item(self.id(), &fresh.signal, "recomputed");
            recomputed += 1;
            output.push(fresh);
        }

        let result = PipelineStageResult::warn(
            self.id(),
            format!("Recomputed {recomputed} of {processed} correlations"),
            warnings,
        )
        .with_counts(processed, 0)
        .with_details(json!({ "recomputed": recomputed }));

        Ok(StageOutput::new(output, result))
    }
}
