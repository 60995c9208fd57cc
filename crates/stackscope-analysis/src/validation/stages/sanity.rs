//! Sanity checks (stage 5): every probability in `[0, 1]` and not NaN.

use serde_json::json;
use stackscope_core::constants::FLOAT_TOLERANCE;
use stackscope_core::errors::StageError;

use crate::bias::SignalCorrelation;
use crate::validation::context::StageContext;
use crate::validation::stage::{StageOutput, ValidationStage};
use crate::validation::types::{PipelineStageResult, SanityReport, SanityViolation, StageId};

pub struct SanityCheckStage;

/// Violations found on one correlation.
pub fn check_correlation(item: &SignalCorrelation) -> (usize, Vec<SanityViolation>) {
    let values = item.bounded_values();
    let checked = values.len() + 1;
    let mut violations: Vec<SanityViolation> = values
        .into_iter()
        .filter(|(_, value)| !(0.0..=1.0).contains(value))
        .map(|(field, value)| SanityViolation {
            signal: item.signal.clone(),
            field,
            value,
        })
        .collect();

    let conditional_sum: f64 = item.conditional_probability.values().sum();
    if conditional_sum.is_finite() && conditional_sum > 1.0 + FLOAT_TOLERANCE {
        violations.push(SanityViolation {
            signal: item.signal.clone(),
            field: "conditional_probability.sum".to_string(),
            value: conditional_sum,
        });
    }
    (checked, violations)
}

impl ValidationStage for SanityCheckStage {
    fn id(&self) -> StageId {
        StageId::SanityChecks
    }

    fn description(&self) -> &'static str {
        "Flags probabilities outside [0, 1] or NaN and removes the offending signals"
    }

    fn run(
        &self,
        items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        let processed = items.len();
        let mut report = SanityReport::default();
        let mut kept = Vec::with_capacity(processed);

        for item in items {
            let (checked, violations) = check_correlation(&item);
            report.checked_values += checked;
            if violations.is_empty() {
                kept.push(item);
            } else {
                ctx.trace_item(self.id(), &item.signal, "sanity violation");
                report.violations.extend(violations);
            }
        }
        report.passed = report.violations.is_empty();
        let filtered = processed - kept.len();

        let result = (if report.passed {
            PipelineStageResult::pass(
                self.id(),
                format!("{} values checked, all within [0, 1]", report.checked_values),
            )
        } else {
            let mut failed = PipelineStageResult::fail(
                self.id(),
                format!(
                    "{} sanity violations across {filtered} signals",
                    report.violations.len()
                ),
            );
            failed.warnings = report
                .violations
                .iter()
                .map(|v| format!("{}: {} = {}", v.signal, v.field, v.value))
                .collect();
            failed
        })
        .with_counts(processed, filtered)
        .with_details(json!({
            "checked_values": report.checked_values,
            "violations": report.violations.len(),
        }));

        Ok(StageOutput::new(kept, result).with_sanity(report))
    }
}
