//! Sequential stage runner with per-stage panic containment.

use stackscope_core::errors::{ErrorCode, StageError};
use stackscope_core::StackscopeConfig;

use super::context::StageContext;
use super::stage::ValidationStage;
use super::stages::default_stages;
use super::types::{PipelineResult, PipelineStageResult, SanityReport};
use crate::bias::{DatasetBiasAnalysis, SignalCorrelation};
use crate::containment::contain;
use crate::signals::SignalIndex;

/// Runs the validation stages in order over the bias analyzer's correlations.
pub struct ValidationPipeline {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationPipeline {
    /// The seven built-in stages.
    pub fn new() -> Self {
        Self {
            stages: default_stages(),
        }
    }

    /// A pipeline with custom stages, run in the given order.
    pub fn with_stages(stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self { stages }
    }

    /// Run every stage. Never panics or returns an error: failures are recorded
    /// on the result.
    pub fn run(
        &self,
        bias: &DatasetBiasAnalysis,
        index: &SignalIndex,
        config: &StackscopeConfig,
    ) -> PipelineResult {
        let initial = bias.signal_correlations.len();
        match contain(|| self.execute(bias, index, config)) {
            Ok(result) => result,
            Err(message) => {
                tracing::error!(%message, "validation pipeline panicked");
                PipelineResult::failed(
                    initial,
                    Vec::new(),
                    format!("Validation pipeline failed internally: {message}"),
                )
            }
        }
    }

    fn execute(
        &self,
        bias: &DatasetBiasAnalysis,
        index: &SignalIndex,
        config: &StackscopeConfig,
    ) -> PipelineResult {
        let ctx = StageContext::new(config, bias, index);
        let stop_on_error = config.validation.effective_stop_on_error();
        let initial_count = bias.signal_correlations.len();

        let mut items: Vec<SignalCorrelation> = bias.signal_correlations.values().cloned().collect();
        let mut results = Vec::with_capacity(self.stages.len());
        let mut sanity = SanityReport::default();
        let mut aborted = false;

        for stage in &self.stages {
            let id = stage.id();
            if aborted {
                let error = StageError::Aborted {
                    stage: id.to_string(),
                };
                results.push(PipelineStageResult::skipped(id, error.coded_message()));
                continue;
            }

            tracing::debug!(
                stage = %id,
                description = stage.description(),
                items = items.len(),
                "stage start"
            );
            let input = items.clone();
            let error = match contain(|| stage.run(input, &ctx)) {
                Ok(Ok(output)) => {
                    tracing::debug!(
                        stage = %id,
                        kept = output.items.len(),
                        filtered = output.result.items_filtered,
                        "stage done"
                    );
                    if let Some(report) = output.sanity {
                        sanity = report;
                    }
                    items = output.items;
                    results.push(output.result);
                    None
                }
                Ok(Err(error)) => Some(error),
                Err(message) => Some(StageError::Panicked {
                    stage: id.to_string(),
                    message,
                }),
            };

            if let Some(error) = error {
                tracing::warn!(stage = %id, error = %error, "validation stage failed");
                results.push(
                    PipelineStageResult::errored(id, error.coded_message())
                        .with_counts(items.len(), 0),
                );
                if stop_on_error {
                    aborted = true;
                }
            }
        }

        if aborted {
            let failed_stage = results
                .iter()
                .find(|r| !r.errors.is_empty())
                .map(|r| r.stage.to_string())
                .unwrap_or_default();
            let mut result = PipelineResult::failed(
                initial_count,
                results,
                format!("Pipeline stopped after {failed_stage} failed (stop_on_error)"),
            );
            result.sanity = sanity;
            return result;
        }

        let passed = results.iter().all(|r| r.passed) && sanity.passed;
        let quality_score = quality_score(config, bias, initial_count, &items);
        let mut warnings = Vec::new();
        if !sanity.passed {
            warnings.push(format!(
                "{} sanity violations; overall validation failed",
                sanity.violations.len()
            ));
        }

        tracing::info!(
            initial = initial_count,
            validated = items.len(),
            passed,
            quality_score,
            "validation pipeline complete"
        );

        PipelineResult {
            stages: results,
            passed,
            quality_score,
            initial_count,
            validated: items,
            sanity,
            warnings,
        }
    }
}

/// Weighted combination of survival rate, significant rate, and dataset diversity
/// (1 − concentration), clamped to `[0, 1]`.
pub fn quality_score(
    config: &StackscopeConfig,
    bias: &DatasetBiasAnalysis,
    initial_count: usize,
    validated: &[SignalCorrelation],
) -> f64 {
    let (w_survival, w_significance, w_diversity) = config.validation.effective_quality_weights();
    let survival = if initial_count > 0 {
        validated.len() as f64 / initial_count as f64
    } else {
        0.0
    };
    let significant = if validated.is_empty() {
        0.0
    } else {
        validated.iter().filter(|c| c.is_significant()).count() as f64 / validated.len() as f64
    };
    let diversity = if bias.total_sites > 0 {
        1.0 - bias.concentration_score
    } else {
        0.0
    };
    let score = w_survival * survival + w_significance * significant + w_diversity * diversity;
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
