//! Core types for the validation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bias::SignalCorrelation;

/// Identifier for each validation stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    FrequencyFilter,
    SampleSizeFilter,
    DistributionAnalysis,
    CorrelationCalculation,
    SanityChecks,
    SignificanceTesting,
    RecommendationGeneration,
}

impl StageId {
    pub const ALL: [StageId; 7] = [
        Self::FrequencyFilter,
        Self::SampleSizeFilter,
        Self::DistributionAnalysis,
        Self::CorrelationCalculation,
        Self::SanityChecks,
        Self::SignificanceTesting,
        Self::RecommendationGeneration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FrequencyFilter => "frequency-filter",
            Self::SampleSizeFilter => "sample-size-filter",
            Self::DistributionAnalysis => "distribution-analysis",
            Self::CorrelationCalculation => "correlation-calculation",
            Self::SanityChecks => "sanity-checks",
            Self::SignificanceTesting => "significance-testing",
            Self::RecommendationGeneration => "recommendation-generation",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Passed,
    Failed,
    Warned,
    Skipped,
    Errored,
}

/// Result of running one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStageResult {
    pub stage: StageId,
    pub status: StageStatus,
    pub passed: bool,
    pub items_processed: usize,
    pub items_filtered: usize,
    pub summary: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// Stage-specific payload.
    pub details: serde_json::Value,
}

impl PipelineStageResult {
    fn base(stage: StageId, status: StageStatus, passed: bool, summary: String) -> Self {
        Self {
            stage,
            status,
            passed,
            items_processed: 0,
            items_filtered: 0,
            summary,
            warnings: Vec::new(),
            errors: Vec::new(),
            details: serde_json::Value::Null,
        }
    }

    pub fn pass(stage: StageId, summary: String) -> Self {
        Self::base(stage, StageStatus::Passed, true, summary)
    }

    pub fn fail(stage: StageId, summary: String) -> Self {
        Self::base(stage, StageStatus::Failed, false, summary)
    }

    /// Passed with warnings. Switches to `pass` when `warnings` is empty.
    pub fn warn(stage: StageId, summary: String, warnings: Vec<String>) -> Self {
        if warnings.is_empty() {
            return Self::pass(stage, summary);
        }
        let mut result = Self::base(stage, StageStatus::Warned, true, summary);
        result.warnings = warnings;
        result
    }

    pub fn skipped(stage: StageId, reason: String) -> Self {
        Self::base(stage, StageStatus::Skipped, true, reason)
    }

    pub fn errored(stage: StageId, error: String) -> Self {
        let mut result = Self::base(stage, StageStatus::Errored, false, error.clone());
        result.errors.push(error);
        result
    }

    pub fn with_counts(mut self, processed: usize, filtered: usize) -> Self {
        self.items_processed = processed;
        self.items_filtered = filtered;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// One out-of-range or NaN value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanityViolation {
    pub signal: String,
    pub field: String,
    /// Serialized as `null` when NaN.
    pub value: f64,
}

/// Sanity-check report. `passed` is false when any violation was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanityReport {
    pub passed: bool,
    pub checked_values: usize,
    pub violations: Vec<SanityViolation>,
}

impl Default for SanityReport {
    fn default() -> Self {
        Self {
            passed: true,
            checked_values: 0,
            violations: Vec::new(),
        }
    }
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub stages: Vec<PipelineStageResult>,
    pub passed: bool,
    /// In `[0, 1]`.
    pub quality_score: f64,
    pub initial_count: usize,
    pub validated: Vec<SignalCorrelation>,
    pub sanity: SanityReport,
    pub warnings: Vec<String>,
}

impl PipelineResult {
    /// Failed result with no validated output.
    pub fn failed(initial_count: usize, stages: Vec<PipelineStageResult>, warning: String) -> Self {
        Self {
            stages,
            passed: false,
            quality_score: 0.0,
            initial_count,
            validated: Vec::new(),
            sanity: SanityReport::default(),
            warnings: vec![warning],
        }
    }

    pub fn stage(&self, id: StageId) -> Option<&PipelineStageResult> {
        self.stages.iter().find(|s| s.stage == id)
    }
}
