//! Platform signature engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Thresholds for platform signature synthesis.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SignatureConfig {
    /// Minimum discriminative score for a relevant pattern. Default: 0.3.
    pub min_discriminative_score: Option<f64>,
    /// Minimum pattern specificity for a relevant pattern. Default: 0.3.
    pub min_specificity: Option<f64>,
    /// Support above which a dimension is active. Default: 0.3.
    pub active_dimension_threshold: Option<f64>,
    /// Summed support required to synthesize a signature. Default: 0.3.
    pub min_combined_support: Option<f64>,
    /// Discriminative score above which a pattern is strong evidence. Default: 0.8.
    pub strong_evidence_threshold: Option<f64>,
    /// Conflict score above which a conflict is recorded. Default: 0.02.
    pub conflict_score_floor: Option<f64>,
}

impl SignatureConfig {
    pub fn effective_min_discriminative_score(&self) -> f64 {
        self.min_discriminative_score
            .unwrap_or(constants::DEFAULT_MIN_DISCRIMINATIVE_SCORE)
    }

    pub fn effective_min_specificity(&self) -> f64 {
        self.min_specificity
            .unwrap_or(constants::DEFAULT_MIN_PATTERN_SPECIFICITY)
    }

    pub fn effective_active_dimension_threshold(&self) -> f64 {
        self.active_dimension_threshold
            .unwrap_or(constants::DEFAULT_ACTIVE_DIMENSION_THRESHOLD)
    }

    pub fn effective_min_combined_support(&self) -> f64 {
        self.min_combined_support
            .unwrap_or(constants::DEFAULT_MIN_COMBINED_SUPPORT)
    }

    pub fn effective_strong_evidence_threshold(&self) -> f64 {
        self.strong_evidence_threshold
            .unwrap_or(constants::DEFAULT_STRONG_EVIDENCE_THRESHOLD)
    }

    pub fn effective_conflict_score_floor(&self) -> f64 {
        self.conflict_score_floor
            .unwrap_or(constants::DEFAULT_CONFLICT_SCORE_FLOOR)
    }
}
