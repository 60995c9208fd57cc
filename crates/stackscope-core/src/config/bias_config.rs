//! Dataset bias and significance thresholds.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Thresholds used by the bias analyzer when emitting warnings and judging
/// per-signal significance.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BiasThresholds {
    /// Label percentage above which the dataset is dominated. Default: 70.0.
    pub dominance_threshold_pct: Option<f64>,
    /// Herfindahl concentration above which the dataset is concentrated. Default: 0.4.
    pub concentration_threshold: Option<f64>,
    /// `Unknown` percentage above which coverage is flagged. Default: 50.0.
    pub unknown_threshold_pct: Option<f64>,
    /// Minimum distinct named platforms. Default: 3.
    pub min_distinct_platforms: Option<u32>,
    /// Chi-square significance level. Default: 0.05.
    pub significance_level: Option<f64>,
    /// Minimum sites of the correlated platform for a significance claim. Default: 30.
    pub min_platform_sample: Option<u32>,
    /// Specificity at or above which a signal is platform-dominant. Default: 0.9.
    pub specificity_dominance_cutoff: Option<f64>,
}

impl BiasThresholds {
    pub fn effective_dominance_threshold_pct(&self) -> f64 {
        self.dominance_threshold_pct
            .unwrap_or(constants::DEFAULT_DOMINANCE_THRESHOLD_PCT)
    }

    pub fn effective_concentration_threshold(&self) -> f64 {
        self.concentration_threshold
            .unwrap_or(constants::DEFAULT_CONCENTRATION_THRESHOLD)
    }

    pub fn effective_unknown_threshold_pct(&self) -> f64 {
        self.unknown_threshold_pct
            .unwrap_or(constants::DEFAULT_UNKNOWN_THRESHOLD_PCT)
    }

    pub fn effective_min_distinct_platforms(&self) -> u32 {
        self.min_distinct_platforms
            .unwrap_or(constants::DEFAULT_MIN_DISTINCT_PLATFORMS)
    }

    pub fn effective_significance_level(&self) -> f64 {
        self.significance_level
            .unwrap_or(constants::DEFAULT_SIGNIFICANCE_LEVEL)
    }

    pub fn effective_min_platform_sample(&self) -> u32 {
        self.min_platform_sample
            .unwrap_or(constants::DEFAULT_MIN_PLATFORM_SAMPLE)
    }

    pub fn effective_specificity_dominance_cutoff(&self) -> f64 {
        self.specificity_dominance_cutoff
            .unwrap_or(constants::DEFAULT_SPECIFICITY_DOMINANCE_CUTOFF)
    }
}
