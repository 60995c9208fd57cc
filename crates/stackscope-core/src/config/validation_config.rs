//! Validation pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the multi-stage validation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// Run the pipeline at all. Default: true.
    pub enable_validation: Option<bool>,
    /// Skip the significance-testing stage. Default: false.
    pub skip_statistical_tests: Option<bool>,
    /// Abort remaining stages on the first stage error. Default: false.
    pub stop_on_error: Option<bool>,
    /// Emit per-item debug events. Never changes results. Default: false.
    pub debug_mode: Option<bool>,
    /// Absolute occurrence floor for the sample-size stage. Default: 30.
    pub sample_size_floor: Option<u32>,
    /// Sites required before a fully concentrated signal is plausible. Default: 5.
    pub min_concentrated_support: Option<u32>,
    /// Quality-score weight: surviving fraction. Default: 0.4.
    pub survival_weight: Option<f64>,
    /// Quality-score weight: significant fraction. Default: 0.4.
    pub significance_weight: Option<f64>,
    /// Quality-score weight: dataset diversity. Default: 0.2.
    pub diversity_weight: Option<f64>,
}

impl ValidationConfig {
    pub fn effective_enable_validation(&self) -> bool {
        self.enable_validation.unwrap_or(true)
    }

    pub fn effective_skip_statistical_tests(&self) -> bool {
        self.skip_statistical_tests.unwrap_or(false)
    }

    pub fn effective_stop_on_error(&self) -> bool {
        self.stop_on_error.unwrap_or(false)
    }

    pub fn effective_debug_mode(&self) -> bool {
        self.debug_mode.unwrap_or(false)
    }

    pub fn effective_sample_size_floor(&self) -> u32 {
        self.sample_size_floor
            .unwrap_or(constants::DEFAULT_SAMPLE_SIZE_FLOOR)
    }

    pub fn effective_min_concentrated_support(&self) -> u32 {
        self.min_concentrated_support
            .unwrap_or(constants::DEFAULT_MIN_CONCENTRATED_SUPPORT)
    }

    /// Quality-score weights (survival, significance, diversity), normalised to sum to 1.
    /// Falls back to the defaults when the configured weights sum to zero.
    pub fn effective_quality_weights(&self) -> (f64, f64, f64) {
        let s = self.survival_weight.unwrap_or(constants::DEFAULT_SURVIVAL_WEIGHT).max(0.0);
        let g = self
            .significance_weight
            .unwrap_or(constants::DEFAULT_SIGNIFICANCE_WEIGHT)
            .max(0.0);
        let d = self.diversity_weight.unwrap_or(constants::DEFAULT_DIVERSITY_WEIGHT).max(0.0);
        let total = s + g + d;
        if total <= 0.0 || !total.is_finite() {
            return (
                constants::DEFAULT_SURVIVAL_WEIGHT,
                constants::DEFAULT_SIGNIFICANCE_WEIGHT,
                constants::DEFAULT_DIVERSITY_WEIGHT,
            );
        }
        (s / total, g / total, d / total)
    }
}
