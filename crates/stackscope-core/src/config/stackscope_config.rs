//! Top-level stackscope configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, BiasThresholds, SignatureConfig, ValidationConfig};
use crate::errors::ConfigError;
use crate::types::PageTypeFilter;

/// Project config file name looked up by [`StackscopeConfig::load`].
pub const CONFIG_FILE_NAME: &str = "stackscope.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`STACKSCOPE_*`)
/// 3. Project config (`stackscope.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StackscopeConfig {
    pub analysis: AnalysisConfig,
    pub bias: BiasThresholds,
    pub validation: ValidationConfig,
    pub signatures: SignatureConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub min_occurrences: Option<u32>,
    pub min_sites: Option<u32>,
    pub page_type_filter: Option<PageTypeFilter>,
    pub skip_statistical_tests: Option<bool>,
    pub stop_on_error: Option<bool>,
    pub debug_mode: Option<bool>,
}

impl StackscopeConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &StackscopeConfig) -> Result<(), ConfigError> {
        if config.analysis.min_occurrences == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.min_occurrences".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let unit_fields = [
            ("analysis.detection_threshold", config.analysis.detection_threshold),
            ("bias.concentration_threshold", config.bias.concentration_threshold),
            (
                "bias.specificity_dominance_cutoff",
                config.bias.specificity_dominance_cutoff,
            ),
            (
                "signatures.min_discriminative_score",
                config.signatures.min_discriminative_score,
            ),
            ("signatures.min_specificity", config.signatures.min_specificity),
            (
                "signatures.active_dimension_threshold",
                config.signatures.active_dimension_threshold,
            ),
            (
                "signatures.strong_evidence_threshold",
                config.signatures.strong_evidence_threshold,
            ),
            ("signatures.conflict_score_floor", config.signatures.conflict_score_floor),
        ];
        for (field, value) in unit_fields {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0.0 and 1.0".to_string(),
                    });
                }
            }
        }

        let pct_fields = [
            ("bias.dominance_threshold_pct", config.bias.dominance_threshold_pct),
            ("bias.unknown_threshold_pct", config.bias.unknown_threshold_pct),
        ];
        for (field, value) in pct_fields {
            if let Some(v) = value {
                if !(0.0..=100.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0 and 100".to_string(),
                    });
                }
            }
        }

        if let Some(level) = config.bias.significance_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "bias.significance_level".to_string(),
                    message: "must be strictly between 0.0 and 1.0".to_string(),
                });
            }
        }

        if let Some(v) = config.signatures.min_combined_support {
            if !(0.0..=3.0).contains(&v) {
                return Err(ConfigError::ValidationFailed {
                    field: "signatures.min_combined_support".to_string(),
                    message: "must be between 0.0 and 3.0".to_string(),
                });
            }
        }

        let weights = [
            ("validation.survival_weight", config.validation.survival_weight),
            ("validation.significance_weight", config.validation.significance_weight),
            ("validation.diversity_weight", config.validation.diversity_weight),
        ];
        for (field, value) in weights {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        message: "must be a non-negative number".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut StackscopeConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: StackscopeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut StackscopeConfig, other: &StackscopeConfig) {
        // Analysis
        if other.analysis.min_occurrences.is_some() {
            base.analysis.min_occurrences = other.analysis.min_occurrences;
        }
        if other.analysis.min_sites.is_some() {
            base.analysis.min_sites = other.analysis.min_sites;
        }
        if other.analysis.page_type_filter.is_some() {
            base.analysis.page_type_filter = other.analysis.page_type_filter;
        }
        if other.analysis.detection_threshold.is_some() {
            base.analysis.detection_threshold = other.analysis.detection_threshold;
        }
        if other.analysis.parallel.is_some() {
            base.analysis.parallel = other.analysis.parallel;
        }

        // Bias
        if other.bias.dominance_threshold_pct.is_some() {
            base.bias.dominance_threshold_pct = other.bias.dominance_threshold_pct;
        }
        if other.bias.concentration_threshold.is_some() {
            base.bias.concentration_threshold = other.bias.concentration_threshold;
        }
        if other.bias.unknown_threshold_pct.is_some() {
            base.bias.unknown_threshold_pct = other.bias.unknown_threshold_pct;
        }
        if other.bias.min_distinct_platforms.is_some() {
            base.bias.min_distinct_platforms = other.bias.min_distinct_platforms;
        }
        if other.bias.significance_level.is_some() {
            base.bias.significance_level = other.bias.significance_level;
        }
        if other.bias.min_platform_sample.is_some() {
            base.bias.min_platform_sample = other.bias.min_platform_sample;
        }
        if other.bias.specificity_dominance_cutoff.is_some() {
            base.bias.specificity_dominance_cutoff = other.bias.specificity_dominance_cutoff;
        }

        // Validation
        if other.validation.enable_validation.is_some() {
            base.validation.enable_validation = other.validation.enable_validation;
        }
        if other.validation.skip_statistical_tests.is_some() {
            base.validation.skip_statistical_tests = other.validation.skip_statistical_tests;
        }
        if other.validation.stop_on_error.is_some() {
            base.validation.stop_on_error = other.validation.stop_on_error;
        }
        if other.validation.debug_mode.is_some() {
            base.validation.debug_mode = other.validation.debug_mode;
        }
        if other.validation.sample_size_floor.is_some() {
            base.validation.sample_size_floor = other.validation.sample_size_floor;
        }
        if other.validation.min_concentrated_support.is_some() {
            base.validation.min_concentrated_support = other.validation.min_concentrated_support;
        }
        if other.validation.survival_weight.is_some() {
            base.validation.survival_weight = other.validation.survival_weight;
        }
        if other.validation.significance_weight.is_some() {
            base.validation.significance_weight = other.validation.significance_weight;
        }
        if other.validation.diversity_weight.is_some() {
            base.validation.diversity_weight = other.validation.diversity_weight;
        }

        // Signatures
        if other.signatures.min_discriminative_score.is_some() {
            base.signatures.min_discriminative_score = other.signatures.min_discriminative_score;
        }
        if other.signatures.min_specificity.is_some() {
            base.signatures.min_specificity = other.signatures.min_specificity;
        }
        if other.signatures.active_dimension_threshold.is_some() {
            base.signatures.active_dimension_threshold =
                other.signatures.active_dimension_threshold;
        }
        if other.signatures.min_combined_support.is_some() {
            base.signatures.min_combined_support = other.signatures.min_combined_support;
        }
        if other.signatures.strong_evidence_threshold.is_some() {
            base.signatures.strong_evidence_threshold = other.signatures.strong_evidence_threshold;
        }
        if other.signatures.conflict_score_floor.is_some() {
            base.signatures.conflict_score_floor = other.signatures.conflict_score_floor;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `STACKSCOPE_ANALYSIS_MIN_OCCURRENCES`, `STACKSCOPE_VALIDATION_STOP_ON_ERROR`, etc.
    fn apply_env_overrides(config: &mut StackscopeConfig) {
        if let Ok(val) = std::env::var("STACKSCOPE_ANALYSIS_MIN_OCCURRENCES") {
            if let Ok(v) = val.parse::<u32>() {
                config.analysis.min_occurrences = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STACKSCOPE_ANALYSIS_MIN_SITES") {
            if let Ok(v) = val.parse::<u32>() {
                config.analysis.min_sites = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STACKSCOPE_ANALYSIS_PAGE_TYPE_FILTER") {
            if let Some(v) = PageTypeFilter::from_name(&val) {
                config.analysis.page_type_filter = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STACKSCOPE_VALIDATION_SKIP_STATISTICAL_TESTS") {
            if let Ok(v) = val.parse::<bool>() {
                config.validation.skip_statistical_tests = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STACKSCOPE_VALIDATION_STOP_ON_ERROR") {
            if let Ok(v) = val.parse::<bool>() {
                config.validation.stop_on_error = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STACKSCOPE_VALIDATION_DEBUG_MODE") {
            if let Ok(v) = val.parse::<bool>() {
                config.validation.debug_mode = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut StackscopeConfig, cli: &CliOverrides) {
        if let Some(v) = cli.min_occurrences {
            config.analysis.min_occurrences = Some(v);
        }
        if let Some(v) = cli.min_sites {
            config.analysis.min_sites = Some(v);
        }
        if let Some(v) = cli.page_type_filter {
            config.analysis.page_type_filter = Some(v);
        }
        if let Some(v) = cli.skip_statistical_tests {
            config.validation.skip_statistical_tests = Some(v);
        }
        if let Some(v) = cli.stop_on_error {
            config.validation.stop_on_error = Some(v);
        }
        if let Some(v) = cli.debug_mode {
            config.validation.debug_mode = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
