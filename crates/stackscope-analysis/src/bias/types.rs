//! Core types for dataset bias analysis.

use serde::{Deserialize, Serialize};
use stackscope_core::types::collections::BTreeMap;
use stackscope_core::{Dimension, PlatformLabel};
use std::fmt;

/// Count and percentage of one label in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformShare {
    pub count: usize,
    /// `count * 100 / total_sites`.
    pub percentage: f64,
}

/// Severity of a bias warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasSeverity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for BiasSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        })
    }
}

/// What a bias warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasWarningKind {
    Dominance,
    Concentration,
    Unidentified,
    LowDiversity,
}

/// A dataset composition warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasWarning {
    pub severity: BiasSeverity,
    pub kind: BiasWarningKind,
    pub message: String,
}

impl fmt::Display for BiasWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// How much a correlation can be trusted for rule generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationTier {
    Low,
    Medium,
    High,
}

impl RecommendationTier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Scale applied to a signal's discriminative weight when it becomes evidence.
    pub fn evidence_weight(&self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 0.75,
            Self::High => 1.0,
        }
    }
}

/// Chi-square test of independence between signal presence and site label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    /// Dataset sites carrying the signal's top-correlated label.
    pub platform_sample_size: usize,
    pub significant: bool,
}

impl SignificanceResult {
    /// The untestable case: statistic 0, p-value 1.
    pub fn untestable(degrees_of_freedom: usize, platform_sample_size: usize) -> Self {
        Self {
            chi_square: 0.0,
            degrees_of_freedom,
            p_value: 1.0,
            platform_sample_size,
            significant: false,
        }
    }
}

/// Per-signal platform correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCorrelation {
    /// `dimension:name` id.
    pub signal: String,
    pub name: String,
    pub dimension: Dimension,
    pub occurrences: usize,
    pub total_sites: usize,
    /// `occurrences / total_sites`.
    pub frequency: f64,
    /// Sites with the signal per label.
    pub platform_counts: BTreeMap<PlatformLabel, usize>,
    /// P(signal | label), for every label present in the dataset.
    pub platform_frequency: BTreeMap<PlatformLabel, f64>,
    /// P(label | signal), for every label present in the dataset.
    pub conditional_probability: BTreeMap<PlatformLabel, f64>,
    /// Label with the largest lift over its dataset share.
    pub top_platform: Option<PlatformLabel>,
    pub specificity: f64,
    pub bias_adjusted_frequency: f64,
    /// `None` when statistical testing was skipped.
    pub significance: Option<SignificanceResult>,
    pub recommendation: RecommendationTier,
    /// Vendor hinted at by a header name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl SignalCorrelation {
    pub fn is_significant(&self) -> bool {
        self.significance.as_ref().is_some_and(|s| s.significant)
    }

    /// Conditional probability of the top label, 0 when there is none.
    pub fn top_conditional(&self) -> f64 {
        self.top_platform
            .as_ref()
            .and_then(|label| self.conditional_probability.get(label))
            .copied()
            .unwrap_or(0.0)
    }

    /// Every probability-like value with a field path, for sanity checking.
    pub fn bounded_values(&self) -> Vec<(String, f64)> {
        let mut values = vec![
            ("frequency".to_string(), self.frequency),
            ("specificity".to_string(), self.specificity),
            (
                "bias_adjusted_frequency".to_string(),
                self.bias_adjusted_frequency,
            ),
        ];
        for (label, value) in &self.platform_frequency {
            values.push((format!("platform_frequency.{label}"), *value));
        }
        for (label, value) in &self.conditional_probability {
            values.push((format!("conditional_probability.{label}"), *value));
        }
        if let Some(ref sig) = self.significance {
            values.push(("significance.p_value".to_string(), sig.p_value));
        }
        values
    }
}

/// Dataset-wide bias analysis. Created once per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetBiasAnalysis {
    pub total_sites: usize,
    pub platform_distribution: BTreeMap<PlatformLabel, PlatformShare>,
    /// Herfindahl Σ share². 0 for an empty dataset.
    pub concentration_score: f64,
    /// Shannon entropy over label shares.
    pub diversity_index: f64,
    pub distinct_labels: usize,
    pub named_sites: usize,
    pub enterprise_sites: usize,
    pub unknown_sites: usize,
    pub small_dataset: bool,
    pub bias_warnings: Vec<BiasWarning>,
    pub signal_correlations: BTreeMap<String, SignalCorrelation>,
    /// Signals seen on fewer than `min_occurrences` sites.
    pub skipped_signals: usize,
}

impl DatasetBiasAnalysis {
    pub fn label_counts(&self) -> BTreeMap<PlatformLabel, usize> {
        self.platform_distribution
            .iter()
            .map(|(label, share)| (label.clone(), share.count))
            .collect()
    }
}
