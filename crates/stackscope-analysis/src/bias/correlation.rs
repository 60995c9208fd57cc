//! Per-signal platform correlation.

use stackscope_core::config::BiasThresholds;
use stackscope_core::constants::FLOAT_TOLERANCE;
use stackscope_core::types::collections::{BTreeMap, BTreeSet};
use stackscope_core::{Dimension, PlatformLabel};

use super::recommendation::classify_recommendation;
use super::significance::chi_square_independence;
use super::types::{RecommendationTier, SignalCorrelation};
use crate::signals::{infer_vendor, SignalIndex, SignalKey};

/// Dataset label composition that every correlation is measured against.
#[derive(Debug, Clone, Default)]
pub struct LabelBaseline {
    pub total_sites: usize,
    pub label_counts: BTreeMap<PlatformLabel, usize>,
}

impl LabelBaseline {
    pub fn new(label_counts: BTreeMap<PlatformLabel, usize>) -> Self {
        let total_sites = label_counts.values().sum();
        Self {
            total_sites,
            label_counts,
        }
    }

    pub fn from_index(index: &SignalIndex) -> Self {
        Self::new(index.label_counts())
    }

    pub fn count(&self, label: &PlatformLabel) -> usize {
        self.label_counts.get(label).copied().unwrap_or(0)
    }

    /// Dataset share (0..1) of a label.
    pub fn share(&self, label: &PlatformLabel) -> f64 {
        ratio(self.count(label), self.total_sites)
    }

    pub fn distinct_labels(&self) -> usize {
        self.label_counts.len()
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64).clamp(0.0, 1.0)
    }
}

/// Normalized lift of P(label | signal) over the label's dataset share:
/// `(P(L|s) − P(L)) / (1 − P(L))`, clamped to `[0, 1]`. A label holding the
/// whole dataset has no room for lift and scores 0.
fn normalized_lift(conditional: f64, share: f64) -> f64 {
    if share >= 1.0 - FLOAT_TOLERANCE {
        return 0.0;
    }
    let lift = (conditional - share) / (1.0 - share);
    if lift.is_finite() {
        lift.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Compute the full correlation record for one signal.
///
/// `sites` must be a subset of the index's labeled sites. Significance is always
/// computed here; the validation pipeline may recompute or drop it.
pub fn compute_correlation(
    key: &SignalKey,
    sites: &BTreeSet<String>,
    index: &SignalIndex,
    baseline: &LabelBaseline,
    thresholds: &BiasThresholds,
) -> SignalCorrelation {
    let occurrences = sites.len();
    let total_sites = baseline.total_sites;
    let platform_counts = index.label_counts_for(sites);

    let mut platform_frequency = BTreeMap::new();
    let mut conditional_probability = BTreeMap::new();
    let mut top: Option<(PlatformLabel, f64, f64)> = None;

    for (label, &label_total) in &baseline.label_counts {
        let hits = platform_counts.get(label).copied().unwrap_or(0);
        let conditional = ratio(hits, occurrences);
        platform_frequency.insert(label.clone(), ratio(hits, label_total));
        conditional_probability.insert(label.clone(), conditional);

        if occurrences == 0 {
            continue;
        }
        let lift = normalized_lift(conditional, baseline.share(label));
        let better = match top {
            None => true,
            Some((_, best_lift, best_cond)) => {
                lift > best_lift + FLOAT_TOLERANCE
                    || ((lift - best_lift).abs() <= FLOAT_TOLERANCE
                        && conditional > best_cond + FLOAT_TOLERANCE)
            }
        };
        if better {
            top = Some((label.clone(), lift, conditional));
        }
    }

    let frequency = ratio(occurrences, total_sites);
    let (top_platform, specificity) = match top {
        Some((label, lift, _)) => (Some(label), lift),
        None => (None, 0.0),
    };

    let top_share = top_platform
        .as_ref()
        .map(|label| baseline.share(label))
        .unwrap_or(0.0);
    let bias_adjusted_frequency =
        bias_adjusted_frequency(frequency, top_share, baseline.distinct_labels());

    let platform_sample_size = top_platform
        .as_ref()
        .map(|label| baseline.count(label))
        .unwrap_or(0);
    let significance = chi_square_independence(
        &platform_counts,
        baseline,
        occurrences,
        platform_sample_size,
        thresholds,
    );

    let vendor = match key.dimension {
        Dimension::Header => infer_vendor(&key.name).map(|(vendor, _)| vendor.to_string()),
        _ => None,
    };

    let mut correlation = SignalCorrelation {
        signal: key.id(),
        name: key.name.clone(),
        dimension: key.dimension,
        occurrences,
        total_sites,
        frequency,
        platform_counts,
        platform_frequency,
        conditional_probability,
        top_platform,
        specificity,
        bias_adjusted_frequency,
        significance: Some(significance),
        recommendation: RecommendationTier::Low,
        vendor,
    };
    correlation.recommendation = classify_recommendation(&correlation, top_share, thresholds);
    correlation
}

/// Frequency discounted by how far the top label's share exceeds a perfectly
/// balanced share (1/k).
pub fn bias_adjusted_frequency(frequency: f64, top_share: f64, distinct_labels: usize) -> f64 {
    if distinct_labels == 0 {
        return 0.0;
    }
    let balanced = 1.0 / distinct_labels as f64;
    let excess = (top_share - balanced).max(0.0);
    let adjusted = frequency * (1.0 - excess);
    if adjusted.is_finite() {
        adjusted.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
