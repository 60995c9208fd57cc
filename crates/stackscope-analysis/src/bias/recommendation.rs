//! Recommendation tiers for correlations.

use stackscope_core::config::BiasThresholds;

use super::types::{RecommendationTier, SignalCorrelation};

/// Specificity treated as strongly platform-bound.
const HIGH_SPECIFICITY: f64 = 0.7;

/// Specificity needed for a medium recommendation.
const MEDIUM_SPECIFICITY: f64 = 0.4;

/// Bias-adjusted/raw frequency ratio below which support is explained by skew.
const SKEW_RETENTION_FLOOR: f64 = 0.5;

/// Retention needed for a high recommendation below the dominance cutoff.
const HIGH_RETENTION: f64 = 0.8;

/// Bucket a correlation.
///
/// A highly specific signal whose support is explainable by dataset skew (its
/// top label dominates the dataset, or bias adjustment removes most of its
/// frequency) is always `Low`. `High` requires a significant result. When
/// significance was not tested the tier is capped at `Medium`.
pub fn classify_recommendation(
    correlation: &SignalCorrelation,
    top_share: f64,
    thresholds: &BiasThresholds,
) -> RecommendationTier {
    let specificity = correlation.specificity;
    let retention = if correlation.frequency > 0.0 {
        correlation.bias_adjusted_frequency / correlation.frequency
    } else {
        0.0
    };
    let skew_explained = top_share * 100.0 > thresholds.effective_dominance_threshold_pct()
        || retention < SKEW_RETENTION_FLOOR;

    if !specificity.is_finite() || (specificity >= HIGH_SPECIFICITY && skew_explained) {
        return RecommendationTier::Low;
    }

    let cutoff = thresholds.effective_specificity_dominance_cutoff();
    match correlation.significance.as_ref().map(|s| s.significant) {
        Some(true)
            if specificity >= cutoff
                || (specificity >= HIGH_SPECIFICITY && retention >= HIGH_RETENTION) =>
        {
            RecommendationTier::High
        }
        Some(true) if specificity >= MEDIUM_SPECIFICITY => RecommendationTier::Medium,
        None if specificity >= HIGH_SPECIFICITY => RecommendationTier::Medium,
        _ => RecommendationTier::Low,
    }
}
