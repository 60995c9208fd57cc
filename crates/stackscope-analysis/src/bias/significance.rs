//! Chi-square test of independence via `statrs`.
//!
//! The contingency table has two rows (signal present / absent) and one column
//! per label present in the dataset; degrees of freedom = labels − 1.

use statrs::distribution::{ChiSquared, ContinuousCDF};
use stackscope_core::config::BiasThresholds;
use stackscope_core::types::collections::BTreeMap;
use stackscope_core::PlatformLabel;

use super::correlation::LabelBaseline;
use super::types::SignificanceResult;

/// Test whether signal presence is independent of site label.
///
/// `signal_counts` holds sites with the signal per label. `platform_sample_size`
/// is the dataset size of the signal's top label; a significant verdict needs
/// both `p < significance_level` and a sample of at least `min_platform_sample`.
pub fn chi_square_independence(
    signal_counts: &BTreeMap<PlatformLabel, usize>,
    baseline: &LabelBaseline,
    occurrences: usize,
    platform_sample_size: usize,
    thresholds: &BiasThresholds,
) -> SignificanceResult {
    let k = baseline.label_counts.len();
    let df = k.saturating_sub(1);
    let total = baseline.total_sites;

    if k < 2 || occurrences == 0 || occurrences >= total {
        return SignificanceResult::untestable(df, platform_sample_size);
    }

    let n = total as f64;
    let present = occurrences as f64;
    let absent = n - present;

    let mut statistic = 0.0;
    for (label, &label_total) in &baseline.label_counts {
        let hits = signal_counts.get(label).copied().unwrap_or(0).min(label_total);
        let column = label_total as f64;
        let observed_present = hits as f64;
        let observed_absent = column - observed_present;
        let expected_present = present * column / n;
        let expected_absent = absent * column / n;
        if expected_present > 0.0 {
            statistic += (observed_present - expected_present).powi(2) / expected_present;
        }
        if expected_absent > 0.0 {
            statistic += (observed_absent - expected_absent).powi(2) / expected_absent;
        }
    }

    if !statistic.is_finite() {
        return SignificanceResult::untestable(df, platform_sample_size);
    }

    let p_value = p_value(statistic, df);
    let significant = p_value < thresholds.effective_significance_level()
        && platform_sample_size >= thresholds.effective_min_platform_sample() as usize;

    SignificanceResult {
        chi_square: statistic,
        degrees_of_freedom: df,
        p_value,
        platform_sample_size,
        significant,
    }
}

/// Upper-tail probability of the chi-square distribution. Falls back to 1.0
/// when the distribution cannot be built.
pub fn p_value(statistic: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 || statistic <= 0.0 {
        return 1.0;
    }
    match ChiSquared::new(degrees_of_freedom as f64) {
        Ok(dist) => {
            let p = 1.0 - dist.cdf(statistic);
            if p.is_finite() {
                p.clamp(0.0, 1.0)
            } else {
                1.0
            }
        }
        Err(_) => 1.0,
    }
}
