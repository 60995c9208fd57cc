//! Dataset composition warnings.

use stackscope_core::config::BiasThresholds;
use stackscope_core::types::collections::BTreeMap;
use stackscope_core::PlatformLabel;

use super::types::{BiasSeverity, BiasWarning, BiasWarningKind, PlatformShare};

/// Dominance above this percentage is critical rather than a warning.
const CRITICAL_DOMINANCE_PCT: f64 = 90.0;

/// Percentage for messages: exactly integral values print without decimals
/// ("80%"), everything else with one decimal ("33.3%", "70.0%").
pub fn format_pct(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{pct:.0}")
    } else {
        format!("{pct:.1}")
    }
}

/// Warnings in fixed order: dominance, concentration, unidentified, diversity.
/// An empty dataset produces none.
pub fn bias_warnings(
    distribution: &BTreeMap<PlatformLabel, PlatformShare>,
    total_sites: usize,
    concentration: f64,
    thresholds: &BiasThresholds,
) -> Vec<BiasWarning> {
    let mut warnings = Vec::new();
    if total_sites == 0 {
        return warnings;
    }

    let dominance_pct = thresholds.effective_dominance_threshold_pct();
    for (label, share) in distribution {
        if share.percentage > dominance_pct {
            let severity = if share.percentage > CRITICAL_DOMINANCE_PCT {
                BiasSeverity::Critical
            } else {
                BiasSeverity::Warning
            };
            warnings.push(BiasWarning {
                severity,
                kind: BiasWarningKind::Dominance,
                message: format!(
                    "Dataset dominated by {label}: {}% of {total_sites} sites. \
                     Signal correlations will skew toward {label}",
                    format_pct(share.percentage)
                ),
            });
        }
    }

    let concentration_threshold = thresholds.effective_concentration_threshold();
    if concentration > concentration_threshold {
        warnings.push(BiasWarning {
            severity: BiasSeverity::Warning,
            kind: BiasWarningKind::Concentration,
            message: format!(
                "High dataset concentration ({concentration:.2} > {concentration_threshold:.2}): \
                 a few labels account for most sites"
            ),
        });
    }

    let unknown_pct = distribution
        .get(&PlatformLabel::Unknown)
        .map(|s| s.percentage)
        .unwrap_or(0.0);
    if unknown_pct > thresholds.effective_unknown_threshold_pct() {
        warnings.push(BiasWarning {
            severity: BiasSeverity::Warning,
            kind: BiasWarningKind::Unidentified,
            message: format!(
                "High percentage of unidentified sites ({}%): correlations rest on the labeled minority",
                format_pct(unknown_pct)
            ),
        });
    }

    let min_platforms = thresholds.effective_min_distinct_platforms() as usize;
    let named = distribution.keys().filter(|label| label.is_named()).count();
    let unknown_as_extra_bucket = distribution.contains_key(&PlatformLabel::Unknown)
        && distribution.len() > min_platforms;
    if named < min_platforms && !unknown_as_extra_bucket {
        warnings.push(BiasWarning {
            severity: BiasSeverity::Warning,
            kind: BiasWarningKind::LowDiversity,
            message: format!(
                "Low CMS diversity: {named} named platform(s) present, at least {min_platforms} expected"
            ),
        });
    }

    warnings
}
