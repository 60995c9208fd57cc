//! Per-dimension support for a platform.

use serde::{Deserialize, Serialize};
use stackscope_core::config::SignatureConfig;
use stackscope_core::Platform;

use super::relevance::{is_relevant, platform_specificity};
use super::types::EvidencePattern;

/// Support and the relevant-pattern tally for one (platform, dimension).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionEvidence {
    /// In `[0, 1]`; 0 when no pattern is relevant.
    pub support: f64,
    pub relevant: usize,
    pub strong: usize,
    pub pattern_names: Vec<String>,
}

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Mean of `discriminative × platform specificity × frequency` over the
/// patterns relevant to `platform` whose discriminative score and specificity
/// clear the configured minimums.
pub fn dimension_evidence(
    patterns: &[EvidencePattern],
    platform: Platform,
    config: &SignatureConfig,
) -> DimensionEvidence {
    let min_disc = config.effective_min_discriminative_score();
    let min_spec = config.effective_min_specificity();
    let strong_threshold = config.effective_strong_evidence_threshold();

    let mut evidence = DimensionEvidence::default();
    let mut sum = 0.0;

    for pattern in patterns {
        if !(pattern.discriminative_score > min_disc && pattern.specificity > min_spec) {
            continue;
        }
        if !is_relevant(pattern, platform) {
            continue;
        }
        let contribution = unit(pattern.discriminative_score)
            * platform_specificity(pattern, platform)
            * unit(pattern.frequency);
        sum += unit(contribution);
        evidence.relevant += 1;
        if pattern.discriminative_score > strong_threshold {
            evidence.strong += 1;
        }
        evidence.pattern_names.push(pattern.name.clone());
    }

    if evidence.relevant > 0 {
        evidence.support = unit(sum / evidence.relevant as f64);
    }
    evidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackscope_core::Dimension;

    #[test]
    fn test_support_is_mean_of_products() {
        let patterns = vec![
            EvidencePattern::new("meta:generator=wordpress", Dimension::Meta, 1.0, 0.8, 0.9),
            EvidencePattern::new("meta:wp-json", Dimension::Meta, 0.5, 0.4, 0.5),
            EvidencePattern::new("meta:viewport", Dimension::Meta, 0.9, 1.0, 0.9),
        ];
        let evidence = dimension_evidence(&patterns, Platform::WordPress, &SignatureConfig::default());
        assert_eq!(evidence.relevant, 2);
        assert_eq!(evidence.strong, 1);
        let expected = (1.0 * 0.9 * 0.8 + 0.5 * 0.5 * 0.4) / 2.0;
        assert!((evidence.support - expected).abs() < 1e-12);
    }

    #[test]
    fn test_weak_patterns_excluded() {
        let patterns = vec![
            EvidencePattern::new("header:x-drupal-cache", Dimension::Header, 0.3, 0.9, 0.9),
            EvidencePattern::new("header:x-drupal-dynamic", Dimension::Header, 0.9, 0.9, f64::NAN),
        ];
        let evidence = dimension_evidence(&patterns, Platform::Drupal, &SignatureConfig::default());
        assert_eq!(evidence.relevant, 0);
        assert_eq!(evidence.support, 0.0);
    }
}
