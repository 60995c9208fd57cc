//! Cross-dimensional score, evidence boost, and conflict penalty.

use stackscope_core::constants::{
    MAX_CONFLICT_PENALTY, MAX_EVIDENCE_BOOST, MAX_EVIDENCE_DENSITY_BONUS,
};

use super::types::{ConflictType, PerDimension, PlatformConflict};

const AGREEMENT_BOOST: f64 = 0.15;
const STRONG_RATIO_BOOST: f64 = 0.2;
const STRENGTH_BOOST: f64 = 0.1;
const STRENGTH_BOOST_THRESHOLD: f64 = 0.8;
const EXTRA_DIMENSION_BOOST: f64 = 0.05;
const DIVERSITY_BOOST: f64 = 0.1;
const MUTUAL_EXCLUSION_PENALTY: f64 = 0.1;

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Strong patterns over relevant patterns; 0 with no relevant patterns.
pub fn strong_ratio(strong: usize, relevant: usize) -> f64 {
    if relevant == 0 {
        0.0
    } else {
        strong as f64 / relevant as f64
    }
}

/// Mean support plus an evidence-density bonus for a high strong-evidence ratio.
pub fn cross_dimensional_score(support: &PerDimension<f64>, strong_ratio: f64) -> f64 {
    let mean = support.values().iter().map(|v| **v).sum::<f64>() / 3.0;
    let bonus = (strong_ratio * MAX_EVIDENCE_DENSITY_BONUS).min(MAX_EVIDENCE_DENSITY_BONUS);
    unit(mean + bonus.max(0.0))
}

/// Evenness of pattern counts across dimensions: 1 for equal counts, 0 when all
/// patterns sit in one dimension.
pub fn pattern_evenness(counts: &PerDimension<usize>) -> f64 {
    let values = counts.values().map(|c| *c as f64);
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let mean = total / 3.0;
    let variance = values.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / 3.0;
    // Variance peaks at 2·mean² when one dimension holds every pattern.
    unit(1.0 - variance / (2.0 * mean * mean))
}

/// Inputs to the evidence boost.
pub struct BoostInputs {
    pub agreement: bool,
    pub strong_ratio: f64,
    pub correlation_strength: f64,
    pub active_dimensions: usize,
    pub evenness: f64,
}

/// Additive boost for well-corroborated evidence, capped.
pub fn evidence_boost(inputs: &BoostInputs) -> f64 {
    let mut boost = 0.0;
    if inputs.agreement {
        boost += AGREEMENT_BOOST;
    }
    boost += STRONG_RATIO_BOOST * unit(inputs.strong_ratio);
    if inputs.correlation_strength > STRENGTH_BOOST_THRESHOLD {
        boost += STRENGTH_BOOST;
    }
    boost += EXTRA_DIMENSION_BOOST * inputs.active_dimensions.saturating_sub(1) as f64;
    boost += DIVERSITY_BOOST * unit(inputs.evenness);
    boost.clamp(0.0, MAX_EVIDENCE_BOOST)
}

/// Sum of severity weights (plus the mutual-exclusion surcharge), capped.
pub fn conflict_penalty(conflicts: &[PlatformConflict]) -> f64 {
    let total: f64 = conflicts
        .iter()
        .map(|conflict| {
            let surcharge = match conflict.conflict_type {
                ConflictType::MutualExclusion => MUTUAL_EXCLUSION_PENALTY,
            };
            conflict.severity.weight() + surcharge
        })
        .sum();
    total.clamp(0.0, MAX_CONFLICT_PENALTY)
}

/// `clamp(cds × strength + boost − penalty, 0, 1)`.
pub fn confidence(cds: f64, strength: f64, boost: f64, penalty: f64) -> f64 {
    unit(cds * strength + boost - penalty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::types::ConflictSeverity;
    use stackscope_core::Platform;

    fn conflict(severity: ConflictSeverity) -> PlatformConflict {
        PlatformConflict {
            conflicting_platform: Platform::Drupal,
            conflict_type: ConflictType::MutualExclusion,
            severity,
            score: 0.5,
            contributing_patterns: Vec::new(),
        }
    }

    #[test]
    fn test_evenness_bounds() {
        let even = PerDimension { header: 2, meta: 2, script: 2 };
        let lopsided = PerDimension { header: 6, meta: 0, script: 0 };
        let none = PerDimension { header: 0, meta: 0, script: 0 };
        assert!((pattern_evenness(&even) - 1.0).abs() < 1e-12);
        assert!(pattern_evenness(&lopsided).abs() < 1e-12);
        assert_eq!(pattern_evenness(&none), 0.0);
    }

    #[test]
    fn test_boost_is_capped() {
        let boost = evidence_boost(&BoostInputs {
            agreement: true,
            strong_ratio: 1.0,
            correlation_strength: 0.95,
            active_dimensions: 3,
            evenness: 1.0,
        });
        assert_eq!(boost, MAX_EVIDENCE_BOOST);

        let small = evidence_boost(&BoostInputs {
            agreement: false,
            strong_ratio: 0.5,
            correlation_strength: 0.5,
            active_dimensions: 1,
            evenness: 0.0,
        });
        assert!((small - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_penalty_weights_and_cap() {
        assert!((conflict_penalty(&[conflict(ConflictSeverity::Low)]) - 0.15).abs() < 1e-12);
        assert!((conflict_penalty(&[conflict(ConflictSeverity::High)]) - 0.4).abs() < 1e-12);
        let many = vec![conflict(ConflictSeverity::High); 3];
        assert_eq!(conflict_penalty(&many), MAX_CONFLICT_PENALTY);
    }

    #[test]
    fn test_cross_dimensional_score_bonus_capped() {
        let support = PerDimension { header: 0.9, meta: 0.9, script: 0.9 };
        assert_eq!(cross_dimensional_score(&support, 1.0), 1.0);
        let weak = PerDimension { header: 0.3, meta: 0.0, script: 0.0 };
        assert!((cross_dimensional_score(&weak, 0.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(confidence(1.0, 1.0, 0.4, 0.0), 1.0);
        assert_eq!(confidence(0.1, 0.5, 0.0, 0.6), 0.0);
        assert_eq!(confidence(f64::NAN, 1.0, 0.0, 0.0), 0.0);
    }
}
