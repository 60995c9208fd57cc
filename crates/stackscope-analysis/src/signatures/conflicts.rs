//! Mutual-exclusion conflict detection.

use stackscope_core::types::collections::BTreeMap;
use stackscope_core::Platform;

use super::exclusion::MUTUAL_EXCLUSIONS;
use super::types::{ConflictSeverity, ConflictType, PlatformConflict};

/// Contributing patterns listed per conflict.
const MAX_CONTRIBUTING_PATTERNS: usize = 5;

/// What conflict detection needs to know about a synthesized platform.
pub struct ConflictCandidate<'a> {
    pub base_confidence: f64,
    pub pattern_names: &'a [String],
}

/// Conflicts per platform plus the symmetric conflict-score matrix.
#[derive(Debug, Default)]
pub struct ConflictFindings {
    pub conflicts: BTreeMap<Platform, Vec<PlatformConflict>>,
    pub matrix: BTreeMap<Platform, BTreeMap<Platform, f64>>,
}

fn contributing(names: &[String]) -> Vec<String> {
    let mut names = names.to_vec();
    names.sort();
    names.dedup();
    names.truncate(MAX_CONTRIBUTING_PATTERNS);
    names
}

/// For every excluded pair where both platforms have non-zero base confidence,
/// score = c1 × c2 on base confidences, so severity is monotonic in the
/// `base_confidence` product that each signature reports. The matrix records every such score; a conflict is recorded
/// on both platforms when the score exceeds `score_floor`.
pub fn detect_conflicts(
    candidates: &BTreeMap<Platform, ConflictCandidate<'_>>,
    score_floor: f64,
) -> ConflictFindings {
    let mut findings = ConflictFindings::default();

    for &(a, b) in MUTUAL_EXCLUSIONS {
        let (Some(first), Some(second)) = (candidates.get(&a), candidates.get(&b)) else {
            continue;
        };
        if !(first.base_confidence > 0.0 && second.base_confidence > 0.0) {
            continue;
        }
        let score = first.base_confidence * second.base_confidence;
        if !score.is_finite() {
            continue;
        }
        findings.matrix.entry(a).or_default().insert(b, score);
        findings.matrix.entry(b).or_default().insert(a, score);

        if score <= score_floor {
            continue;
        }
        let severity = ConflictSeverity::from_score(score);
        tracing::debug!(%a, %b, score, ?severity, "mutual-exclusion conflict");

        findings.conflicts.entry(a).or_default().push(PlatformConflict {
            conflicting_platform: b,
            conflict_type: ConflictType::MutualExclusion,
            severity,
            score,
            contributing_patterns: contributing(second.pattern_names),
        });
        findings.conflicts.entry(b).or_default().push(PlatformConflict {
            conflicting_platform: a,
            conflict_type: ConflictType::MutualExclusion,
            severity,
            score,
            contributing_patterns: contributing(first.pattern_names),
        });
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates<'a>(
        pairs: &[(Platform, f64)],
        names: &'a [String],
    ) -> BTreeMap<Platform, ConflictCandidate<'a>> {
        pairs
            .iter()
            .map(|(p, c)| {
                (
                    *p,
                    ConflictCandidate {
                        base_confidence: *c,
                        pattern_names: names,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_conflict_recorded_on_both_sides() {
        let names = vec!["b".to_string(), "a".to_string(), "a".to_string()];
        let c = candidates(&[(Platform::WordPress, 0.9), (Platform::Drupal, 0.85)], &names);
        let findings = detect_conflicts(&c, 0.02);
        let wp = &findings.conflicts[&Platform::WordPress];
        assert_eq!(wp.len(), 1);
        assert_eq!(wp[0].conflicting_platform, Platform::Drupal);
        assert_eq!(wp[0].severity, ConflictSeverity::High);
        assert_eq!(wp[0].contributing_patterns, vec!["a", "b"]);
        assert_eq!(findings.conflicts[&Platform::Drupal].len(), 1);
        assert_eq!(
            findings.matrix[&Platform::Drupal][&Platform::WordPress],
            findings.matrix[&Platform::WordPress][&Platform::Drupal]
        );
    }

    #[test]
    fn test_non_exclusive_pair_ignored() {
        let c = candidates(&[(Platform::WordPress, 0.9), (Platform::Shopify, 0.9)], &[]);
        let findings = detect_conflicts(&c, 0.02);
        assert!(findings.conflicts.is_empty());
        assert!(findings.matrix.is_empty());
    }

    #[test]
    fn test_below_floor_only_in_matrix() {
        let c = candidates(&[(Platform::Shopify, 0.1), (Platform::Magento, 0.1)], &[]);
        let findings = detect_conflicts(&c, 0.02);
        assert!(findings.conflicts.is_empty());
        assert!((findings.matrix[&Platform::Shopify][&Platform::Magento] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_severity_monotonic() {
        let mut last = ConflictSeverity::Low;
        for step in 1..=100 {
            let score = step as f64 / 100.0;
            let severity = ConflictSeverity::from_score(score);
            assert!(severity >= last);
            last = severity;
        }
    }
}
