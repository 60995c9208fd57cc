//! Platform signature synthesis.

use rayon::prelude::*;
use stackscope_core::config::SignatureConfig;
use stackscope_core::errors::{AnalyzerError, ErrorCode};
use stackscope_core::types::collections::BTreeMap;
use stackscope_core::{Dimension, Platform};

use super::conflicts::{detect_conflicts, ConflictCandidate};
use super::cross_dimensional::{
    active_dimensions, correlation_strength, dimension_agreement, supporting_dimensions,
};
use super::scoring::{
    confidence, conflict_penalty, cross_dimensional_score, evidence_boost, pattern_evenness,
    strong_ratio, BoostInputs,
};
use super::support::{dimension_evidence, DimensionEvidence};
use super::types::{
    CrossDimensionalCorrelation, DetectionMethod, EvidencePattern, EvidenceSet, EvidenceSummary,
    PerDimension, PlatformSignature, RankedPlatform, SignatureReport,
};
use crate::containment::contain;

/// Everything computed for one platform before conflicts are known.
struct PlatformAssessment {
    platform: Platform,
    correlation: CrossDimensionalCorrelation,
    synthesis: Option<Synthesis>,
}

struct Synthesis {
    cross_dimensional_score: f64,
    evidence_boost: f64,
    base_confidence: f64,
    summary: EvidenceSummary,
    method: DetectionMethod,
    pattern_names: Vec<String>,
}

/// Scores every candidate platform against per-dimension evidence.
pub struct PlatformSignatureEngine {
    config: SignatureConfig,
    parallel: bool,
}

impl PlatformSignatureEngine {
    pub fn new(config: SignatureConfig) -> Self {
        Self {
            config,
            parallel: true,
        }
    }

    /// Score platforms on the rayon pool (default) or sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Synthesize signatures. Never panics or returns an error: a missing
    /// evidence collection or an internal failure yields a report with
    /// `failed == true`, empty maps, and an explanatory warning.
    pub fn synthesize(&self, evidence: &EvidenceSet) -> SignatureReport {
        let outcome = contain(|| self.synthesize_checked(evidence));
        let error = match outcome {
            Ok(Ok(report)) => return report,
            Ok(Err(error)) => error,
            Err(message) => AnalyzerError::Panicked {
                component: "platform signature engine".to_string(),
                message,
            },
        };
        tracing::error!(error = %error, "signature synthesis failed");
        SignatureReport::failed(error.coded_message())
    }

    fn synthesize_checked(&self, evidence: &EvidenceSet) -> Result<SignatureReport, AnalyzerError> {
        let collections = evidence.require_all()?;
        let mut report = SignatureReport::default();

        for dimension in Dimension::ALL {
            let mismatched = collections
                .get(dimension)
                .iter()
                .filter(|p| p.dimension != dimension)
                .count();
            if mismatched > 0 {
                report.warnings.push(format!(
                    "{mismatched} patterns in the {dimension} collection are tagged with another dimension; scored as {dimension}"
                ));
            }
        }

        let assessments: Vec<PlatformAssessment> = if self.parallel {
            Platform::ALL[..]
                .par_iter()
                .map(|platform| self.assess(*platform, &collections))
                .collect()
        } else {
            Platform::ALL
                .iter()
                .map(|platform| self.assess(*platform, &collections))
                .collect()
        };

        let mut findings = {
            let candidates: BTreeMap<Platform, ConflictCandidate<'_>> = assessments
                .iter()
                .filter_map(|a| {
                    a.synthesis.as_ref().map(|s| {
                        (
                            a.platform,
                            ConflictCandidate {
                                base_confidence: s.base_confidence,
                                pattern_names: &s.pattern_names,
                            },
                        )
                    })
                })
                .collect();
            detect_conflicts(&candidates, self.config.effective_conflict_score_floor())
        };
        report.conflict_matrix = std::mem::take(&mut findings.matrix);

        for assessment in assessments {
            let platform = assessment.platform;
            let correlation = assessment.correlation;
            if supporting_dimensions(&correlation.support) > 0 {
                report.correlations.insert(platform, correlation.clone());
            }
            let Some(synthesis) = assessment.synthesis else {
                continue;
            };

            let conflicts = findings.conflicts.remove(&platform).unwrap_or_default();
            let penalty = conflict_penalty(&conflicts);
            let final_confidence = confidence(
                synthesis.cross_dimensional_score,
                correlation.correlation_strength,
                synthesis.evidence_boost,
                penalty,
            );

            report.signatures.insert(
                platform,
                PlatformSignature {
                    platform,
                    confidence: final_confidence,
                    base_confidence: synthesis.base_confidence,
                    cross_dimensional_score: synthesis.cross_dimensional_score,
                    correlation_strength: correlation.correlation_strength,
                    evidence_boost: synthesis.evidence_boost,
                    conflict_penalty: penalty,
                    evidence: synthesis.summary,
                    conflicts,
                    detection_method: synthesis.method,
                },
            );
        }

        report.ranking = rank(&report.signatures);

        tracing::info!(
            signatures = report.signatures.len(),
            conflicts = report
                .signatures
                .values()
                .map(|s| s.conflicts.len())
                .sum::<usize>(),
            top = ?report.top().map(|r| r.platform),
            "platform signatures synthesized"
        );

        Ok(report)
    }

    fn assess(
        &self,
        platform: Platform,
        collections: &PerDimension<&[EvidencePattern]>,
    ) -> PlatformAssessment {
        let evidence: PerDimension<DimensionEvidence> = PerDimension::from_fn(|dimension| {
            dimension_evidence(collections.get(dimension), platform, &self.config)
        });
        let support = evidence.map(|e| e.support);
        let strength = correlation_strength(&support);
        let active_threshold = self.config.effective_active_dimension_threshold();
        let agreement = dimension_agreement(&support, active_threshold);

        let correlation = CrossDimensionalCorrelation {
            platform,
            support,
            correlation_strength: strength,
            dimension_agreement: agreement,
        };

        let total_support: f64 = support.values().iter().map(|v| **v).sum();
        let method = DetectionMethod::from_dimension_count(supporting_dimensions(&support));
        let synthesis = match method {
            Some(method) if total_support >= self.config.effective_min_combined_support() => {
                let pattern_counts = evidence.map(|e| e.relevant);
                let total_patterns: usize = pattern_counts.values().iter().map(|c| **c).sum();
                let strong: usize = evidence.values().iter().map(|e| e.strong).sum();
                let ratio = strong_ratio(strong, total_patterns);

                let cds = cross_dimensional_score(&support, ratio);
                let boost = evidence_boost(&BoostInputs {
                    agreement,
                    strong_ratio: ratio,
                    correlation_strength: strength,
                    active_dimensions: active_dimensions(&support, active_threshold),
                    evenness: pattern_evenness(&pattern_counts),
                });
                let base_confidence = confidence(cds, strength, boost, 0.0);

                Some(Synthesis {
                    cross_dimensional_score: cds,
                    evidence_boost: boost,
                    base_confidence,
                    summary: EvidenceSummary {
                        pattern_counts,
                        total_patterns,
                        strong_evidence: strong,
                        weak_evidence: total_patterns - strong,
                    },
                    method,
                    pattern_names: evidence
                        .values()
                        .iter()
                        .flat_map(|e| e.pattern_names.iter().cloned())
                        .collect(),
                })
            }
            _ => None,
        };

        PlatformAssessment {
            platform,
            correlation,
            synthesis,
        }
    }
}

/// Descending by ranking score, ties by platform name.
fn rank(signatures: &BTreeMap<Platform, PlatformSignature>) -> Vec<RankedPlatform> {
    let mut ranked: Vec<RankedPlatform> = signatures
        .values()
        .map(|s| RankedPlatform {
            rank: 0,
            platform: s.platform,
            score: s.ranking_score(),
            confidence: s.confidence,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.platform.name().cmp(b.platform.name()))
    });
    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    ranked
}
