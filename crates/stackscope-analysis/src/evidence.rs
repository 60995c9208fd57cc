//! Bridge from validated correlations to signature-engine evidence.

use stackscope_core::types::collections::BTreeMap;
use stackscope_core::{Dimension, PlatformLabel};

use crate::bias::SignalCorrelation;
use crate::signatures::{EvidencePattern, EvidenceSet};
use crate::validation::PipelineResult;

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Convert one validated correlation into an evidence pattern.
///
/// Discriminative score is the top label's conditional probability times the
/// signal's specificity, scaled by its recommendation tier so skew-explained
/// signals count for less. Frequency is the signal's frequency within the most
/// associated named platform, falling back to the overall frequency when no
/// named platform carries it.
pub fn pattern_from_correlation(correlation: &SignalCorrelation) -> EvidencePattern {
    let mut platform_correlation = BTreeMap::new();
    let mut best_named: Option<(&PlatformLabel, f64)> = None;

    for (label, &conditional) in &correlation.conditional_probability {
        let Some(platform) = label.platform() else {
            continue;
        };
        let conditional = unit(conditional);
        platform_correlation.insert(platform.name().to_string(), conditional);
        match best_named {
            Some((_, best)) if conditional <= best => {}
            _ => best_named = Some((label, conditional)),
        }
    }

    let frequency = best_named
        .filter(|(_, conditional)| *conditional > 0.0)
        .and_then(|(label, _)| correlation.platform_frequency.get(label).copied())
        .unwrap_or(correlation.frequency);

    EvidencePattern {
        name: correlation.signal.clone(),
        dimension: correlation.dimension,
        discriminative_score: unit(
            correlation.top_conditional()
                * correlation.specificity
                * correlation.recommendation.evidence_weight(),
        ),
        frequency: unit(frequency),
        specificity: unit(correlation.specificity),
        platform_correlation,
    }
}

/// Evidence per dimension from a pipeline's validated output. All three
/// collections are present, possibly empty.
pub fn patterns_from_validation(result: &PipelineResult) -> EvidenceSet {
    patterns_from_correlations(&result.validated)
}

pub fn patterns_from_correlations(correlations: &[SignalCorrelation]) -> EvidenceSet {
    let mut set = EvidenceSet::new(Vec::new(), Vec::new(), Vec::new());
    for correlation in correlations {
        let pattern = pattern_from_correlation(correlation);
        let collection = match correlation.dimension {
            Dimension::Header => &mut set.headers,
            Dimension::Meta => &mut set.meta_tags,
            Dimension::Script => &mut set.scripts,
        };
        collection.get_or_insert_with(Vec::new).push(pattern);
    }
    set
}
