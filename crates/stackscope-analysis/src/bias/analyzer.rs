//! Bias analyzer: dataset composition plus per-signal correlations.

use rayon::prelude::*;
use stackscope_core::{PlatformLabel, SiteRecord, StackscopeConfig};

use super::correlation::{compute_correlation, LabelBaseline};
use super::distribution::{concentration_score, diversity_index, platform_distribution};
use super::types::{DatasetBiasAnalysis, SignalCorrelation};
use super::warnings::bias_warnings;
use crate::signals::{SignalAggregator, SignalIndex};

/// Computes a [`DatasetBiasAnalysis`] from an aggregated signal index.
pub struct BiasAnalyzer {
    config: StackscopeConfig,
}

impl BiasAnalyzer {
    pub fn new(config: StackscopeConfig) -> Self {
        Self { config }
    }

    /// Aggregate `records` and analyze them in one go.
    pub fn analyze_records(&self, records: &[SiteRecord]) -> (SignalIndex, DatasetBiasAnalysis) {
        let index = SignalAggregator::new(self.config.analysis.clone()).build(records);
        let analysis = self.analyze(&index);
        (index, analysis)
    }

    pub fn analyze(&self, index: &SignalIndex) -> DatasetBiasAnalysis {
        let thresholds = &self.config.bias;
        let baseline = LabelBaseline::from_index(index);
        let total_sites = baseline.total_sites;

        let distribution = platform_distribution(&baseline.label_counts, total_sites);
        let concentration = concentration_score(&baseline.label_counts, total_sites);
        let diversity = diversity_index(&baseline.label_counts, total_sites);
        let warnings = bias_warnings(&distribution, total_sites, concentration, thresholds);
        for warning in &warnings {
            tracing::warn!(kind = ?warning.kind, severity = %warning.severity, "{}", warning.message);
        }

        let min_sites = self.config.analysis.effective_min_sites() as usize;
        let small_dataset = total_sites > 0 && total_sites < min_sites;
        if small_dataset {
            tracing::warn!(
                total_sites,
                min_sites,
                "small dataset: statistical claims are unreliable"
            );
        }

        let min_occurrences = self.config.analysis.effective_min_occurrences() as usize;
        let candidates: Vec<_> = index.signals_with_min_occurrences(min_occurrences).collect();
        let skipped_signals = index.signal_count() - candidates.len();

        let compute = |occ: &&crate::signals::SignalOccurrence| -> SignalCorrelation {
            compute_correlation(&occ.key, &occ.sites, index, &baseline, thresholds)
        };
        let correlations: Vec<SignalCorrelation> = if self.config.analysis.effective_parallel() {
            candidates.par_iter().map(compute).collect()
        } else {
            candidates.iter().map(compute).collect()
        };

        let named_sites = count_where(&baseline, |label| label.is_named());
        let enterprise_sites = baseline.count(&PlatformLabel::Enterprise);
        let unknown_sites = baseline.count(&PlatformLabel::Unknown);

        tracing::debug!(
            total_sites,
            correlations = correlations.len(),
            skipped_signals,
            concentration,
            "bias analysis complete"
        );

        DatasetBiasAnalysis {
            total_sites,
            distinct_labels: distribution.len(),
            platform_distribution: distribution,
            concentration_score: concentration,
            diversity_index: diversity,
            named_sites,
            enterprise_sites,
            unknown_sites,
            small_dataset,
            bias_warnings: warnings,
            signal_correlations: correlations
                .into_iter()
                .map(|c| (c.signal.clone(), c))
                .collect(),
            skipped_signals,
        }
    }
}

fn count_where(baseline: &LabelBaseline, predicate: impl Fn(&PlatformLabel) -> bool) -> usize {
    baseline
        .label_counts
        .iter()
        .filter(|(label, _)| predicate(label))
        .map(|(_, count)| *count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_and_sequential_agree() {
        let records: Vec<SiteRecord> = (0..12)
            .map(|i| {
                let platform = ["WordPress", "Drupal", "Joomla"][i % 3];
                SiteRecord::new(format!("https://site{i}.example"))
                    .with_header("server", "nginx")
                    .with_header(&format!("x-{}", platform.to_lowercase()), "1")
                    .with_detection(platform, 0.9)
            })
            .collect();

        let mut sequential = StackscopeConfig::default();
        sequential.analysis.parallel = Some(false);

        let (_, par) = BiasAnalyzer::new(StackscopeConfig::default()).analyze_records(&records);
        let (_, seq) = BiasAnalyzer::new(sequential).analyze_records(&records);
        assert_eq!(
            serde_json::to_string(&par).unwrap(),
            serde_json::to_string(&seq).unwrap()
        );
        assert_eq!(par.signal_correlations.len(), 4);
        assert_eq!(par.named_sites, 12);
    }
}
