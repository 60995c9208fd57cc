//! End-to-end analysis: aggregation → bias → validation → signatures.

use serde::{Deserialize, Serialize};
use stackscope_core::errors::ErrorCode;
use stackscope_core::{SiteRecord, StackscopeConfig};

use crate::bias::{BiasAnalyzer, DatasetBiasAnalysis};
use crate::evidence::patterns_from_validation;
use crate::signals::{SignalAggregator, SignalIndex};
use crate::signatures::{PlatformSignatureEngine, SignatureReport};
use crate::validation::{PipelineResult, ValidationPipeline};

/// Shape of the aggregated index, without the per-site detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub total_sites: usize,
    pub signal_count: usize,
    /// Coded messages for tolerated input problems.
    pub input_issues: Vec<String>,
}

impl IndexSummary {
    pub fn from_index(index: &SignalIndex) -> Self {
        Self {
            total_sites: index.total_sites,
            signal_count: index.signal_count(),
            input_issues: index.issues.iter().map(|e| e.coded_message()).collect(),
        }
    }
}

/// Everything one analysis produced. Plain data; serializes deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub index_summary: IndexSummary,
    pub bias: DatasetBiasAnalysis,
    /// `None` when validation is disabled.
    pub validation: Option<PipelineResult>,
    /// `None` when validation is disabled, since signatures need validated evidence.
    pub signatures: Option<SignatureReport>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the whole chain with one caller-constructed configuration.
pub struct SiteAnalyzer {
    config: StackscopeConfig,
}

impl SiteAnalyzer {
    pub fn new(config: StackscopeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StackscopeConfig {
        &self.config
    }

    pub fn analyze(&self, records: &[SiteRecord]) -> AnalysisReport {
        let index = SignalAggregator::new(self.config.analysis.clone()).build(records);
        self.analyze_index(&index)
    }

    /// Analyze an already aggregated index.
    pub fn analyze_index(&self, index: &SignalIndex) -> AnalysisReport {
        let bias = BiasAnalyzer::new(self.config.clone()).analyze(index);

        let validation = self
            .config
            .validation
            .effective_enable_validation()
            .then(|| ValidationPipeline::new().run(&bias, index, &self.config));

        let signatures = validation.as_ref().map(|result| {
            PlatformSignatureEngine::new(self.config.signatures.clone())
                .with_parallel(self.config.analysis.effective_parallel())
                .synthesize(&patterns_from_validation(result))
        });

        AnalysisReport {
            index_summary: IndexSummary::from_index(index),
            bias,
            validation,
            signatures,
        }
    }
}
