//! Aggregation and labeling configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::PageTypeFilter;

/// Configuration for signal aggregation and site labeling.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum sites a signal must occur on. Default: 3.
    pub min_occurrences: Option<u32>,
    /// Dataset size below which a small-dataset warning is emitted. Default: 10.
    pub min_sites: Option<u32>,
    /// Which page types contribute header signals. Default: all.
    pub page_type_filter: Option<PageTypeFilter>,
    /// Confidence a detection must exceed to name a site's platform. Default: 0.5.
    pub detection_threshold: Option<f64>,
    /// Compute per-signal and per-platform work on the rayon pool. Default: true.
    pub parallel: Option<bool>,
}

impl AnalysisConfig {
    pub fn effective_min_occurrences(&self) -> u32 {
        self.min_occurrences
            .unwrap_or(constants::DEFAULT_MIN_OCCURRENCES)
            .max(1)
    }

    pub fn effective_min_sites(&self) -> u32 {
        self.min_sites.unwrap_or(constants::DEFAULT_MIN_SITES)
    }

    pub fn effective_page_type_filter(&self) -> PageTypeFilter {
        self.page_type_filter.unwrap_or_default()
    }

    pub fn effective_detection_threshold(&self) -> f64 {
        self.detection_threshold
            .unwrap_or(constants::DEFAULT_DETECTION_THRESHOLD)
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
