//! Bias & distribution analysis: dataset composition, per-signal platform
//! correlation, chi-square significance, and bias warnings.

pub mod analyzer;
pub mod correlation;
pub mod distribution;
pub mod recommendation;
pub mod significance;
pub mod types;
pub mod warnings;

pub use analyzer::BiasAnalyzer;
pub use correlation::{compute_correlation, LabelBaseline};
pub use recommendation::classify_recommendation;
pub use significance::chi_square_independence;
pub use types::{
    BiasSeverity, BiasWarning, BiasWarningKind, DatasetBiasAnalysis, PlatformShare,
    RecommendationTier, SignalCorrelation, SignificanceResult,
};
