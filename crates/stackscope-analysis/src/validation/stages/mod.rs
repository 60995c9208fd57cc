//! The seven built-in stages, in execution order.

pub mod correlation;
pub mod distribution;
pub mod frequency;
pub mod recommendation;
pub mod sample_size;
pub mod sanity;
pub mod significance;

pub use correlation::CorrelationCalculationStage;
pub use distribution::DistributionAnalysisStage;
pub use frequency::FrequencyFilterStage;
pub use recommendation::RecommendationStage;
pub use sample_size::SampleSizeFilterStage;
pub use sanity::SanityCheckStage;
pub use significance::SignificanceTestingStage;

use super::stage::ValidationStage;

/// Every built-in stage, in the required order.
pub fn default_stages() -> Vec<Box<dyn ValidationStage>> {
    vec![
        Box::new(FrequencyFilterStage),
        Box::new(SampleSizeFilterStage),
        Box::new(DistributionAnalysisStage),
        Box::new(CorrelationCalculationStage),
        Box::new(SanityCheckStage),
        Box::new(SignificanceTestingStage),
        Box::new(RecommendationStage),
    ]
}
