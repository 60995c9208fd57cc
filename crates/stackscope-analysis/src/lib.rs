//! stackscope-analysis: evidence fusion over observed web-technology signals.
//!
//! Data flows strictly left to right:
//! Signal Aggregator → Bias Analyzer → Validation Pipeline → Platform Signature Engine.
//! Every public entry point returns data; failures are represented in the result,
//! never raised to the caller.

pub mod analyzer;
pub mod bias;
mod containment;
pub mod evidence;
pub mod signals;
pub mod signatures;
pub mod validation;

pub use analyzer::{AnalysisReport, SiteAnalyzer};
pub use bias::{BiasAnalyzer, DatasetBiasAnalysis, SignalCorrelation};
pub use signals::{SignalAggregator, SignalIndex};
pub use signatures::{PlatformSignatureEngine, SignatureReport};
pub use validation::{PipelineResult, ValidationPipeline};
