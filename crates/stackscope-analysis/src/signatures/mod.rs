//! Platform signature engine: fuses per-dimension evidence into calibrated,
//! conflict-aware platform confidences.

pub mod conflicts;
pub mod cross_dimensional;
pub mod engine;
pub mod exclusion;
pub mod relevance;
pub mod scoring;
pub mod support;
pub mod types;

pub use engine::PlatformSignatureEngine;
pub use types::{
    ConflictSeverity, ConflictType, CrossDimensionalCorrelation, DetectionMethod, EvidencePattern,
    EvidenceSet, EvidenceSummary, PerDimension, PlatformConflict, PlatformSignature,
    RankedPlatform, SignatureReport,
};
