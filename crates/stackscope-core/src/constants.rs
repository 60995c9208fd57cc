//! Shared constants for the stackscope analysis engine.
//!
//! Several of these thresholds were tuned against observed corpora rather than derived
//! statistically. They are exposed through configuration and should be treated as
//! defaults, not as authoritative values.

// ---- Aggregation ----

/// Default minimum number of sites a signal must occur on to be analyzed.
pub const DEFAULT_MIN_OCCURRENCES: u32 = 3;

/// Default minimum dataset size below which a small-dataset warning is emitted.
pub const DEFAULT_MIN_SITES: u32 = 10;

/// Default confidence a candidate detection must exceed to name a site's platform.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.5;

// ---- Bias analysis ----

/// Percentage above which a single label dominates the dataset.
pub const DEFAULT_DOMINANCE_THRESHOLD_PCT: f64 = 70.0;

/// Herfindahl concentration above which the dataset is flagged as concentrated.
pub const DEFAULT_CONCENTRATION_THRESHOLD: f64 = 0.4;

/// Percentage of `Unknown` sites above which identification coverage is flagged.
pub const DEFAULT_UNKNOWN_THRESHOLD_PCT: f64 = 50.0;

/// Minimum number of distinct named platforms before diversity is flagged.
pub const DEFAULT_MIN_DISTINCT_PLATFORMS: u32 = 3;

/// Chi-square significance level.
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Minimum sites carrying the correlated platform for a significance claim.
pub const DEFAULT_MIN_PLATFORM_SAMPLE: u32 = 30;

/// Specificity at or above which a signal is considered platform-dominant.
pub const DEFAULT_SPECIFICITY_DOMINANCE_CUTOFF: f64 = 0.9;

// ---- Validation pipeline ----

/// Absolute occurrence floor applied by the sample-size stage.
pub const DEFAULT_SAMPLE_SIZE_FLOOR: u32 = 30;

/// Sites needed before a 100%-concentrated signal is considered plausible.
pub const DEFAULT_MIN_CONCENTRATED_SUPPORT: u32 = 5;

/// Quality-score weight for the fraction of signals surviving all filters.
pub const DEFAULT_SURVIVAL_WEIGHT: f64 = 0.4;

/// Quality-score weight for the fraction of survivors marked significant.
pub const DEFAULT_SIGNIFICANCE_WEIGHT: f64 = 0.4;

/// Quality-score weight for dataset diversity (1 - concentration).
pub const DEFAULT_DIVERSITY_WEIGHT: f64 = 0.2;

// ---- Platform signatures ----

/// Minimum discriminative score for a pattern to count as platform evidence.
pub const DEFAULT_MIN_DISCRIMINATIVE_SCORE: f64 = 0.3;

/// Minimum specificity for a pattern to count as platform evidence.
pub const DEFAULT_MIN_PATTERN_SPECIFICITY: f64 = 0.3;

/// Support above which a dimension counts as active for a platform.
pub const DEFAULT_ACTIVE_DIMENSION_THRESHOLD: f64 = 0.3;

/// Summed dimension support required before a signature is synthesized.
pub const DEFAULT_MIN_COMBINED_SUPPORT: f64 = 0.3;

/// Discriminative score above which a pattern is strong evidence.
pub const DEFAULT_STRONG_EVIDENCE_THRESHOLD: f64 = 0.8;

/// Conflict score above which a mutual-exclusion conflict is recorded.
pub const DEFAULT_CONFLICT_SCORE_FLOOR: f64 = 0.02;

/// Upper bound on the evidence boost added to a signature.
pub const MAX_EVIDENCE_BOOST: f64 = 0.4;

/// Upper bound on the conflict penalty subtracted from a signature.
pub const MAX_CONFLICT_PENALTY: f64 = 0.6;

/// Upper bound on the evidence density bonus in the cross-dimensional score.
pub const MAX_EVIDENCE_DENSITY_BONUS: f64 = 0.3;

/// Floating tolerance for percentage and probability comparisons.
pub const FLOAT_TOLERANCE: f64 = 1e-9;
