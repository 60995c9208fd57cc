//! Core types for platform signatures.

use serde::{Deserialize, Serialize};
use stackscope_core::errors::AnalyzerError;
use stackscope_core::types::collections::BTreeMap;
use stackscope_core::{Dimension, Platform};

/// A validated, dimension-tagged piece of evidence produced upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePattern {
    pub name: String,
    pub dimension: Dimension,
    pub discriminative_score: f64,
    pub frequency: f64,
    pub specificity: f64,
    /// Association of the pattern with named platforms, keyed by platform name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub platform_correlation: BTreeMap<String, f64>,
}

impl EvidencePattern {
    pub fn new(
        name: impl Into<String>,
        dimension: Dimension,
        discriminative_score: f64,
        frequency: f64,
        specificity: f64,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            discriminative_score,
            frequency,
            specificity,
            platform_correlation: BTreeMap::new(),
        }
    }

    pub fn with_correlation(mut self, platform: Platform, value: f64) -> Self {
        self.platform_correlation
            .insert(platform.name().to_string(), value);
        self
    }
}

/// Evidence collections per dimension. A `None` collection was never produced
/// upstream, which is different from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSet {
    pub headers: Option<Vec<EvidencePattern>>,
    pub meta_tags: Option<Vec<EvidencePattern>>,
    pub scripts: Option<Vec<EvidencePattern>>,
}

impl EvidenceSet {
    pub fn new(
        headers: Vec<EvidencePattern>,
        meta_tags: Vec<EvidencePattern>,
        scripts: Vec<EvidencePattern>,
    ) -> Self {
        Self {
            headers: Some(headers),
            meta_tags: Some(meta_tags),
            scripts: Some(scripts),
        }
    }

    pub fn collection(&self, dimension: Dimension) -> Option<&[EvidencePattern]> {
        match dimension {
            Dimension::Header => self.headers.as_deref(),
            Dimension::Meta => self.meta_tags.as_deref(),
            Dimension::Script => self.scripts.as_deref(),
        }
    }

    /// All three collections, or the first missing one as an error.
    pub fn require_all(&self) -> Result<PerDimension<&[EvidencePattern]>, AnalyzerError> {
        let get = |dimension: Dimension| {
            self.collection(dimension)
                .ok_or_else(|| AnalyzerError::MissingEvidence {
                    dimension: dimension.to_string(),
                })
        };
        Ok(PerDimension {
            header: get(Dimension::Header)?,
            meta: get(Dimension::Meta)?,
            script: get(Dimension::Script)?,
        })
    }
}

/// One value per evidence dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerDimension<T> {
    pub header: T,
    pub meta: T,
    pub script: T,
}

impl<T> PerDimension<T> {
    pub fn from_fn(mut f: impl FnMut(Dimension) -> T) -> Self {
        Self {
            header: f(Dimension::Header),
            meta: f(Dimension::Meta),
            script: f(Dimension::Script),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &T {
        match dimension {
            Dimension::Header => &self.header,
            Dimension::Meta => &self.meta,
            Dimension::Script => &self.script,
        }
    }

    pub fn values(&self) -> [&T; 3] {
        [&self.header, &self.meta, &self.script]
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerDimension<U> {
        PerDimension {
            header: f(&self.header),
            meta: f(&self.meta),
            script: f(&self.script),
        }
    }
}

/// How consistently the three dimensions support one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossDimensionalCorrelation {
    pub platform: Platform,
    pub support: PerDimension<f64>,
    pub correlation_strength: f64,
    pub dimension_agreement: bool,
}

/// Pattern counts behind a signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    pub pattern_counts: PerDimension<usize>,
    pub total_patterns: usize,
    pub strong_evidence: usize,
    pub weak_evidence: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    MutualExclusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

impl ConflictSeverity {
    /// Bucket a conflict score: above 0.7 high, above 0.5 medium, else low.
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::High
        } else if score > 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Confidence penalty contributed by one conflict of this severity.
    pub fn weight(&self) -> f64 {
        match self {
            Self::High => 0.3,
            Self::Medium => 0.15,
            Self::Low => 0.05,
        }
    }
}

/// Evidence for another platform that cannot coexist with this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConflict {
    pub conflicting_platform: Platform,
    pub conflict_type: ConflictType,
    pub severity: ConflictSeverity,
    /// Product of both platforms' `base_confidence`. Severity is monotonic in it.
    pub score: f64,
    /// Patterns supporting the conflicting platform.
    pub contributing_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    Single,
    MultiDimensional,
    Correlative,
}

impl DetectionMethod {
    /// By number of dimensions with any support. `None` for zero.
    pub fn from_dimension_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::Single),
            2 => Some(Self::MultiDimensional),
            _ => Some(Self::Correlative),
        }
    }
}

/// Calibrated confidence for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSignature {
    pub platform: Platform,
    /// In `[0, 1]`.
    pub confidence: f64,
    /// Confidence before the conflict penalty. Conflicts are scored from this
    /// value, since the penalty itself depends on them.
    pub base_confidence: f64,
    pub cross_dimensional_score: f64,
    pub correlation_strength: f64,
    pub evidence_boost: f64,
    pub conflict_penalty: f64,
    pub evidence: EvidenceSummary,
    pub conflicts: Vec<PlatformConflict>,
    pub detection_method: DetectionMethod,
}

impl PlatformSignature {
    /// Ranking key: `confidence × cross_dimensional_score × correlation_strength`.
    pub fn ranking_score(&self) -> f64 {
        let score = self.confidence * self.cross_dimensional_score * self.correlation_strength;
        if score.is_finite() {
            score
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlatform {
    pub rank: usize,
    pub platform: Platform,
    pub score: f64,
    pub confidence: f64,
}

/// Engine output. `failed` marks a component failure; the maps are then empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureReport {
    pub failed: bool,
    pub warnings: Vec<String>,
    pub signatures: BTreeMap<Platform, PlatformSignature>,
    pub correlations: BTreeMap<Platform, CrossDimensionalCorrelation>,
    pub conflict_matrix: BTreeMap<Platform, BTreeMap<Platform, f64>>,
    pub ranking: Vec<RankedPlatform>,
}

impl SignatureReport {
    pub fn failed(warning: String) -> Self {
        Self {
            failed: true,
            warnings: vec![warning],
            ..Default::default()
        }
    }

    pub fn signature(&self, platform: Platform) -> Option<&PlatformSignature> {
        self.signatures.get(&platform)
    }

    pub fn top(&self) -> Option<&RankedPlatform> {
        self.ranking.first()
    }
}
