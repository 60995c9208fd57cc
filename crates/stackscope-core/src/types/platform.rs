//! Platform identities: the closed candidate set and per-site labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of candidate platforms the signature engine scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    WordPress,
    Drupal,
    Joomla,
    Duda,
    Shopify,
    Magento,
}

/// Number of candidate platforms.
pub const PLATFORM_COUNT: usize = 6;

/// Vendor spellings folded onto a canonical platform. Matched against the
/// lower-cased, trimmed name; first exact hit wins, then the prefix pass.
const NAME_ALIASES: &[(&str, Platform)] = &[
    ("wordpress", Platform::WordPress),
    ("wp", Platform::WordPress),
    ("drupal", Platform::Drupal),
    ("joomla", Platform::Joomla),
    ("joomla!", Platform::Joomla),
    ("duda", Platform::Duda),
    ("dudamobile", Platform::Duda),
    ("shopify", Platform::Shopify),
    ("magento", Platform::Magento),
    ("adobe commerce", Platform::Magento),
];

impl Platform {
    pub const ALL: [Platform; PLATFORM_COUNT] = [
        Self::WordPress,
        Self::Drupal,
        Self::Joomla,
        Self::Duda,
        Self::Shopify,
        Self::Magento,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::WordPress => "WordPress",
            Self::Drupal => "Drupal",
            Self::Joomla => "Joomla",
            Self::Duda => "Duda",
            Self::Shopify => "Shopify",
            Self::Magento => "Magento",
        }
    }

    /// Position in `Platform::ALL`, for fixed-size per-platform arrays.
    pub fn index(&self) -> usize {
        match self {
            Self::WordPress => 0,
            Self::Drupal => 1,
            Self::Joomla => 2,
            Self::Duda => 3,
            Self::Shopify => 4,
            Self::Magento => 5,
        }
    }

    /// Resolve a detector-reported platform name, folding version suffixes and
    /// vendor spellings ("Drupal 7", "Joomla!", "wordpress").
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        if lowered.is_empty() {
            return None;
        }
        if let Some((_, platform)) = NAME_ALIASES.iter().find(|(alias, _)| *alias == lowered) {
            return Some(*platform);
        }
        // "drupal 7", "wordpress 6.4.2", "joomla! 3"
        let head = lowered
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();
        NAME_ALIASES
            .iter()
            .find(|(alias, _)| *alias == head || *alias == head.trim_end_matches('!'))
            .map(|(_, platform)| *platform)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The best-known platform for a site.
///
/// Serialized as a plain string (`"WordPress"`, `"Enterprise"`, `"Unknown"`) so
/// labels can key JSON maps. Construct named labels through [`PlatformLabel::named`]
/// so canonical spellings are used and the reserved words cannot be smuggled in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlatformLabel {
    Named(String),
    Enterprise,
    Unknown,
}

impl PlatformLabel {
    pub const ENTERPRISE: &'static str = "Enterprise";
    pub const UNKNOWN: &'static str = "Unknown";

    /// Build a label from a raw platform name. Known platforms are canonicalised,
    /// other names are kept trimmed. Empty names and the reserved words map to
    /// the corresponding non-named variants.
    pub fn named(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::UNKNOWN) {
            return Self::Unknown;
        }
        if trimmed.eq_ignore_ascii_case(Self::ENTERPRISE) {
            return Self::Enterprise;
        }
        match Platform::from_name(trimmed) {
            Some(platform) => Self::Named(platform.name().to_string()),
            None => Self::Named(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Enterprise => Self::ENTERPRISE,
            Self::Unknown => Self::UNKNOWN,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// The candidate platform this label refers to, if it is one of the closed set.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            Self::Named(name) => Platform::from_name(name),
            _ => None,
        }
    }
}

impl From<String> for PlatformLabel {
    fn from(value: String) -> Self {
        Self::named(&value)
    }
}

impl From<PlatformLabel> for String {
    fn from(value: PlatformLabel) -> Self {
        value.as_str().to_string()
    }
}

impl From<Platform> for PlatformLabel {
    fn from(value: Platform) -> Self {
        Self::Named(value.name().to_string())
    }
}

impl fmt::Display for PlatformLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
