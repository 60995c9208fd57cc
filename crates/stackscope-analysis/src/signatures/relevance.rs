//! Platform relevance predicates for evidence patterns.

use stackscope_core::types::platform::PLATFORM_COUNT;
use stackscope_core::Platform;

use super::types::EvidencePattern;

/// Keywords matched against lower-cased pattern names. A keyword must start a
/// token: at the beginning of the name or right after a non-alphanumeric byte.
const RELEVANCE_KEYWORDS: [(Platform, &[&str]); PLATFORM_COUNT] = [
    (
        Platform::WordPress,
        &["wordpress", "wp-", "wp_", "wp-content", "wp-json", "woocommerce", "x-pingback"],
    ),
    (Platform::Drupal, &["drupal", "/sites/default", "/sites/all", "x-generator"]),
    (Platform::Joomla, &["joomla", "/media/jui", "/media/system", "com_"]),
    (Platform::Duda, &["duda", "dmalbum", "dm_", "cdn-website", "multiscreensite"]),
    (Platform::Shopify, &["shopify", "x-shopid", "x-shardid", "cdn.shopify"]),
    (Platform::Magento, &["magento", "mage/", "mage-cache", "x-magento"]),
];

fn keywords(platform: Platform) -> &'static [&'static str] {
    RELEVANCE_KEYWORDS[platform.index()].1
}

/// True when `keyword` occurs in `name` at a token start.
fn contains_token(name: &str, keyword: &str) -> bool {
    let bytes = name.as_bytes();
    name.match_indices(keyword)
        .any(|(at, _)| at == 0 || !bytes[at - 1].is_ascii_alphanumeric())
}

pub fn matches_keywords(pattern_name: &str, platform: Platform) -> bool {
    let name = pattern_name.to_ascii_lowercase();
    keywords(platform)
        .iter()
        .any(|keyword| contains_token(&name, keyword))
}

/// Explicit association of a pattern with `platform`, if the producer supplied one.
fn explicit_correlation(pattern: &EvidencePattern, platform: Platform) -> Option<f64> {
    pattern
        .platform_correlation
        .iter()
        .find(|(name, _)| Platform::from_name(name) == Some(platform))
        .map(|(_, value)| *value)
}

/// How specific the pattern is to `platform`: the explicit association when
/// present, else the pattern's own specificity when its name matches the
/// platform's keywords, else 0. Always in `[0, 1]`.
pub fn platform_specificity(pattern: &EvidencePattern, platform: Platform) -> f64 {
    let value = match explicit_correlation(pattern, platform) {
        Some(value) => value,
        None if matches_keywords(&pattern.name, platform) => pattern.specificity,
        None => 0.0,
    };
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// A pattern is relevant to a platform when it is explicitly associated with
/// it or its name matches the platform's keywords.
pub fn is_relevant(pattern: &EvidencePattern, platform: Platform) -> bool {
    match explicit_correlation(pattern, platform) {
        Some(value) => value > 0.0,
        None => matches_keywords(&pattern.name, platform),
    }
}
