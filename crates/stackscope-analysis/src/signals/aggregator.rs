//! Signal aggregation: site records → signal occurrence index.

use stackscope_core::config::AnalysisConfig;
use stackscope_core::errors::InputError;
use stackscope_core::types::collections::{BTreeSet, FxHashMap, FxHashSet};
use stackscope_core::{PageTypeFilter, SiteRecord};

use super::labeling::label_site;
use super::types::{SignalIndex, SignalKey, SignalOccurrence};

/// Script sources that never carry a reusable path.
const INLINE_SCRIPT_SCHEMES: &[&str] = &["data:", "javascript:", "blob:"];

/// Builds a [`SignalIndex`] from a batch of site records.
pub struct SignalAggregator {
    config: AnalysisConfig,
}

impl SignalAggregator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Aggregate every record. Input problems are recorded on the index, never raised.
    pub fn build(&self, records: &[SiteRecord]) -> SignalIndex {
        let filter = self.config.effective_page_type_filter();
        let threshold = self.config.effective_detection_threshold();

        let mut index = SignalIndex::default();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut occurrences: FxHashMap<SignalKey, BTreeSet<String>> = FxHashMap::default();

        for (position, record) in records.iter().enumerate() {
            let site_id = record.url.trim();
            if site_id.is_empty() {
                index.issues.push(InputError::EmptySiteId { position });
                continue;
            }
            if !seen.insert(site_id.to_string()) {
                index.issues.push(InputError::DuplicateSite {
                    site: site_id.to_string(),
                });
                continue;
            }

            let (label, issues) = label_site(site_id, record, threshold);
            index.issues.extend(issues);
            index.site_labels.insert(site_id.to_string(), label);

            if record.has_no_headers() {
                index.issues.push(InputError::MissingHeaders {
                    site: site_id.to_string(),
                });
            }

            for key in site_signals(record, filter) {
                occurrences
                    .entry(key)
                    .or_default()
                    .insert(site_id.to_string());
            }
        }

        index.total_sites = index.site_labels.len();
        index.occurrences = occurrences
            .into_iter()
            .map(|(key, sites)| {
                (
                    key.clone(),
                    SignalOccurrence { key, sites },
                )
            })
            .collect();

        if !index.issues.is_empty() {
            tracing::warn!(
                issues = index.issues.len(),
                "input issues tolerated during aggregation"
            );
        }
        tracing::debug!(
            sites = index.total_sites,
            signals = index.occurrences.len(),
            filter = %filter,
            "signal index built"
        );

        index
    }
}

/// Distinct signals one site exhibits under `filter`.
fn site_signals(record: &SiteRecord, filter: PageTypeFilter) -> FxHashSet<SignalKey> {
    let mut keys = FxHashSet::default();

    for (_, headers) in record.header_maps(filter) {
        for name in headers.keys() {
            if let Some(name) = normalize_header_name(name) {
                keys.insert(SignalKey::header(&name));
            }
        }
    }

    for tag in &record.meta_tags {
        if let Some(name) = normalize_meta(&tag.name, &tag.content) {
            keys.insert(SignalKey::meta(&name));
        }
    }

    for src in &record.scripts {
        if let Some(name) = normalize_script(src) {
            keys.insert(SignalKey::script(&name));
        }
    }

    keys
}

pub fn normalize_header_name(name: &str) -> Option<String> {
    let name = name.trim().to_ascii_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Meta tag name, lower-cased. `generator` tags are refined with the first word
/// of their content so `generator=wordpress` and `generator=drupal` stay apart.
pub fn normalize_meta(name: &str, content: &str) -> Option<String> {
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    if name == "generator" {
        let product = content
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_ascii_lowercase();
        if !product.is_empty() {
            return Some(format!("generator={product}"));
        }
    }
    Some(name)
}

/// Script reference reduced to host plus first path segment.
///
/// `https://cdn.shopify.com/s/files/1/app.js?v=2` → `cdn.shopify.com/s`,
/// `/wp-content/themes/x/app.js` → `/wp-content`.
pub fn normalize_script(src: &str) -> Option<String> {
    let lowered = src.trim().to_ascii_lowercase();
    if INLINE_SCRIPT_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }
    let without_suffix = lowered
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let absolute = without_suffix
        .strip_prefix("https://")
        .or_else(|| without_suffix.strip_prefix("http://"))
        .or_else(|| without_suffix.strip_prefix("//"));

    let (host, path) = match absolute {
        Some(rest) => match rest.find('/') {
            Some(slash) => (Some(&rest[..slash]), &rest[slash..]),
            None => (Some(rest), ""),
        },
        None => (None, without_suffix),
    };

    let segment = path
        .trim_start_matches("./")
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();

    match (host.filter(|h| !h.is_empty()), segment.is_empty()) {
        (Some(host), true) => Some(host.to_string()),
        (Some(host), false) => Some(format!("{host}/{segment}")),
        (None, false) => Some(format!("/{segment}")),
        (None, true) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackscope_core::PlatformLabel;

    fn aggregator() -> SignalAggregator {
        SignalAggregator::new(AnalysisConfig::default())
    }

    #[test]
    fn test_normalize_script() {
        assert_eq!(
            normalize_script("https://cdn.shopify.com/s/files/1/app.js?v=2").as_deref(),
            Some("cdn.shopify.com/s")
        );
        assert_eq!(
            normalize_script("/WP-Content/themes/x/app.js#main").as_deref(),
            Some("/wp-content")
        );
        assert_eq!(
            normalize_script("//static.parastorage.com").as_deref(),
            Some("static.parastorage.com")
        );
        assert_eq!(normalize_script("media/jui/js/jquery.min.js").as_deref(), Some("/media"));
        assert_eq!(normalize_script("data:text/javascript,alert(1)"), None);
        assert_eq!(normalize_script("   "), None);
    }

    #[test]
    fn test_normalize_meta_generator() {
        assert_eq!(
            normalize_meta("Generator", "WordPress 6.4.2").as_deref(),
            Some("generator=wordpress")
        );
        assert_eq!(
            normalize_meta("generator", "Joomla! - Open Source").as_deref(),
            Some("generator=joomla")
        );
        assert_eq!(normalize_meta("generator", "").as_deref(), Some("generator"));
        assert_eq!(normalize_meta(" Viewport ", "width=device-width").as_deref(), Some("viewport"));
        assert_eq!(normalize_meta("", "x"), None);
    }

    #[test]
    fn test_build_counts_each_site_once() {
        let records = vec![
            SiteRecord::new("a")
                .with_header("Server", "nginx")
                .with_robots_header("server", "nginx")
                .with_detection("WordPress", 0.9),
            SiteRecord::new("b").with_header("SERVER ", "apache"),
        ];
        let index = aggregator().build(&records);
        assert_eq!(index.total_sites, 2);
        let server = index.get(&SignalKey::header("server")).unwrap();
        assert_eq!(server.occurrences(), 2);
        assert_eq!(index.label_of("a"), PlatformLabel::named("WordPress"));
        assert_eq!(index.label_of("b"), PlatformLabel::Unknown);
    }

    #[test]
    fn test_page_type_filter() {
        let records = vec![SiteRecord::new("a")
            .with_header("x-main", "1")
            .with_robots_header("x-robots", "1")];
        let config = AnalysisConfig {
            page_type_filter: Some(PageTypeFilter::Robots),
            ..Default::default()
        };
        let index = SignalAggregator::new(config).build(&records);
        assert!(index.get(&SignalKey::header("x-robots")).is_some());
        assert!(index.get(&SignalKey::header("x-main")).is_none());
    }

    #[test]
    fn test_duplicate_and_empty_ids_recorded() {
        let records = vec![
            SiteRecord::new("a").with_header("x-first", "1"),
            SiteRecord::new("a").with_header("x-second", "1"),
            SiteRecord::new("  ").with_header("x-third", "1"),
        ];
        let index = aggregator().build(&records);
        assert_eq!(index.total_sites, 1);
        assert!(index.get(&SignalKey::header("x-first")).is_some());
        assert!(index.get(&SignalKey::header("x-second")).is_none());
        assert!(index
            .issues
            .iter()
            .any(|e| matches!(e, InputError::DuplicateSite { site } if site == "a")));
        assert!(index
            .issues
            .iter()
            .any(|e| matches!(e, InputError::EmptySiteId { position: 2 })));
    }

    #[test]
    fn test_missing_headers_tolerated() {
        let records = vec![SiteRecord::new("a").with_script("/wp-includes/js/jquery.js")];
        let index = aggregator().build(&records);
        assert_eq!(index.total_sites, 1);
        assert!(index.get(&SignalKey::script("/wp-includes")).is_some());
        assert!(matches!(index.issues[0], InputError::MissingHeaders { .. }));
    }

    #[test]
    fn test_every_occurrence_site_is_labeled() {
        let records = vec![
            SiteRecord::new("a").with_header("x", "1").with_meta("generator", "Drupal 10"),
            SiteRecord::new("b").with_header("x", "1"),
        ];
        let index = aggregator().build(&records);
        for occ in index.occurrences.values() {
            for site in &occ.sites {
                assert!(index.site_labels.contains_key(site));
            }
        }
    }
}
