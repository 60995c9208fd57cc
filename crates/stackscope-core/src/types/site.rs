//! Upstream site records. Produced by the collection subsystem, read-only here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::dimension::{PageType, PageTypeFilter};

/// A candidate platform detection reported by an upstream detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub platform: String,
    pub confidence: f64,
}

impl Detection {
    pub fn new(platform: impl Into<String>, confidence: f64) -> Self {
        Self {
            platform: platform.into(),
            confidence,
        }
    }

    /// A detection is usable when it names something and its confidence is a
    /// finite probability.
    pub fn is_well_formed(&self) -> bool {
        !self.platform.trim().is_empty()
            && self.confidence.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
    }
}

/// A document `<meta>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl MetaTag {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Signals observed for one site.
///
/// Header maps may be absent (upstream fetch failed); consumers treat a missing
/// map as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub url: String,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub robots_headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub meta_tags: Vec<MetaTag>,
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub detections: Option<Vec<Detection>>,
}

impl SiteRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_robots_header(mut self, name: &str, value: &str) -> Self {
        self.robots_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta_tags.push(MetaTag::new(name, content));
        self
    }

    pub fn with_script(mut self, src: &str) -> Self {
        self.scripts.push(src.to_string());
        self
    }

    pub fn with_detection(mut self, platform: &str, confidence: f64) -> Self {
        self.detections
            .get_or_insert_with(Vec::new)
            .push(Detection::new(platform, confidence));
        self
    }

    /// Header maps selected by `filter`, tagged with their page type.
    /// Absent maps are skipped.
    pub fn header_maps(&self, filter: PageTypeFilter) -> Vec<(PageType, &BTreeMap<String, String>)> {
        let mut maps = Vec::with_capacity(2);
        if filter.includes(PageType::MainPage) {
            if let Some(ref headers) = self.headers {
                maps.push((PageType::MainPage, headers));
            }
        }
        if filter.includes(PageType::Robots) {
            if let Some(ref headers) = self.robots_headers {
                maps.push((PageType::Robots, headers));
            }
        }
        maps
    }

    /// True when no header map was collected at all.
    pub fn has_no_headers(&self) -> bool {
        self.headers.is_none() && self.robots_headers.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_well_formed() {
        assert!(Detection::new("WordPress", 0.9).is_well_formed());
        assert!(!Detection::new("WordPress", f64::NAN).is_well_formed());
        assert!(!Detection::new("WordPress", -0.1).is_well_formed());
        assert!(!Detection::new("WordPress", 1.5).is_well_formed());
        assert!(!Detection::new("  ", 0.9).is_well_formed());
    }

    #[test]
    fn test_header_maps_respect_filter() {
        let site = SiteRecord::new("https://a.example")
            .with_header("Server", "nginx")
            .with_robots_header("X-Robots", "1");
        assert_eq!(site.header_maps(PageTypeFilter::All).len(), 2);
        let main = site.header_maps(PageTypeFilter::MainPage);
        assert_eq!(main.len(), 1);
        assert_eq!(main[0].0, PageType::MainPage);
        let robots = site.header_maps(PageTypeFilter::Robots);
        assert_eq!(robots.len(), 1);
        assert_eq!(robots[0].0, PageType::Robots);
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let site: SiteRecord = serde_json::from_str(r#"{"url": "https://b.example"}"#).unwrap();
        assert!(site.has_no_headers());
        assert!(site.detections.is_none());
        assert!(site.scripts.is_empty());
    }
}
