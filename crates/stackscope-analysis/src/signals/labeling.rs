//! Site labeling: best detection, else enterprise indicators, else `Unknown`.

use stackscope_core::errors::InputError;
use stackscope_core::{PageTypeFilter, PlatformLabel, SiteRecord};

use super::enterprise::is_enterprise_header;

/// Assign a site its best-known platform label.
///
/// The highest-confidence well-formed detection names the platform when its
/// confidence is strictly above `threshold`; ties keep the earlier detection.
/// Otherwise any enterprise header (on either page) labels the site
/// `Enterprise`. Malformed detections are ignored and reported.
pub fn label_site(
    site_id: &str,
    record: &SiteRecord,
    threshold: f64,
) -> (PlatformLabel, Vec<InputError>) {
    let mut issues = Vec::new();
    let mut best: Option<(&str, f64)> = None;

    for detection in record.detections.iter().flatten() {
        if !detection.is_well_formed() {
            issues.push(InputError::MalformedDetection {
                site: site_id.to_string(),
                reason: format!(
                    "platform {:?} with confidence {}",
                    detection.platform, detection.confidence
                ),
            });
            continue;
        }
        match best {
            Some((_, conf)) if detection.confidence <= conf => {}
            _ => best = Some((detection.platform.as_str(), detection.confidence)),
        }
    }

    if let Some((platform, confidence)) = best {
        if confidence > threshold {
            let label = PlatformLabel::named(platform);
            if label.is_named() {
                return (label, issues);
            }
        }
    }

    let enterprise = record
        .header_maps(PageTypeFilter::All)
        .into_iter()
        .any(|(_, headers)| headers.keys().any(|name| is_enterprise_header(name)));

    if enterprise {
        (PlatformLabel::Enterprise, issues)
    } else {
        (PlatformLabel::Unknown, issues)
    }
}
