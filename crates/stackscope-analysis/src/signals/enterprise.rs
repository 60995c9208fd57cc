//! Static header tables: enterprise-infrastructure indicators and vendor hints.

use serde::{Deserialize, Serialize};

/// What a vendor hint says about the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorKind {
    /// CDN, edge, or hosting infrastructure.
    Infrastructure,
    /// An application platform.
    Platform,
}

/// Security and delivery headers that, on their own, mark a site as run on
/// enterprise infrastructure when no platform was detected.
const ENTERPRISE_HEADERS: &[&str] = &[
    "strict-transport-security",
    "content-security-policy",
    "content-security-policy-report-only",
    "x-frame-options",
    "x-content-type-options",
    "x-xss-protection",
    "referrer-policy",
    "permissions-policy",
    "expect-ct",
    "cross-origin-opener-policy",
    "cross-origin-embedder-policy",
    "x-cache",
    "x-served-by",
    "x-edge-location",
    "x-cdn",
];

/// Ordered substring table. First hit wins, so longer or more specific
/// needles come before generic ones.
const VENDOR_HINTS: &[(&str, &str, VendorKind)] = &[
    ("cf-ray", "Cloudflare", VendorKind::Infrastructure),
    ("cf-cache", "Cloudflare", VendorKind::Infrastructure),
    ("cloudflare", "Cloudflare", VendorKind::Infrastructure),
    ("akamai", "Akamai", VendorKind::Infrastructure),
    ("fastly", "Fastly", VendorKind::Infrastructure),
    ("x-amz-cf", "Amazon CloudFront", VendorKind::Infrastructure),
    ("x-amz", "Amazon Web Services", VendorKind::Infrastructure),
    ("x-azure", "Azure Front Door", VendorKind::Infrastructure),
    ("x-msedge", "Azure Front Door", VendorKind::Infrastructure),
    ("x-goog", "Google Cloud", VendorKind::Infrastructure),
    ("x-vercel", "Vercel", VendorKind::Infrastructure),
    ("x-nf-", "Netlify", VendorKind::Infrastructure),
    ("x-sucuri", "Sucuri", VendorKind::Infrastructure),
    ("x-varnish", "Varnish", VendorKind::Infrastructure),
    ("x-kinsta", "Kinsta", VendorKind::Infrastructure),
    ("x-pantheon", "Pantheon", VendorKind::Infrastructure),
    ("x-acquia", "Acquia", VendorKind::Infrastructure),
    ("x-wpe", "WP Engine", VendorKind::Infrastructure),
    ("x-drupal", "Drupal", VendorKind::Platform),
    ("x-generator", "Drupal", VendorKind::Platform),
    ("x-wp-", "WordPress", VendorKind::Platform),
    ("x-pingback", "WordPress", VendorKind::Platform),
    ("x-shopify", "Shopify", VendorKind::Platform),
    ("x-shopid", "Shopify", VendorKind::Platform),
    ("x-shardid", "Shopify", VendorKind::Platform),
    ("x-magento", "Magento", VendorKind::Platform),
    ("x-content-encoded-by", "Joomla", VendorKind::Platform),
    ("x-duda", "Duda", VendorKind::Platform),
];

fn normalize(header_name: &str) -> String {
    header_name.trim().to_ascii_lowercase()
}

/// Vendor hinted at by a header name, if any.
pub fn infer_vendor(header_name: &str) -> Option<(&'static str, VendorKind)> {
    let name = normalize(header_name);
    if name.is_empty() {
        return None;
    }
    VENDOR_HINTS
        .iter()
        .find(|(needle, _, _)| name.contains(needle))
        .map(|(_, vendor, kind)| (*vendor, *kind))
}

/// True when the header marks enterprise infrastructure: a listed security or
/// delivery header, or any infrastructure vendor hint.
pub fn is_enterprise_header(header_name: &str) -> bool {
    let name = normalize(header_name);
    if ENTERPRISE_HEADERS.contains(&name.as_str()) {
        return true;
    }
    matches!(infer_vendor(&name), Some((_, VendorKind::Infrastructure)))
}
