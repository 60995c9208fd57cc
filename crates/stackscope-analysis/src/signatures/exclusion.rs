//! Platforms that cannot genuinely run the same site.

use stackscope_core::Platform;

pub const MUTUAL_EXCLUSIONS: &[(Platform, Platform)] = &[
    (Platform::WordPress, Platform::Drupal),
    (Platform::WordPress, Platform::Joomla),
    (Platform::Shopify, Platform::Magento),
    (Platform::Drupal, Platform::Joomla),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_are_distinct() {
        for (i, &(a, b)) in MUTUAL_EXCLUSIONS.iter().enumerate() {
            assert_ne!(a, b);
            for &(x, y) in &MUTUAL_EXCLUSIONS[i + 1..] {
                assert!(!((x == a && y == b) || (x == b && y == a)));
            }
        }
        assert!(!MUTUAL_EXCLUSIONS
            .iter()
            .any(|&(a, b)| a == Platform::Duda || b == Platform::Duda));
    }
}
