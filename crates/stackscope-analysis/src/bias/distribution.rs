//! Platform distribution, Herfindahl concentration, and Shannon diversity.

use stackscope_core::types::collections::BTreeMap;
use stackscope_core::PlatformLabel;

use super::types::PlatformShare;

/// Count and percentage per label. Percentages are `count * 100 / total`, so
/// they sum to 100 within floating tolerance for any non-empty dataset.
pub fn platform_distribution(
    label_counts: &BTreeMap<PlatformLabel, usize>,
    total_sites: usize,
) -> BTreeMap<PlatformLabel, PlatformShare> {
    if total_sites == 0 {
        return BTreeMap::new();
    }
    label_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(label, count)| {
            let percentage = (*count as f64) * 100.0 / total_sites as f64;
            (
                label.clone(),
                PlatformShare {
                    count: *count,
                    percentage,
                },
            )
        })
        .collect()
}

/// Σ share². In `[1/k, 1]` for k labels present; 0 for an empty dataset.
pub fn concentration_score(label_counts: &BTreeMap<PlatformLabel, usize>, total_sites: usize) -> f64 {
    if total_sites == 0 {
        return 0.0;
    }
    let n = total_sites as f64;
    let sum_sq: f64 = label_counts
        .values()
        .map(|&count| (count as f64) * (count as f64))
        .sum();
    (sum_sq / (n * n)).clamp(0.0, 1.0)
}

/// −Σ share·ln(share). 0 when a single label holds every site.
pub fn diversity_index(label_counts: &BTreeMap<PlatformLabel, usize>, total_sites: usize) -> f64 {
    if total_sites == 0 {
        return 0.0;
    }
    let n = total_sites as f64;
    let entropy: f64 = label_counts
        .values()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let share = count as f64 / n;
            -share * share.ln()
        })
        .sum();
    entropy.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<PlatformLabel, usize> {
        pairs
            .iter()
            .map(|(name, count)| (PlatformLabel::named(name), *count))
            .collect()
    }

    #[test]
    fn test_balanced_distribution() {
        let c = counts(&[("WordPress", 3), ("Drupal", 3), ("Joomla", 3)]);
        let dist = platform_distribution(&c, 9);
        let total: f64 = dist.values().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((concentration_score(&c, 9) - 1.0 / 3.0).abs() < 1e-12);
        assert!((diversity_index(&c, 9) - 3f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_single_label_is_fully_concentrated() {
        let c = counts(&[("Unknown", 1)]);
        assert_eq!(concentration_score(&c, 1), 1.0);
        assert_eq!(diversity_index(&c, 1), 0.0);
    }

    #[test]
    fn test_empty_dataset() {
        let c = BTreeMap::new();
        assert!(platform_distribution(&c, 0).is_empty());
        assert_eq!(concentration_score(&c, 0), 0.0);
        assert_eq!(diversity_index(&c, 0), 0.0);
    }
}
