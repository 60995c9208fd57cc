use proptest::prelude::*;
use stackscope_analysis::bias::BiasAnalyzer;
use stackscope_analysis::signatures::{
    EvidencePattern, EvidenceSet, PlatformConflict, PlatformSignatureEngine,
};
use stackscope_analysis::ValidationPipeline;
use stackscope_core::config::SignatureConfig;
use stackscope_core::{Dimension, Platform, SiteRecord, StackscopeConfig};

const LABELS: [Option<&str>; 5] = [
    Some("WordPress"),
    Some("Drupal"),
    Some("Joomla"),
    Some("Shopify"),
    None,
];

const HEADERS: [&str; 6] = [
    "server",
    "x-powered-by",
    "x-pingback",
    "x-drupal-cache",
    "strict-transport-security",
    "x-shopid",
];

fn site(i: usize, label: usize, mask: u8) -> SiteRecord {
    let mut record = SiteRecord::new(format!("https://p{i}.example"));
    for (bit, header) in HEADERS.iter().enumerate() {
        if mask & (1 << bit) != 0 {
            record = record.with_header(header, "1");
        }
    }
    if mask & 0x40 != 0 {
        record = record.with_script("/assets/app.js");
    }
    if let Some(platform) = LABELS[label] {
        record = record.with_detection(platform, 0.9);
    }
    record
}

fn dataset() -> impl Strategy<Value = Vec<SiteRecord>> {
    prop::collection::vec((0..LABELS.len(), any::<u8>()), 1..80).prop_map(|sites| {
        sites
            .into_iter()
            .enumerate()
            .map(|(i, (label, mask))| site(i, label, mask))
            .collect()
    })
}

fn score() -> impl Strategy<Value = f64> {
    prop_oneof![
        6 => 0.0f64..=1.0,
        1 => -2.0f64..3.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn pattern(dimension: Dimension) -> impl Strategy<Value = EvidencePattern> {
    let names = prop::sample::select(vec![
        "wordpress", "wp-content", "drupal", "joomla", "shopify", "magento", "duda", "generic",
    ]);
    (names, score(), score(), score(), prop::option::of((0..6usize, score()))).prop_map(
        move |(name, disc, freq, spec, explicit)| {
            let pattern =
                EvidencePattern::new(format!("{dimension}:{name}"), dimension, disc, freq, spec);
            match explicit {
                Some((platform, value)) => pattern.with_correlation(Platform::ALL[platform], value),
                None => pattern,
            }
        },
    )
}

fn evidence() -> impl Strategy<Value = EvidenceSet> {
    (
        prop::collection::vec(pattern(Dimension::Header), 0..8),
        prop::collection::vec(pattern(Dimension::Meta), 0..8),
        prop::collection::vec(pattern(Dimension::Script), 0..8),
    )
        .prop_map(|(headers, meta, scripts)| EvidenceSet::new(headers, meta, scripts))
}

fn trio(names: [&str; 3], (disc, freq, spec): (f64, f64, f64)) -> Vec<EvidencePattern> {
    [Dimension::Header, Dimension::Meta, Dimension::Script]
        .into_iter()
        .zip(names)
        .map(|(dimension, name)| EvidencePattern::new(name, dimension, disc, freq, spec))
        .collect()
}

fn scores() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.05f64..=1.0, 0.05f64..=1.0, 0.05f64..=1.0)
}

/// WordPress and Drupal evidence side by side; returns the conflict seen from
/// WordPress together with the product of the two base confidences.
fn wordpress_drupal_conflict(
    wp: (f64, f64, f64),
    drupal: (f64, f64, f64),
) -> Option<(f64, PlatformConflict)> {
    let mut patterns = trio(
        ["header:x-pingback", "meta:generator=wordpress", "script:/wp-content"],
        wp,
    );
    patterns.extend(trio(
        ["header:x-drupal-cache", "meta:generator=drupal", "script:/sites/default"],
        drupal,
    ));
    let (mut headers, mut meta, mut scripts) = (Vec::new(), Vec::new(), Vec::new());
    for pattern in patterns {
        match pattern.dimension {
            Dimension::Header => headers.push(pattern),
            Dimension::Meta => meta.push(pattern),
            Dimension::Script => scripts.push(pattern),
        }
    }
    let report = PlatformSignatureEngine::new(SignatureConfig::default())
        .synthesize(&EvidenceSet::new(headers, meta, scripts));
    let wp_sig = report.signature(Platform::WordPress)?;
    let dr_sig = report.signature(Platform::Drupal)?;
    let conflict = wp_sig.conflicts.first()?.clone();
    Some((wp_sig.base_confidence * dr_sig.base_confidence, conflict))
}

proptest! {
    #[test]
    fn distribution_percentages_sum_to_100(records in dataset()) {
        let (_, bias) = BiasAnalyzer::new(StackscopeConfig::default()).analyze_records(&records);
        let total: f64 = bias.platform_distribution.values().map(|s| s.percentage).sum();
        prop_assert!((total - 100.0).abs() < 0.01, "sum = {}", total);
        let counted: usize = bias.platform_distribution.values().map(|s| s.count).sum();
        prop_assert_eq!(counted, bias.total_sites);
    }

    #[test]
    fn concentration_bounded_by_label_count(records in dataset()) {
        let (_, bias) = BiasAnalyzer::new(StackscopeConfig::default()).analyze_records(&records);
        let k = bias.platform_distribution.len() as f64;
        prop_assert!(bias.concentration_score <= 1.0 + 1e-9);
        prop_assert!(bias.concentration_score >= 1.0 / k - 1e-9);
        prop_assert!(bias.diversity_index >= 0.0);
    }

    #[test]
    fn correlation_values_are_probabilities(records in dataset()) {
        let mut config = StackscopeConfig::default();
        config.analysis.min_occurrences = Some(1);
        let (_, bias) = BiasAnalyzer::new(config).analyze_records(&records);
        for correlation in bias.signal_correlations.values() {
            for (field, value) in correlation.bounded_values() {
                prop_assert!(
                    (0.0..=1.0).contains(&value),
                    "{} {} = {}", correlation.signal, field, value
                );
            }
        }
    }

    #[test]
    fn pipeline_output_is_subset_with_bounded_quality(records in dataset()) {
        let mut config = StackscopeConfig::default();
        config.analysis.min_occurrences = Some(1);
        config.validation.sample_size_floor = Some(1);
        let (index, bias) = BiasAnalyzer::new(config.clone()).analyze_records(&records);
        let result = ValidationPipeline::new().run(&bias, &index, &config);

        prop_assert!((0.0..=1.0).contains(&result.quality_score));
        prop_assert!(result.sanity.passed);
        for item in &result.validated {
            prop_assert!(bias.signal_correlations.contains_key(&item.signal));
        }
    }

    #[test]
    fn signature_confidence_bounded(evidence in evidence()) {
        let report = PlatformSignatureEngine::new(SignatureConfig::default()).synthesize(&evidence);
        prop_assert!(!report.failed);
        for signature in report.signatures.values() {
            prop_assert!((0.0..=1.0).contains(&signature.confidence));
            prop_assert!(signature.confidence <= signature.base_confidence + 1e-12);
            prop_assert!((0.0..=0.6 + 1e-12).contains(&signature.conflict_penalty));
        }
        for (rank, entry) in report.ranking.iter().enumerate() {
            prop_assert_eq!(entry.rank, rank + 1);
        }
        for pair in report.ranking.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn conflict_severity_follows_base_confidence_product(
        first in (scores(), scores()),
        second in (scores(), scores()),
    ) {
        let a = wordpress_drupal_conflict(first.0, first.1);
        let b = wordpress_drupal_conflict(second.0, second.1);
        if let (Some((product_a, conflict_a)), Some((product_b, conflict_b))) = (a, b) {
            prop_assert!((conflict_a.score - product_a).abs() < 1e-12);
            prop_assert!((conflict_b.score - product_b).abs() < 1e-12);
            if product_a <= product_b {
                prop_assert!(conflict_a.severity <= conflict_b.severity);
            } else {
                prop_assert!(conflict_a.severity >= conflict_b.severity);
            }
        }
    }
}
