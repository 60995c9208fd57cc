//! Validation pipeline: stage ordering, filters, sanity checks, error containment.

use stackscope_analysis::bias::{BiasAnalyzer, DatasetBiasAnalysis, RecommendationTier};
use stackscope_analysis::signals::SignalIndex;
use stackscope_analysis::validation::stages::{FrequencyFilterStage, SanityCheckStage};
use stackscope_analysis::validation::{
    PipelineResult, StageContext, StageId, StageOutput, StageStatus, ValidationPipeline,
    ValidationStage,
};
use stackscope_analysis::SignalCorrelation;
use stackscope_core::errors::StageError;
use stackscope_core::{SiteRecord, StackscopeConfig};

const PLATFORMS: [&str; 3] = ["WordPress", "Drupal", "Joomla"];

/// 40 sites per platform, each with a platform-specific header plus a shared one.
fn corpus() -> Vec<SiteRecord> {
    (0..120)
        .map(|i| {
            let platform = PLATFORMS[i % 3];
            let specific = match platform {
                "WordPress" => "x-pingback",
                "Drupal" => "x-drupal-cache",
                _ => "x-content-encoded-by",
            };
            SiteRecord::new(format!("https://site{i}.example"))
                .with_header("server", "nginx")
                .with_header(specific, "1")
                .with_detection(platform, 0.95)
        })
        .collect()
}

fn analyze(records: &[SiteRecord], config: &StackscopeConfig) -> (SignalIndex, DatasetBiasAnalysis) {
    BiasAnalyzer::new(config.clone()).analyze_records(records)
}

fn run(records: &[SiteRecord], config: &StackscopeConfig) -> PipelineResult {
    let (index, bias) = analyze(records, config);
    ValidationPipeline::new().run(&bias, &index, config)
}

struct PanickingStage;

impl ValidationStage for PanickingStage {
    fn id(&self) -> StageId {
        StageId::DistributionAnalysis
    }

    fn description(&self) -> &'static str {
        "always panics"
    }

    fn run(
        &self,
        _items: Vec<SignalCorrelation>,
        _ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        panic!("stage exploded");
    }
}

struct FailingStage;

impl ValidationStage for FailingStage {
    fn id(&self) -> StageId {
        StageId::CorrelationCalculation
    }

    fn description(&self) -> &'static str {
        "always errors"
    }

    fn run(
        &self,
        _items: Vec<SignalCorrelation>,
        _ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        Err(StageError::InvariantViolated {
            stage: self.id().to_string(),
            message: "synthetic failure".to_string(),
        })
    }
}

#[test]
fn test_stages_run_in_order() {
    let result = run(&corpus(), &StackscopeConfig::default());
    let order: Vec<StageId> = result.stages.iter().map(|s| s.stage).collect();
    assert_eq!(order, StageId::ALL.to_vec());
    assert!(result.passed);
    assert!(result.sanity.passed);
    assert!((0.0..=1.0).contains(&result.quality_score));
}

#[test]
fn test_platform_specific_signals_validated_high() {
    let result = run(&corpus(), &StackscopeConfig::default());
    assert_eq!(result.initial_count, 4);
    assert_eq!(result.validated.len(), 4);

    let pingback = result
        .validated
        .iter()
        .find(|c| c.signal == "header:x-pingback")
        .unwrap();
    assert!(pingback.is_significant());
    assert_eq!(pingback.specificity, 1.0);
    assert_eq!(pingback.recommendation, RecommendationTier::High);

    let server = result
        .validated
        .iter()
        .find(|c| c.signal == "header:server")
        .unwrap();
    assert!(!server.is_significant());
    assert_eq!(server.recommendation, RecommendationTier::Low);
}

#[test]
fn test_min_occurrences_boundary() {
    let mut records: Vec<SiteRecord> = (0..10)
        .map(|i| SiteRecord::new(format!("https://s{i}.example")).with_detection("WordPress", 0.9))
        .collect();
    for record in records.iter_mut().take(3) {
        record.headers.get_or_insert_with(Default::default).insert("x-three".into(), "1".into());
    }
    for record in records.iter_mut().take(2) {
        record.headers.get_or_insert_with(Default::default).insert("x-two".into(), "1".into());
    }

    let mut bias_config = StackscopeConfig::default();
    bias_config.analysis.min_occurrences = Some(1);
    let (index, bias) = analyze(&records, &bias_config);
    assert!(bias.signal_correlations.contains_key("header:x-two"));

    let mut config = StackscopeConfig::default();
    config.analysis.min_occurrences = Some(3);
    let pipeline = ValidationPipeline::with_stages(vec![Box::new(FrequencyFilterStage)]);
    let result = pipeline.run(&bias, &index, &config);

    let ids: Vec<&str> = result.validated.iter().map(|c| c.signal.as_str()).collect();
    assert_eq!(ids, vec!["header:x-three"]);
    let stage = result.stage(StageId::FrequencyFilter).unwrap();
    assert_eq!(stage.items_filtered, 1);
    assert!((stage.details["frequency_threshold"].as_f64().unwrap() - 0.3).abs() < 1e-12);
}

#[test]
fn test_sample_size_floor_applies() {
    let records: Vec<SiteRecord> = corpus().into_iter().take(30).collect();
    let result = run(&records, &StackscopeConfig::default());
    // Only "server" reaches 30 sites.
    let ids: Vec<&str> = result.validated.iter().map(|c| c.signal.as_str()).collect();
    assert_eq!(ids, vec!["header:server"]);
    let stage = result.stage(StageId::SampleSizeFilter).unwrap();
    assert_eq!(stage.items_filtered, 3);
}

#[test]
fn test_concentrated_signal_with_little_support_dropped() {
    let mut config = StackscopeConfig::default();
    config.analysis.min_occurrences = Some(1);
    config.validation.sample_size_floor = Some(1);
    let mut records = corpus();
    records[0] = records[0].clone().with_header("x-oddity", "1");
    records[3] = records[3].clone().with_header("x-oddity", "1");

    let result = run(&records, &config);
    assert!(!result.validated.iter().any(|c| c.signal == "header:x-oddity"));
    let stage = result.stage(StageId::DistributionAnalysis).unwrap();
    assert_eq!(stage.items_filtered, 1);
}

#[test]
fn test_sanity_failure_forces_overall_fail() {
    let config = StackscopeConfig::default();
    let (index, mut bias) = analyze(&corpus(), &config);

    let template = bias.signal_correlations["header:x-pingback"].clone();
    let mut nan = template.clone();
    nan.signal = "header:x-injected-nan".into();
    nan.frequency = f64::NAN;
    let mut negative = template;
    negative.signal = "header:x-injected-negative".into();
    negative.specificity = -0.4;
    bias.signal_correlations.insert(nan.signal.clone(), nan);
    bias.signal_correlations.insert(negative.signal.clone(), negative);

    let result = ValidationPipeline::new().run(&bias, &index, &config);
    assert!(!result.passed);
    assert!(!result.sanity.passed);
    assert_eq!(result.sanity.violations.len(), 2);
    assert!(result
        .validated
        .iter()
        .all(|c| !c.signal.starts_with("header:x-injected")));

    let correlation = result.stage(StageId::CorrelationCalculation).unwrap();
    assert_eq!(correlation.warnings.len(), 2);
    let sanity = result.stage(StageId::SanityChecks).unwrap();
    assert_eq!(sanity.status, StageStatus::Failed);
    // later stages still ran
    assert_eq!(
        result.stage(StageId::RecommendationGeneration).unwrap().status,
        StageStatus::Passed
    );
}

#[test]
fn test_panicking_stage_contained_and_continues() {
    let config = StackscopeConfig::default();
    let (index, bias) = analyze(&corpus(), &config);
    let pipeline = ValidationPipeline::with_stages(vec![
        Box::new(FrequencyFilterStage),
        Box::new(PanickingStage),
        Box::new(SanityCheckStage),
    ]);
    let result = pipeline.run(&bias, &index, &config);

    assert!(!result.passed);
    assert_eq!(result.stages.len(), 3);
    let errored = &result.stages[1];
    assert_eq!(errored.status, StageStatus::Errored);
    assert!(errored.errors[0].contains("STAGE_PANIC"));
    assert!(errored.errors[0].contains("stage exploded"));
    assert_eq!(result.stages[2].status, StageStatus::Passed);
    // best available data carried past the failed stage
    assert_eq!(result.validated.len(), 4);
}

#[test]
fn test_stop_on_error_aborts_remaining_stages() {
    let mut config = StackscopeConfig::default();
    config.validation.stop_on_error = Some(true);
    let (index, bias) = analyze(&corpus(), &config);
    let pipeline = ValidationPipeline::with_stages(vec![
        Box::new(FrequencyFilterStage),
        Box::new(FailingStage),
        Box::new(SanityCheckStage),
    ]);
    let result = pipeline.run(&bias, &index, &config);

    assert!(!result.passed);
    assert!(result.validated.is_empty());
    assert!(!result.warnings.is_empty());
    assert_eq!(result.stages[1].status, StageStatus::Errored);
    assert!(result.stages[1].errors[0].contains("synthetic failure"));
    assert_eq!(result.stages[2].status, StageStatus::Skipped);
    assert_eq!(result.quality_score, 0.0);
}

#[test]
fn test_skip_statistical_tests() {
    let mut config = StackscopeConfig::default();
    config.validation.skip_statistical_tests = Some(true);
    let result = run(&corpus(), &config);

    let stage = result.stage(StageId::SignificanceTesting).unwrap();
    assert_eq!(stage.status, StageStatus::Skipped);
    assert!(result.validated.iter().all(|c| c.significance.is_none()));
    assert!(result
        .validated
        .iter()
        .all(|c| c.recommendation != RecommendationTier::High));
    assert!(result.passed);
}

#[test]
fn test_debug_mode_does_not_change_results() {
    let mut debug = StackscopeConfig::default();
    debug.validation.debug_mode = Some(true);
    let plain = run(&corpus(), &StackscopeConfig::default());
    let traced = run(&corpus(), &debug);
    assert_eq!(
        serde_json::to_string(&plain).unwrap(),
        serde_json::to_string(&traced).unwrap()
    );
}

#[test]
fn test_empty_dataset_pipeline() {
    let result = run(&[], &StackscopeConfig::default());
    assert!(result.passed);
    assert!(result.validated.is_empty());
    assert_eq!(result.quality_score, 0.0);
}
