//! Tests for the stackscope configuration system.

use std::sync::Mutex;

use stackscope_core::config::{CliOverrides, StackscopeConfig};
use stackscope_core::errors::ConfigError;
use stackscope_core::types::PageTypeFilter;

/// Serializes tests that touch environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_stackscope_env_vars() {
    for key in [
        "STACKSCOPE_ANALYSIS_MIN_OCCURRENCES",
        "STACKSCOPE_ANALYSIS_MIN_SITES",
        "STACKSCOPE_ANALYSIS_PAGE_TYPE_FILTER",
        "STACKSCOPE_VALIDATION_SKIP_STATISTICAL_TESTS",
        "STACKSCOPE_VALIDATION_STOP_ON_ERROR",
        "STACKSCOPE_VALIDATION_DEBUG_MODE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_stackscope_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("stackscope.toml"),
        r#"
[analysis]
min_occurrences = 5
min_sites = 20

[validation]
stop_on_error = true
"#,
    )
    .unwrap();

    std::env::set_var("STACKSCOPE_ANALYSIS_MIN_SITES", "40");

    let cli = CliOverrides {
        min_occurrences: Some(7),
        ..Default::default()
    };
    let config = StackscopeConfig::load(dir.path(), Some(&cli)).unwrap();

    // CLI beats file
    assert_eq!(config.analysis.effective_min_occurrences(), 7);
    // Env beats file
    assert_eq!(config.analysis.effective_min_sites(), 40);
    // File beats defaults
    assert!(config.validation.effective_stop_on_error());

    clear_stackscope_env_vars();
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_stackscope_env_vars();

    let dir = tempdir();
    let config = StackscopeConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.analysis.effective_min_occurrences(), 3);
    assert_eq!(config.analysis.effective_page_type_filter(), PageTypeFilter::All);
    assert!((config.analysis.effective_detection_threshold() - 0.5).abs() < 1e-12);
    assert!((config.bias.effective_dominance_threshold_pct() - 70.0).abs() < 1e-12);
    assert!((config.bias.effective_concentration_threshold() - 0.4).abs() < 1e-12);
    assert_eq!(config.bias.effective_min_platform_sample(), 30);
    assert_eq!(config.validation.effective_sample_size_floor(), 30);
    assert!(config.validation.effective_enable_validation());
    assert!(!config.validation.effective_skip_statistical_tests());
    assert!((config.signatures.effective_conflict_score_floor() - 0.02).abs() < 1e-12);
}

#[test]
fn test_env_page_type_filter() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_stackscope_env_vars();

    let dir = tempdir();
    std::env::set_var("STACKSCOPE_ANALYSIS_PAGE_TYPE_FILTER", "robots");
    let config = StackscopeConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.analysis.effective_page_type_filter(), PageTypeFilter::Robots);

    clear_stackscope_env_vars();
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_stackscope_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("stackscope.toml"), "not toml {{{{").unwrap();

    match StackscopeConfig::load(dir.path(), None) {
        Err(ConfigError::ParseError { .. }) => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_out_of_range_values_rejected() {
    let err = StackscopeConfig::from_toml("[bias]\nconcentration_threshold = 1.5\n").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "bias.concentration_threshold")
        }
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }

    assert!(StackscopeConfig::from_toml("[analysis]\nmin_occurrences = 0\n").is_err());
    assert!(StackscopeConfig::from_toml("[bias]\ndominance_threshold_pct = 120.0\n").is_err());
    assert!(StackscopeConfig::from_toml("[bias]\nsignificance_level = 0.0\n").is_err());
    assert!(StackscopeConfig::from_toml("[validation]\nsurvival_weight = -1.0\n").is_err());
}

#[test]
fn test_page_type_filter_from_toml() {
    let config = StackscopeConfig::from_toml("[analysis]\npage_type_filter = \"mainpage\"\n").unwrap();
    assert_eq!(config.analysis.effective_page_type_filter(), PageTypeFilter::MainPage);
}

#[test]
fn test_quality_weights_normalised() {
    let config = StackscopeConfig::from_toml(
        "[validation]\nsurvival_weight = 2.0\nsignificance_weight = 1.0\ndiversity_weight = 1.0\n",
    )
    .unwrap();
    let (s, g, d) = config.validation.effective_quality_weights();
    assert!((s - 0.5).abs() < 1e-12);
    assert!((g - 0.25).abs() < 1e-12);
    assert!((d - 0.25).abs() < 1e-12);
}

#[test]
fn test_toml_round_trip() {
    let config = StackscopeConfig::from_toml(
        "[analysis]\nmin_occurrences = 4\n[signatures]\nmin_specificity = 0.4\n",
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let back = StackscopeConfig::from_toml(&text).unwrap();
    assert_eq!(back.analysis.effective_min_occurrences(), 4);
    assert!((back.signatures.effective_min_specificity() - 0.4).abs() < 1e-12);
}
