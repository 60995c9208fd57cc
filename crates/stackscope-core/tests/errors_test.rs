//! Error code and message tests.

use stackscope_core::errors::{
    AnalyzerError, ConfigError, ErrorCode, InputError, StageError,
};

#[test]
fn test_error_codes() {
    let config = ConfigError::FileNotFound {
        path: "stackscope.toml".to_string(),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");

    let input = InputError::DuplicateSite {
        site: "https://a.example".to_string(),
    };
    assert_eq!(input.error_code(), "INPUT_ERROR");

    let stage = StageError::Panicked {
        stage: "sanity-checks".to_string(),
        message: "boom".to_string(),
    };
    assert_eq!(stage.error_code(), "STAGE_PANIC");

    let malformed = StageError::MalformedInput {
        signal: "header:server".to_string(),
        message: "NaN frequency".to_string(),
    };
    assert_eq!(malformed.error_code(), "STAGE_ERROR");

    let analyzer = AnalyzerError::MissingEvidence {
        dimension: "meta".to_string(),
    };
    assert_eq!(analyzer.error_code(), "ANALYZER_ERROR");
}

#[test]
fn test_coded_message_format() {
    let err = InputError::EmptySiteId { position: 4 };
    assert_eq!(
        err.coded_message(),
        "[INPUT_ERROR] Record #4 has an empty site identifier; skipped"
    );
}
