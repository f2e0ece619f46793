//! Error Extension Tests

use trellis_infrastructure::error_ext::ErrorContext;

#[test]
fn test_with_context_is_lazy_and_keeps_source() {
    let parsed: Result<u32, std::num::ParseIntError> = "12".parse();
    let value = parsed
        .with_context(|| -> String { panic!("context built for a successful result") })
        .unwrap();
    assert_eq!(value, 12);

    let failed: Result<u32, std::num::ParseIntError> = "twelve".parse();
    let err = failed
        .with_context(|| format!("Failed to parse {}", "zoom"))
        .unwrap_err();
    assert_eq!(err.code(), "configuration");
    assert!(err.to_string().starts_with("Configuration error: Failed to parse zoom"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_context_on_serde_error() {
    let result: Result<serde_json::Value, serde_json::Error> = serde_json::from_str("{");
    let err = result.context("Invalid manifest").unwrap_err();
    assert!(err.to_string().contains("Invalid manifest"));
}
