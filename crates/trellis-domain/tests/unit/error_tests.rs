//! Error taxonomy tests

use std::error::Error as _;

use trellis_domain::error::{BoxError, Error};

#[test]
fn test_every_kind_has_a_distinct_code() {
    let errors = vec![
        Error::InterfaceNotFound {
            interface_name: "x".into(),
            qualifier: None,
            message: "m".into(),
        },
        Error::AmbiguousDependency {
            interface_name: "x".into(),
            choices: vec![],
            message: "m".into(),
        },
        Error::DependencyCycle {
            path: vec![],
            message: "m".into(),
        },
        Error::DuplicateInterface {
            interface_name: "x".into(),
            qualifier: "q".into(),
            message: "m".into(),
        },
        Error::invalid_metadata("m"),
        Error::construction_failed("a::A", "boom".into()),
        Error::destruction_failed("a::A", "boom".into()),
        Error::configuration("m"),
        Error::internal("m"),
    ];

    let mut codes: Vec<&str> = errors.iter().map(Error::code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn test_destruction_failure_preserves_anyhow_cause() {
    let cause: BoxError = anyhow::anyhow!("socket already closed").into();
    let err = Error::destruction_failed("net::Socket", cause);

    assert_eq!(err.code(), "service-destruction-failed");
    assert_eq!(
        err.source().map(ToString::to_string),
        Some("socket already closed".to_string())
    );
}
