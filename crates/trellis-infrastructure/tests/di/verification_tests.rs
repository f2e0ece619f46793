//! Graph errors reported when the orchestrator is created

use trellis_domain::{Error, PackageManifest, ProvidedInterface, ReferenceSpec, ServiceManifest};
use trellis_infrastructure::di::ServiceOrchestrator;

use crate::test_utils::{Journal, package, package_with_ui, recorded};

#[test]
fn test_cycle_rejected_before_any_construction() {
    let journal = Journal::new();
    let packages = vec![
        package(
            "a",
            vec![(
                ServiceManifest::new("A")
                    .with_reference("b", &ReferenceSpec::single("b.serviceB"))
                    .with_provides(ProvidedInterface::new("a.serviceA")),
                recorded(&journal),
            )],
        ),
        package(
            "b",
            vec![(
                ServiceManifest::new("B")
                    .with_reference("a", &ReferenceSpec::single("a.serviceA"))
                    .with_provides(ProvidedInterface::new("b.serviceB")),
                recorded(&journal),
            )],
        ),
    ];

    let err = ServiceOrchestrator::new(packages, vec![ReferenceSpec::single("a.serviceA")])
        .unwrap_err();
    match err {
        Error::DependencyCycle { path, message } => {
            assert_eq!(path, vec!["a::A", "b::B", "a::A"]);
            assert!(message.contains("required by the application"));
            assert!(message.contains("reference 'b' requires 'b.serviceB'"));
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert!(journal.entries().is_empty());
}

#[test]
fn test_unresolved_ui_reference() {
    let packages = vec![package_with_ui(
        "ui",
        Vec::new(),
        PackageManifest::new("ui").with_ui_reference(&ReferenceSpec::single("map.MapRegistry")),
    )];

    let err = ServiceOrchestrator::new(packages, Vec::new()).unwrap_err();
    assert_eq!(err.code(), "interface-not-found");
    assert!(err.to_string().contains("Package 'ui' requires 'map.MapRegistry'"));
}

#[test]
fn test_ambiguous_service_dependency() {
    let journal = Journal::new();
    let packages = vec![package(
        "pkg",
        vec![
            (
                ServiceManifest::new("Consumer").with_reference("log", &ReferenceSpec::single("Log")),
                recorded(&journal),
            ),
            (
                ServiceManifest::new("First").with_provides(ProvidedInterface::new("Log")),
                recorded(&journal),
            ),
            (
                ServiceManifest::new("Second").with_provides(ProvidedInterface::new("Log")),
                recorded(&journal),
            ),
        ],
    )];

    let err = ServiceOrchestrator::new(packages, Vec::new()).unwrap_err();
    assert_eq!(err.code(), "ambiguous-dependency");
    assert!(err.to_string().contains("Service 'pkg::Consumer' (reference 'log')"));
}

#[test]
fn test_duplicate_qualifier_across_packages() {
    let journal = Journal::new();
    let packages = vec![
        package(
            "one",
            vec![(
                ServiceManifest::new("S").with_provides(ProvidedInterface::qualified("x", "q")),
                recorded(&journal),
            )],
        ),
        package(
            "two",
            vec![(
                ServiceManifest::new("S").with_provides(ProvidedInterface::qualified("x", "q")),
                recorded(&journal),
            )],
        ),
    ];

    let err = ServiceOrchestrator::new(packages, Vec::new()).unwrap_err();
    assert_eq!(err.code(), "duplicate-interface");
}

#[test]
fn test_duplicate_package_rejected() {
    let packages = vec![package("same", Vec::new()), package("same", Vec::new())];
    let err = ServiceOrchestrator::new(packages, Vec::new()).unwrap_err();
    assert_eq!(err.code(), "invalid-metadata");
}

#[test]
fn test_registry_counts_every_provision() {
    let journal = Journal::new();
    let packages = vec![package(
        "pkg",
        vec![(
            ServiceManifest::new("Multi")
                .with_provides(ProvidedInterface::new("x"))
                .with_provides(ProvidedInterface::new("y")),
            recorded(&journal),
        )],
    )];

    let orchestrator = ServiceOrchestrator::new(packages, Vec::new()).unwrap();
    assert_eq!(orchestrator.registry().service_count(), 2);
    assert_eq!(orchestrator.registry().interface_names(), vec!["x", "y"]);
    assert_eq!(
        orchestrator
            .service_ids()
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>(),
        vec!["pkg::Multi"]
    );
}
