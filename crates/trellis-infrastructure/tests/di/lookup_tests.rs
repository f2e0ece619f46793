//! Declaration-gated runtime lookups

use trellis_domain::{PackageManifest, ProvidedInterface, ReferenceSpec, ServiceManifest};
use trellis_infrastructure::di::{
    LookupOptions, ServiceLookup, ServiceOrchestrator, ServicesLookup,
};

use crate::test_utils::{Journal, Recorded, package, package_with_ui, recorded};

fn loggers(journal: &Journal) -> ServiceOrchestrator {
    let packages = vec![
        package(
            "logs",
            vec![
                (
                    ServiceManifest::new("Console")
                        .with_provides(ProvidedInterface::qualified("log.Logger", "console")),
                    recorded(journal),
                ),
                (
                    ServiceManifest::new("File")
                        .with_provides(ProvidedInterface::qualified("log.Logger", "file")),
                    recorded(journal),
                ),
            ],
        ),
        package_with_ui(
            "ui",
            Vec::new(),
            PackageManifest::new("ui")
                .with_ui_reference(&ReferenceSpec::qualified("log.Logger", "file"))
                .with_ui_reference(&ReferenceSpec::all("log.Logger")),
        ),
    ];
    ServiceOrchestrator::new(packages, Vec::new()).unwrap()
}

#[test]
fn test_lookup_requires_start() {
    let journal = Journal::new();
    let mut orchestrator = loggers(&journal);

    let err = orchestrator
        .get_service("ui", "log.Logger", Some("file"), LookupOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), "internal");

    orchestrator.start().unwrap();
    orchestrator.destroy().unwrap();
    let err = orchestrator
        .get_services("ui", "log.Logger", LookupOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), "internal");
}

#[test]
fn test_declared_qualified_lookup() {
    let journal = Journal::new();
    let mut orchestrator = loggers(&journal);
    orchestrator.start().unwrap();

    let file = orchestrator
        .get_service("ui", "log.Logger", Some("file"), LookupOptions::default())
        .unwrap()
        .downcast::<Recorded>()
        .unwrap();
    assert_eq!(file.id, "logs::File");
}

#[test]
fn test_undeclared_lookup_is_refused() {
    let journal = Journal::new();
    let mut orchestrator = loggers(&journal);
    orchestrator.start().unwrap();

    let console = orchestrator
        .get_service("ui", "log.Logger", Some("console"), LookupOptions::default())
        .unwrap();
    assert!(matches!(console, ServiceLookup::Undeclared));

    let unqualified = orchestrator
        .get_service("ui", "log.Logger", None, LookupOptions::default())
        .unwrap();
    assert!(matches!(unqualified, ServiceLookup::Undeclared));

    let other = orchestrator
        .get_services("logs", "log.Logger", LookupOptions::default())
        .unwrap();
    assert!(matches!(other, ServicesLookup::Undeclared));

    let unchecked = orchestrator
        .get_service("ui", "log.Logger", Some("console"), LookupOptions::unchecked())
        .unwrap();
    assert!(unchecked.is_found());
}

#[test]
fn test_unqualified_lookup_is_ambiguous() {
    let journal = Journal::new();
    let mut orchestrator = loggers(&journal);
    orchestrator.start().unwrap();

    match orchestrator
        .get_service("ui", "log.Logger", None, LookupOptions::unchecked())
        .unwrap()
    {
        ServiceLookup::Ambiguous(choices) => {
            let rendered: Vec<String> = choices.iter().map(ToString::to_string).collect();
            assert_eq!(
                rendered,
                vec![
                    "logs::Console (qualifier 'console')",
                    "logs::File (qualifier 'file')"
                ]
            );
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }

    let all = orchestrator
        .get_services("ui", "log.Logger", LookupOptions::default())
        .unwrap()
        .downcast::<Recorded>()
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn test_missing_interface_is_unimplemented() {
    let journal = Journal::new();
    let mut orchestrator = loggers(&journal);
    orchestrator.start().unwrap();

    let missing = orchestrator
        .get_service("ui", "metrics.Sink", None, LookupOptions::unchecked())
        .unwrap();
    assert!(matches!(missing, ServiceLookup::Unimplemented));

    match orchestrator
        .get_services("ui", "metrics.Sink", LookupOptions::unchecked())
        .unwrap()
    {
        ServicesLookup::Found(instances) => assert!(instances.is_empty()),
        other => panic!("expected an empty result, got {other:?}"),
    }
}

#[test]
fn test_enforcement_can_be_disabled() {
    let journal = Journal::new();
    let mut orchestrator = loggers(&journal).with_declaration_enforcement(false);
    orchestrator.start().unwrap();

    let console = orchestrator
        .get_service("anyone", "log.Logger", Some("console"), LookupOptions::default())
        .unwrap();
    assert!(console.is_found());
}
