//! Shared fixtures
//!
//! Services built by these fixtures append to a [`Journal`] when their factory runs
//! (`create <id>`) and when they are torn down (`destroy <id>`), so tests can assert
//! ordering.

use std::sync::{Arc, Mutex};

use trellis_domain::{
    BoxError, PackageDefinition, PackageManifest, ServiceContext, ServiceFactory, ServiceInstance,
    ServiceManifest,
};
use trellis_infrastructure::di::PackageDescriptor;

/// Ordered record of lifecycle events
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> usize {
        self.entries()
            .iter()
            .position(|entry| entry == event)
            .unwrap_or_else(|| panic!("event '{event}' not recorded in {:?}", self.entries()))
    }

    pub fn count(&self, event: &str) -> usize {
        self.entries().iter().filter(|entry| *entry == event).count()
    }
}

/// Service recording its teardown
pub struct Recorded {
    pub id: String,
    journal: Journal,
    fail_teardown: bool,
}

impl ServiceInstance for Recorded {
    fn destroy(&self) -> Result<(), BoxError> {
        self.journal.record(format!("destroy {}", self.id));
        if self.fail_teardown {
            return Err(format!("{} refused to close", self.id).into());
        }
        Ok(())
    }
}

fn build(journal: &Journal, fail_teardown: bool) -> ServiceFactory {
    let journal = journal.clone();
    Arc::new(
        move |ctx: &ServiceContext| -> Result<Arc<dyn ServiceInstance>, BoxError> {
            let id = ctx.service_id().to_string();
            journal.record(format!("create {id}"));
            Ok(Arc::new(Recorded {
                id,
                journal: journal.clone(),
                fail_teardown,
            }))
        },
    )
}

/// Factory of a [`Recorded`] service
pub fn recorded(journal: &Journal) -> ServiceFactory {
    build(journal, false)
}

/// Factory of a [`Recorded`] service whose teardown fails
pub fn faulty_teardown(journal: &Journal) -> ServiceFactory {
    build(journal, true)
}

/// Factory that always fails
pub fn broken(journal: &Journal) -> ServiceFactory {
    let journal = journal.clone();
    Arc::new(
        move |ctx: &ServiceContext| -> Result<Arc<dyn ServiceInstance>, BoxError> {
            journal.record(format!("fail {}", ctx.service_id()));
            Err(anyhow::anyhow!("backend unavailable").into())
        },
    )
}

/// Package of `services`, each paired with its factory
pub fn package(name: &str, services: Vec<(ServiceManifest, ServiceFactory)>) -> PackageDescriptor {
    package_with_ui(name, services, PackageManifest::new(name))
}

/// Package of `services` on top of `manifest` (for UI references and properties)
pub fn package_with_ui(
    name: &str,
    services: Vec<(ServiceManifest, ServiceFactory)>,
    manifest: PackageManifest,
) -> PackageDescriptor {
    assert_eq!(manifest.name, name);
    let definition = services
        .into_iter()
        .fold(PackageDefinition::new(manifest), |definition, (service, factory)| {
            definition.with_service(service, factory)
        });
    PackageDescriptor::new(definition, None, "en").unwrap()
}
