//! Service orchestrator
//!
//! The composition root. Owns every service descriptor, verifies the graph once on
//! construction, builds services in dependency order on [`start`](ServiceOrchestrator::start)
//! and tears them down on [`destroy`](ServiceOrchestrator::destroy).
//!
//! ## Lifecycle
//!
//! ```text
//! NotStarted ──start──▶ Started ──destroy──▶ Destroyed
//!      └───────────────destroy──────────────────▲
//! ```
//!
//! ## Shared instances
//!
//! Each service is built once. Every dependency edge between services holds one count
//! on the service it points at. Services that no other service depends on are the entry
//! points of the graph: `start` builds them and holds one count on each, which pulls in
//! everything else. Root and UI references are checked by the verifier but hold no
//! count. The resulting counts depend only on the graph, never on package order.
//!
//! Releasing an edge decrements the count; the service is torn down when it reaches
//! zero, and only then are its own dependencies released. A shared dependency is
//! therefore destroyed after all of its consumers regardless of iteration order.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};
use trellis_domain::error::{Error, Result};
use trellis_domain::{
    ReferenceSpec, ResolvedReference, ResolvedReferenceMeta, ServiceId, ServiceInstance,
};

use super::declarations::DeclarationIndex;
use super::descriptor::{ServiceDescriptor, ServiceState};
use super::interfaces::{InterfaceRegistry, Lookup, Provider, ServiceChoice, ServiceIndex};
use super::package::PackageDescriptor;
use super::verifier::{ComputedDependencies, DependencyGraphVerifier, ResolvedDependency, RootReference};
use crate::constants::ROOT_REQUIREMENT_LABEL;

/// Mark the services that no computed dependency points at
fn entry_points(service_count: usize, dependencies: &[ComputedDependencies]) -> Vec<bool> {
    let mut entry_points = vec![true; service_count];
    for (_, resolved) in dependencies.iter().flatten() {
        for index in resolved.indices() {
            entry_points[index] = false;
        }
    }
    entry_points
}

/// Lifecycle state of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrchestratorState {
    /// Services not constructed yet
    NotStarted,
    /// Every service constructed
    Started,
    /// Services torn down
    Destroyed,
}

/// Options of a runtime lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Answer even if the package did not declare the reference
    pub ignore_declaration_check: bool,
}

impl LookupOptions {
    /// Options skipping the declaration check
    pub fn unchecked() -> Self {
        Self {
            ignore_declaration_check: true,
        }
    }
}

/// Result of a single-service runtime lookup
#[derive(Clone)]
pub enum ServiceLookup {
    /// The provider's instance
    Found(Arc<dyn ServiceInstance>),
    /// No provider
    Unimplemented,
    /// Several providers, none selected
    Ambiguous(Vec<ServiceChoice>),
    /// The calling package did not declare this reference
    Undeclared,
}

impl ServiceLookup {
    /// Whether an instance was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Found instance as its concrete type
    pub fn downcast<T: ServiceInstance>(self) -> Option<Arc<T>> {
        match self {
            Self::Found(instance) => instance.downcast_arc::<T>().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ServiceLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found(_) => f.write_str("Found(..)"),
            Self::Unimplemented => f.write_str("Unimplemented"),
            Self::Ambiguous(choices) => f.debug_tuple("Ambiguous").field(choices).finish(),
            Self::Undeclared => f.write_str("Undeclared"),
        }
    }
}

/// Result of an "all providers" runtime lookup
#[derive(Clone)]
pub enum ServicesLookup {
    /// Every provider's instance, possibly none
    Found(Vec<Arc<dyn ServiceInstance>>),
    /// The calling package did not declare this reference
    Undeclared,
}

impl ServicesLookup {
    /// Found instances that have the concrete type `T`
    pub fn downcast<T: ServiceInstance>(self) -> Option<Vec<Arc<T>>> {
        match self {
            Self::Found(instances) => Some(
                instances
                    .into_iter()
                    .filter_map(|instance| instance.downcast_arc::<T>().ok())
                    .collect(),
            ),
            Self::Undeclared => None,
        }
    }
}

impl std::fmt::Debug for ServicesLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found(instances) => write!(f, "Found(len = {})", instances.len()),
            Self::Undeclared => f.write_str("Undeclared"),
        }
    }
}

/// Composition root owning every service
pub struct ServiceOrchestrator {
    services: Vec<ServiceDescriptor>,
    ids: HashMap<String, ServiceIndex>,
    registry: InterfaceRegistry,
    dependencies: Vec<ComputedDependencies>,
    declarations: DeclarationIndex,
    /// Services no other service depends on
    entry_points: Vec<bool>,
    /// Entry points currently holding their top-level count
    root_holds: Vec<bool>,
    enforce_declarations: bool,
    start_attempted: bool,
    state: OrchestratorState,
}

impl ServiceOrchestrator {
    /// Verify the packages against the references the application requires
    pub fn new(packages: Vec<PackageDescriptor>, required: Vec<ReferenceSpec>) -> Result<Self> {
        let mut roots: Vec<RootReference> = required
            .into_iter()
            .map(|spec| RootReference::new(spec, ROOT_REQUIREMENT_LABEL))
            .collect();
        let mut declarations = DeclarationIndex::new();
        let mut package_names: Vec<String> = Vec::with_capacity(packages.len());
        let mut services = Vec::new();

        for package in packages {
            if package_names.iter().any(|name| name == package.name()) {
                return Err(Error::invalid_metadata(format!(
                    "Package '{}' is registered more than once",
                    package.name()
                )));
            }
            for spec in package.ui_references() {
                declarations.declare(package.name(), spec);
                roots.push(RootReference::new(
                    spec.clone(),
                    format!("package '{}'", package.name()),
                ));
            }
            package_names.push(package.name().to_string());
            services.extend(package.into_services());
        }

        let graph = DependencyGraphVerifier::verify(&services, &roots)?;
        let ids = services
            .iter()
            .enumerate()
            .map(|(index, service)| (service.id().to_string(), index))
            .collect();
        let entry_points = entry_points(services.len(), &graph.dependencies);

        info!(
            packages = package_names.len(),
            services = services.len(),
            "Service orchestrator created"
        );
        Ok(Self {
            root_holds: vec![false; services.len()],
            entry_points,
            services,
            ids,
            registry: graph.registry,
            dependencies: graph.dependencies,
            declarations,
            enforce_declarations: true,
            start_attempted: false,
            state: OrchestratorState::NotStarted,
        })
    }

    /// Enable or disable the declaration check of runtime lookups
    pub fn with_declaration_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_declarations = enforce;
        self
    }

    /// Construct every service in dependency order
    ///
    /// A failure aborts startup; the orchestrator cannot be started again, but
    /// [`destroy`](Self::destroy) still tears down what was built.
    pub fn start(&mut self) -> Result<()> {
        if self.start_attempted || self.state != OrchestratorState::NotStarted {
            return Err(Error::internal(format!(
                "Service orchestrator cannot start twice (state {:?})",
                self.state
            )));
        }
        self.start_attempted = true;

        info!(services = self.services.len(), "Starting services");
        for index in 0..self.services.len() {
            if self.entry_points[index] {
                self.construct(index)?;
                self.root_holds[index] = true;
            }
        }
        if let Some(orphan) = self
            .services
            .iter()
            .find(|service| service.state() != ServiceState::Constructed)
        {
            return Err(Error::internal(format!(
                "Service '{}' was not reached from any entry point",
                orphan.id()
            )));
        }

        self.state = OrchestratorState::Started;
        info!(services = self.services.len(), "All services started");
        Ok(())
    }

    /// Tear every constructed service down, consumers before their dependencies
    ///
    /// Teardown failures are logged and do not stop the remaining teardowns; the
    /// first one is returned.
    pub fn destroy(&mut self) -> Result<()> {
        if self.state == OrchestratorState::Destroyed {
            return Err(Error::internal("Service orchestrator was already destroyed"));
        }

        info!("Destroying services");
        let mut failures = Vec::new();
        for index in 0..self.services.len() {
            if std::mem::take(&mut self.root_holds[index]) {
                self.release(index, &mut failures);
            }
        }
        self.state = OrchestratorState::Destroyed;

        match failures.into_iter().next() {
            Some(first) => Err(first),
            None => {
                info!("All services destroyed");
                Ok(())
            }
        }
    }

    /// Look up the single provider of an interface on behalf of `package`
    pub fn get_service(
        &self,
        package: &str,
        interface_name: &str,
        qualifier: Option<&str>,
        options: LookupOptions,
    ) -> Result<ServiceLookup> {
        self.ensure_started()?;
        let spec = match qualifier {
            Some(qualifier) => ReferenceSpec::qualified(interface_name, qualifier),
            None => ReferenceSpec::single(interface_name),
        };
        if !self.is_declared(package, &spec, options) {
            return Ok(ServiceLookup::Undeclared);
        }

        Ok(match self.registry.lookup(interface_name, qualifier) {
            Lookup::Found(provider) => ServiceLookup::Found(self.instance_of(&provider)?),
            Lookup::Unimplemented => ServiceLookup::Unimplemented,
            Lookup::Ambiguous(choices) => ServiceLookup::Ambiguous(choices),
        })
    }

    /// Look up every provider of an interface on behalf of `package`
    pub fn get_services(
        &self,
        package: &str,
        interface_name: &str,
        options: LookupOptions,
    ) -> Result<ServicesLookup> {
        self.ensure_started()?;
        if !self.is_declared(package, &ReferenceSpec::all(interface_name), options) {
            return Ok(ServicesLookup::Undeclared);
        }

        let instances = self
            .registry
            .lookup_all(interface_name)
            .iter()
            .map(|provider| self.instance_of(provider))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServicesLookup::Found(instances))
    }

    /// Current lifecycle state
    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// State of the service with id `service_id`
    pub fn service_state(&self, service_id: &str) -> Option<ServiceState> {
        self.descriptor(service_id).map(ServiceDescriptor::state)
    }

    /// Use count of the service with id `service_id`
    pub fn use_count(&self, service_id: &str) -> Option<usize> {
        self.descriptor(service_id).map(ServiceDescriptor::use_count)
    }

    /// Ids of every service, in declaration order
    pub fn service_ids(&self) -> Vec<&ServiceId> {
        self.services.iter().map(ServiceDescriptor::id).collect()
    }

    /// Registry of provided interfaces
    pub fn registry(&self) -> &InterfaceRegistry {
        &self.registry
    }

    fn descriptor(&self, service_id: &str) -> Option<&ServiceDescriptor> {
        self.ids.get(service_id).map(|index| &self.services[*index])
    }

    fn ensure_started(&self) -> Result<()> {
        match self.state {
            OrchestratorState::Started => Ok(()),
            state => Err(Error::internal(format!(
                "Services can only be looked up after start, orchestrator is {state:?}"
            ))),
        }
    }

    fn is_declared(&self, package: &str, spec: &ReferenceSpec, options: LookupOptions) -> bool {
        if options.ignore_declaration_check
            || !self.enforce_declarations
            || self.declarations.allows(package, spec)
        {
            return true;
        }
        warn!(package, reference = %spec, "Lookup of undeclared reference");
        false
    }

    fn instance_of(&self, provider: &Provider) -> Result<Arc<dyn ServiceInstance>> {
        self.services[provider.index].instance().ok_or_else(|| {
            Error::internal(format!(
                "Service '{}' has no instance while the orchestrator is started",
                provider.service_id
            ))
        })
    }

    fn construct(&mut self, index: ServiceIndex) -> Result<Arc<dyn ServiceInstance>> {
        self.services[index].before_create()?;

        let mut acquired = Vec::new();
        let outcome = self
            .acquire_references(index, &mut acquired)
            .and_then(|(references, references_meta)| {
                self.services[index].create(references, references_meta)
            });

        if outcome.is_err() {
            // Dependencies left without a consumer are torn down here
            let mut failures = Vec::new();
            for dependency in acquired {
                self.release(dependency, &mut failures);
            }
        }
        outcome
    }

    fn acquire_references(
        &mut self,
        index: ServiceIndex,
        acquired: &mut Vec<ServiceIndex>,
    ) -> Result<(
        HashMap<String, ResolvedReference>,
        HashMap<String, ResolvedReferenceMeta>,
    )> {
        let dependencies = self.dependencies[index].clone();
        let mut references = HashMap::with_capacity(dependencies.len());
        let mut references_meta = HashMap::with_capacity(dependencies.len());

        for (name, resolved) in dependencies {
            match resolved {
                ResolvedDependency::Single(provider) => {
                    let instance = self.acquire(provider.index)?;
                    acquired.push(provider.index);
                    references.insert(name.clone(), ResolvedReference::Single(instance));
                    references_meta.insert(name, ResolvedReferenceMeta::Single(provider.meta()));
                }
                ResolvedDependency::All(providers) => {
                    let mut instances = Vec::with_capacity(providers.len());
                    for provider in &providers {
                        instances.push(self.acquire(provider.index)?);
                        acquired.push(provider.index);
                    }
                    references.insert(name.clone(), ResolvedReference::All(instances));
                    references_meta.insert(
                        name,
                        ResolvedReferenceMeta::All(providers.iter().map(Provider::meta).collect()),
                    );
                }
            }
        }
        Ok((references, references_meta))
    }

    fn acquire(&mut self, index: ServiceIndex) -> Result<Arc<dyn ServiceInstance>> {
        let service = &mut self.services[index];
        match service.state() {
            ServiceState::NotConstructed => self.construct(index),
            ServiceState::Constructed => {
                service.add_ref();
                debug!(service = %service.id(), use_count = service.use_count(), "Service shared");
                service.instance().ok_or_else(|| {
                    Error::internal(format!("Service '{}' lost its instance", service.id()))
                })
            }
            state => Err(Error::internal(format!(
                "Service '{}' requested while {state:?}",
                service.id()
            ))),
        }
    }

    fn release(&mut self, index: ServiceIndex, failures: &mut Vec<Error>) {
        let remaining = match self.services[index].remove_ref() {
            Ok(remaining) => remaining,
            Err(err) => {
                failures.push(err);
                return;
            }
        };
        if remaining > 0 {
            debug!(service = %self.services[index].id(), use_count = remaining, "Service released");
            return;
        }

        if let Err(err) = self.services[index].destroy() {
            error!(service = %self.services[index].id(), error = %err, "Service teardown failed");
            failures.push(err);
        }
        let dependencies: Vec<ServiceIndex> = self.dependencies[index]
            .iter()
            .flat_map(|(_, resolved)| resolved.indices())
            .collect();
        for dependency in dependencies {
            self.release(dependency, failures);
        }
    }
}

impl std::fmt::Debug for ServiceOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceOrchestrator")
            .field("state", &self.state)
            .field("services", &self.services)
            .field("enforce_declarations", &self.enforce_declarations)
            .finish_non_exhaustive()
    }
}
