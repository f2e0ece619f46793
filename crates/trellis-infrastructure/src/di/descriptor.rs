//! Service descriptors
//!
//! A [`ServiceDescriptor`] holds the static metadata of one service together with
//! its lifecycle state, its instance once constructed and its use count.
//!
//! ```text
//! NotConstructed ──before_create──▶ Constructing ──create──▶ Constructed ──destroy──▶ Destroyed
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::validate_service_name;
use trellis_domain::{
    Localization, Properties, ProvidedInterface, ReferenceSpec, ResolvedReference,
    ResolvedReferenceMeta, ServiceContext, ServiceFactory, ServiceId, ServiceInstance,
    ServiceManifest,
};

/// Lifecycle state of a service; states are never revisited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceState {
    /// Not yet constructed
    NotConstructed,
    /// Dependencies are being constructed
    Constructing,
    /// Instance available
    Constructed,
    /// Torn down
    Destroyed,
}

/// One declared dependency of a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Name under which the dependency is injected
    pub reference_name: String,
    /// What is requested
    pub spec: ReferenceSpec,
}

/// Static metadata and lifecycle of one service
pub struct ServiceDescriptor {
    id: ServiceId,
    dependencies: Vec<Dependency>,
    interfaces: Vec<ProvidedInterface>,
    properties: Arc<Properties>,
    localization: Arc<Localization>,
    factory: ServiceFactory,
    state: ServiceState,
    instance: Option<Arc<dyn ServiceInstance>>,
    use_count: usize,
}

impl ServiceDescriptor {
    /// Build a descriptor from manifest data
    pub fn new(
        package_name: &str,
        manifest: ServiceManifest,
        factory: ServiceFactory,
        properties: Arc<Properties>,
        localization: Arc<Localization>,
    ) -> Result<Self> {
        validate_service_name(package_name, &manifest.name)?;
        let id = ServiceId::new(package_name, &manifest.name);

        let dependencies = manifest
            .references
            .into_iter()
            .map(|(reference_name, reference)| {
                let spec = ReferenceSpec::try_from(reference).map_err(|e| {
                    Error::invalid_metadata(format!(
                        "Reference '{reference_name}' of service '{id}': {e}"
                    ))
                })?;
                Ok(Dependency {
                    reference_name,
                    spec,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for provided in &manifest.provides {
            provided.validate().map_err(|e| {
                Error::invalid_metadata(format!("Service '{id}' provides an invalid interface: {e}"))
            })?;
        }

        Ok(Self {
            id,
            dependencies,
            interfaces: manifest.provides,
            properties,
            localization,
            factory,
            state: ServiceState::NotConstructed,
            instance: None,
            use_count: 0,
        })
    }

    /// Globally unique id
    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    /// Declared dependencies
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Provided interfaces
    pub fn interfaces(&self) -> &[ProvidedInterface] {
        &self.interfaces
    }

    /// Properties handed to the factory
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Current lifecycle state
    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Number of live edges requiring this service
    pub fn use_count(&self) -> usize {
        self.use_count
    }

    /// Instance, present only while constructed
    pub fn instance(&self) -> Option<Arc<dyn ServiceInstance>> {
        self.instance.clone()
    }

    /// Enter the `Constructing` state
    pub fn before_create(&mut self) -> Result<()> {
        match self.state {
            ServiceState::NotConstructed => {
                self.state = ServiceState::Constructing;
                Ok(())
            }
            ServiceState::Constructing => Err(Error::internal(format!(
                "Cycle during construction of service '{}'",
                self.id
            ))),
            state => Err(Error::internal(format!(
                "Service '{}' cannot be constructed in state {state:?}",
                self.id
            ))),
        }
    }

    /// Run the factory with resolved references
    ///
    /// On failure the descriptor stays `Constructing`; startup is aborted.
    pub fn create(
        &mut self,
        references: HashMap<String, ResolvedReference>,
        references_meta: HashMap<String, ResolvedReferenceMeta>,
    ) -> Result<Arc<dyn ServiceInstance>> {
        if self.state != ServiceState::Constructing {
            return Err(Error::internal(format!(
                "Service '{}' must be constructing before its factory runs, found {:?}",
                self.id, self.state
            )));
        }

        let context = ServiceContext::new(
            self.id.clone(),
            references,
            references_meta,
            Arc::clone(&self.properties),
            Arc::clone(&self.localization),
        );
        let instance = (self.factory)(&context)
            .map_err(|source| Error::construction_failed(self.id.as_str(), source))?;

        self.instance = Some(Arc::clone(&instance));
        self.state = ServiceState::Constructed;
        self.use_count = 1;
        debug!(service = %self.id, "Service constructed");
        Ok(instance)
    }

    /// Register one more live edge
    pub fn add_ref(&mut self) {
        self.use_count += 1;
    }

    /// Drop one live edge, returning the remaining count
    pub fn remove_ref(&mut self) -> Result<usize> {
        if self.state != ServiceState::Constructed || self.use_count == 0 {
            return Err(Error::internal(format!(
                "Service '{}' released more often than acquired (state {:?})",
                self.id, self.state
            )));
        }
        self.use_count -= 1;
        Ok(self.use_count)
    }

    /// Run the teardown hook and enter the `Destroyed` state
    ///
    /// A failing hook is reported but the transition still happens.
    pub fn destroy(&mut self) -> Result<()> {
        let instance = self.instance.take();
        self.state = ServiceState::Destroyed;
        self.use_count = 0;

        let Some(instance) = instance else {
            return Ok(());
        };
        debug!(service = %self.id, "Destroying service");
        instance
            .destroy()
            .map_err(|source| Error::destruction_failed(self.id.as_str(), source))
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("id", &self.id)
            .field("dependencies", &self.dependencies)
            .field("interfaces", &self.interfaces)
            .field("state", &self.state)
            .field("use_count", &self.use_count)
            .finish_non_exhaustive()
    }
}
