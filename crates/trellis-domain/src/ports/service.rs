//! Service ports
//!
//! Contracts between the runtime and the services it constructs: the instance trait,
//! the factory signature and the context handed to factories.

use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};
use serde::de::DeserializeOwned;

use crate::error::{BoxError, Error, Result};
use crate::value_objects::{Properties, ServiceId};

/// A constructed service
///
/// Implementors are shared between every consumer of the service. The optional
/// [`destroy`](ServiceInstance::destroy) hook runs once, after the last consumer
/// has been torn down.
pub trait ServiceInstance: DowncastSync {
    /// Teardown hook
    fn destroy(&self) -> std::result::Result<(), BoxError> {
        Ok(())
    }
}
impl_downcast!(sync ServiceInstance);

/// Factory building a service instance from its resolved context
pub type ServiceFactory =
    Arc<dyn Fn(&ServiceContext) -> std::result::Result<Arc<dyn ServiceInstance>, BoxError> + Send + Sync>;

/// Wrap a closure as a [`ServiceFactory`]
pub fn service_factory<F, S>(factory: F) -> ServiceFactory
where
    F: Fn(&ServiceContext) -> std::result::Result<S, BoxError> + Send + Sync + 'static,
    S: ServiceInstance,
{
    Arc::new(
        move |ctx: &ServiceContext| -> std::result::Result<Arc<dyn ServiceInstance>, BoxError> {
            let instance = factory(ctx)?;
            Ok(Arc::new(instance))
        },
    )
}

/// Instance(s) injected for one reference
#[derive(Clone)]
pub enum ResolvedReference {
    /// Single provider
    Single(Arc<dyn ServiceInstance>),
    /// Every provider of an interface
    All(Vec<Arc<dyn ServiceInstance>>),
}

impl std::fmt::Debug for ResolvedReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Single(..)"),
            Self::All(all) => write!(f, "All(len = {})", all.len()),
        }
    }
}

/// Which provider satisfied a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMeta {
    /// Providing service
    pub service_id: ServiceId,
    /// Interface the provider was registered under
    pub interface_name: String,
    /// Qualifier the provider was registered with
    pub qualifier: Option<String>,
}

/// Provider metadata for one reference, mirroring [`ResolvedReference`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedReferenceMeta {
    /// Single provider
    Single(ReferenceMeta),
    /// Every provider of an interface
    All(Vec<ReferenceMeta>),
}

/// Locale and messages of the package a service belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Localization {
    /// Active locale
    pub locale: String,
    /// Messages by key
    pub messages: BTreeMap<String, String>,
}

impl Localization {
    /// Localization for `locale` with the given messages
    pub fn new(locale: impl Into<String>, messages: BTreeMap<String, String>) -> Self {
        Self {
            locale: locale.into(),
            messages,
        }
    }

    /// Message for `key`
    pub fn message(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }
}

/// Everything a factory receives
#[derive(Debug, Clone)]
pub struct ServiceContext {
    service_id: ServiceId,
    references: HashMap<String, ResolvedReference>,
    references_meta: HashMap<String, ResolvedReferenceMeta>,
    properties: Arc<Properties>,
    localization: Arc<Localization>,
}

impl ServiceContext {
    /// Assemble a context; called by the runtime right before a factory runs
    pub fn new(
        service_id: ServiceId,
        references: HashMap<String, ResolvedReference>,
        references_meta: HashMap<String, ResolvedReferenceMeta>,
        properties: Arc<Properties>,
        localization: Arc<Localization>,
    ) -> Self {
        Self {
            service_id,
            references,
            references_meta,
            properties,
            localization,
        }
    }

    /// Id of the service being constructed
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Raw injected instance(s) for `name`
    pub fn instance(&self, name: &str) -> Option<&ResolvedReference> {
        self.references.get(name)
    }

    /// All injected references
    pub fn references(&self) -> &HashMap<String, ResolvedReference> {
        &self.references
    }

    /// Provider metadata for `name`
    pub fn reference_meta(&self, name: &str) -> Option<&ResolvedReferenceMeta> {
        self.references_meta.get(name)
    }

    /// Injected single reference, downcast to its concrete type
    pub fn reference<T: ServiceInstance>(&self, name: &str) -> Result<Arc<T>> {
        match self.references.get(name) {
            Some(ResolvedReference::Single(instance)) => self.downcast(name, Arc::clone(instance)),
            Some(ResolvedReference::All(_)) => Err(Error::internal(format!(
                "Reference '{name}' of service '{}' injects all implementations",
                self.service_id
            ))),
            None => Err(self.missing(name)),
        }
    }

    /// Injected "all" reference, each instance downcast to `T`
    pub fn references_all<T: ServiceInstance>(&self, name: &str) -> Result<Vec<Arc<T>>> {
        match self.references.get(name) {
            Some(ResolvedReference::All(instances)) => instances
                .iter()
                .map(|instance| self.downcast(name, Arc::clone(instance)))
                .collect(),
            Some(ResolvedReference::Single(_)) => Err(Error::internal(format!(
                "Reference '{name}' of service '{}' injects a single implementation",
                self.service_id
            ))),
            None => Err(self.missing(name)),
        }
    }

    /// Resolved package properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Single property deserialized into `T`
    pub fn property<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.properties.get_as(key)
    }

    /// Localization of the owning package
    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    fn downcast<T: ServiceInstance>(
        &self,
        name: &str,
        instance: Arc<dyn ServiceInstance>,
    ) -> Result<Arc<T>> {
        instance.downcast_arc::<T>().map_err(|_| {
            Error::internal(format!(
                "Reference '{name}' of service '{}' is not a {}",
                self.service_id,
                type_name::<T>()
            ))
        })
    }

    fn missing(&self, name: &str) -> Error {
        Error::internal(format!(
            "Service '{}' has no reference named '{name}'",
            self.service_id
        ))
    }
}
