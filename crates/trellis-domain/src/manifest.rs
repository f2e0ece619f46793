//! Package and service manifests
//!
//! Static metadata produced by the external build step. Manifests are plain serde
//! data; a [`PackageDefinition`] pairs a manifest with the factories of its services.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ports::ServiceFactory;
use crate::value_objects::{Properties, ProvidedInterface, ReferenceManifest, ReferenceSpec};

/// Metadata of one service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceManifest {
    /// Service name, unique within its package
    pub name: String,
    /// Dependencies by reference name
    #[serde(default)]
    pub references: BTreeMap<String, ReferenceManifest>,
    /// Interfaces this service provides
    #[serde(default)]
    pub provides: Vec<ProvidedInterface>,
}

impl ServiceManifest {
    /// Manifest for a service without references or provided interfaces
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declare a dependency
    pub fn with_reference(mut self, name: impl Into<String>, spec: &ReferenceSpec) -> Self {
        self.references.insert(name.into(), spec.into());
        self
    }

    /// Declare a provided interface
    pub fn with_provides(mut self, provided: ProvidedInterface) -> Self {
        self.provides.push(provided);
        self
    }
}

/// Metadata of one package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    /// Package name
    pub name: String,
    /// Services by name
    #[serde(default)]
    pub services: BTreeMap<String, ServiceManifest>,
    /// References declared by code outside any service
    #[serde(default)]
    pub ui_references: Vec<ReferenceManifest>,
    /// Declared property defaults
    #[serde(default)]
    pub properties: Properties,
    /// Properties the caller must supply
    #[serde(default)]
    pub required_properties: Vec<String>,
}

impl PackageManifest {
    /// Empty manifest for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a service, keyed by its name
    pub fn with_service(mut self, service: ServiceManifest) -> Self {
        self.services.insert(service.name.clone(), service);
        self
    }

    /// Declare a root-level reference
    pub fn with_ui_reference(mut self, spec: &ReferenceSpec) -> Self {
        self.ui_references.push(spec.into());
        self
    }

    /// Declare a property default
    pub fn with_property(mut self, key: impl Into<String>, default: impl Into<Value>) -> Self {
        self.properties.insert(key, default);
        self
    }

    /// Declare a property the caller must supply
    pub fn with_required_property(mut self, key: impl Into<String>) -> Self {
        self.required_properties.push(key.into());
        self
    }
}

/// A manifest together with the factories of its services
#[derive(Clone, Default)]
pub struct PackageDefinition {
    /// Static metadata
    pub manifest: PackageManifest,
    /// Factory per service name
    pub factories: HashMap<String, ServiceFactory>,
    /// Localized messages of the package
    pub messages: BTreeMap<String, String>,
}

impl PackageDefinition {
    /// Definition without factories
    pub fn new(manifest: PackageManifest) -> Self {
        Self {
            manifest,
            factories: HashMap::new(),
            messages: BTreeMap::new(),
        }
    }

    /// Package name
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Register the factory of an already declared service
    pub fn with_factory(mut self, service_name: impl Into<String>, factory: ServiceFactory) -> Self {
        self.factories.insert(service_name.into(), factory);
        self
    }

    /// Declare a service and register its factory in one step
    pub fn with_service(mut self, service: ServiceManifest, factory: ServiceFactory) -> Self {
        self.factories.insert(service.name.clone(), factory);
        self.manifest.services.insert(service.name.clone(), service);
        self
    }

    /// Add a localized message
    pub fn with_message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }
}

impl std::fmt::Debug for PackageDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut factories: Vec<&String> = self.factories.keys().collect();
        factories.sort();
        f.debug_struct("PackageDefinition")
            .field("manifest", &self.manifest)
            .field("factories", &factories)
            .field("messages", &self.messages.len())
            .finish()
    }
}
