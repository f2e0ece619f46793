//! Package descriptors
//!
//! Turns a [`PackageDefinition`] into validated runtime descriptors: the package name
//! is checked, every service is paired with its factory, UI references are parsed and
//! properties are merged with the caller's overrides.

use std::sync::Arc;

use tracing::debug;
use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::validate_package_name;
use trellis_domain::{Localization, PackageDefinition, Properties, ReferenceSpec};

use super::descriptor::ServiceDescriptor;

/// Services and root-level references contributed by one package
#[derive(Debug)]
pub struct PackageDescriptor {
    name: String,
    services: Vec<ServiceDescriptor>,
    ui_references: Vec<ReferenceSpec>,
    properties: Arc<Properties>,
}

impl PackageDescriptor {
    /// Validate `definition` and build its service descriptors
    ///
    /// `overrides` replace declared property defaults; keys listed as required must
    /// be set once both are merged.
    pub fn new(
        definition: PackageDefinition,
        overrides: Option<&Properties>,
        locale: &str,
    ) -> Result<Self> {
        let PackageDefinition {
            manifest,
            mut factories,
            messages,
        } = definition;
        let name = manifest.name;
        validate_package_name(&name)?;

        if let Some(orphan) = factories
            .keys()
            .filter(|service| !manifest.services.contains_key(*service))
            .min()
        {
            return Err(Error::invalid_metadata(format!(
                "Package '{name}' registers a factory for undeclared service '{orphan}'"
            )));
        }

        let properties = Arc::new(resolve_properties(
            &name,
            manifest.properties,
            overrides,
            &manifest.required_properties,
        )?);
        let localization = Arc::new(Localization::new(locale, messages));

        let mut services = Vec::with_capacity(manifest.services.len());
        for (key, service) in manifest.services {
            if key != service.name {
                return Err(Error::invalid_metadata(format!(
                    "Service '{key}' of package '{name}' declares mismatching name '{}'",
                    service.name
                )));
            }
            let factory = factories.remove(&key).ok_or_else(|| {
                Error::invalid_metadata(format!(
                    "Service '{key}' of package '{name}' has no factory"
                ))
            })?;
            services.push(ServiceDescriptor::new(
                &name,
                service,
                factory,
                Arc::clone(&properties),
                Arc::clone(&localization),
            )?);
        }

        let ui_references = manifest
            .ui_references
            .into_iter()
            .map(|reference| {
                ReferenceSpec::try_from(reference).map_err(|e| {
                    Error::invalid_metadata(format!("UI reference of package '{name}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            package = %name,
            services = services.len(),
            ui_references = ui_references.len(),
            "Package registered"
        );
        Ok(Self {
            name,
            services,
            ui_references,
            properties,
        })
    }

    /// Package name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service descriptors, in declaration order
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// References declared outside any service
    pub fn ui_references(&self) -> &[ReferenceSpec] {
        &self.ui_references
    }

    /// Merged properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Hand the service descriptors over to the orchestrator
    pub fn into_services(self) -> Vec<ServiceDescriptor> {
        self.services
    }
}

fn resolve_properties(
    package: &str,
    defaults: Properties,
    overrides: Option<&Properties>,
    required: &[String],
) -> Result<Properties> {
    let mut resolved = defaults;
    if let Some(overrides) = overrides {
        for (key, value) in overrides.iter() {
            if !resolved.contains_key(key) && !required.contains(key) {
                debug!(package, property = %key, "Override for undeclared property");
            }
            resolved.insert(key.clone(), value.clone());
        }
    }

    let missing: Vec<&str> = required
        .iter()
        .filter(|key| !resolved.is_set(key))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(Error::configuration(format!(
            "Package '{package}' requires properties that were not supplied: {}",
            missing.join(", ")
        )));
    }
    Ok(resolved)
}
