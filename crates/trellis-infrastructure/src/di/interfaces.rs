//! Interface registry
//!
//! Maps interface names to the services providing them. Unqualified providers
//! accumulate freely; ambiguity only matters at lookup time. Qualifiers are unique
//! per interface and checked at registration.

use std::collections::{BTreeMap, HashMap, HashSet};

use trellis_domain::error::{Error, Result};
use trellis_domain::{ProvidedInterface, ReferenceMeta, ServiceId};

/// Position of a service descriptor inside the orchestrator
pub type ServiceIndex = usize;

/// One registration of a service under an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    /// Descriptor position
    pub index: ServiceIndex,
    /// Providing service
    pub service_id: ServiceId,
    /// Interface registered
    pub interface_name: String,
    /// Qualifier registered
    pub qualifier: Option<String>,
}

impl Provider {
    /// Metadata handed to the consuming factory
    pub fn meta(&self) -> ReferenceMeta {
        ReferenceMeta {
            service_id: self.service_id.clone(),
            interface_name: self.interface_name.clone(),
            qualifier: self.qualifier.clone(),
        }
    }
}

/// A candidate listed for an ambiguous lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceChoice {
    /// Providing service
    pub service_id: ServiceId,
    /// Qualifier of the registration, if any
    pub qualifier: Option<String>,
}

impl std::fmt::Display for ServiceChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{} (qualifier '{qualifier}')", self.service_id),
            None => write!(f, "{}", self.service_id),
        }
    }
}

/// Outcome of a single-provider lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Exactly one provider
    Found(Provider),
    /// No provider
    Unimplemented,
    /// Several providers and no qualifier to pick one
    Ambiguous(Vec<ServiceChoice>),
}

#[derive(Debug, Default)]
struct InterfaceEntry {
    unqualified: Vec<Provider>,
    qualified: BTreeMap<String, Provider>,
}

impl InterfaceEntry {
    fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.unqualified.iter().chain(self.qualified.values())
    }
}

/// Index of interface providers
#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    interfaces: HashMap<String, InterfaceEntry>,
    service_count: usize,
}

impl InterfaceRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service_id` as a provider of `provided`
    pub fn register(
        &mut self,
        index: ServiceIndex,
        service_id: &ServiceId,
        provided: &ProvidedInterface,
    ) -> Result<()> {
        let entry = self
            .interfaces
            .entry(provided.interface_name.clone())
            .or_default();
        let provider = Provider {
            index,
            service_id: service_id.clone(),
            interface_name: provided.interface_name.clone(),
            qualifier: provided.qualifier.clone(),
        };

        match &provided.qualifier {
            None => entry.unqualified.push(provider),
            Some(qualifier) => {
                if let Some(existing) = entry.qualified.get(qualifier) {
                    return Err(Error::DuplicateInterface {
                        interface_name: provided.interface_name.clone(),
                        qualifier: qualifier.clone(),
                        message: format!(
                            "Services '{}' and '{service_id}' both provide interface '{}' with qualifier '{qualifier}'",
                            existing.service_id, provided.interface_name
                        ),
                    });
                }
                entry.qualified.insert(qualifier.clone(), provider);
            }
        }

        self.service_count += 1;
        Ok(())
    }

    /// Find the single provider of an interface
    pub fn lookup(&self, interface_name: &str, qualifier: Option<&str>) -> Lookup {
        let Some(entry) = self.interfaces.get(interface_name) else {
            return Lookup::Unimplemented;
        };

        if let Some(qualifier) = qualifier {
            return entry
                .qualified
                .get(qualifier)
                .map_or(Lookup::Unimplemented, |p| Lookup::Found(p.clone()));
        }

        let distinct: HashSet<ServiceIndex> = entry.providers().map(|p| p.index).collect();
        match distinct.len() {
            0 => Lookup::Unimplemented,
            1 => entry
                .providers()
                .next()
                .map_or(Lookup::Unimplemented, |p| Lookup::Found(p.clone())),
            _ => Lookup::Ambiguous(
                entry
                    .providers()
                    .map(|p| ServiceChoice {
                        service_id: p.service_id.clone(),
                        qualifier: p.qualifier.clone(),
                    })
                    .collect(),
            ),
        }
    }

    /// Every provider of an interface, each service listed once
    pub fn lookup_all(&self, interface_name: &str) -> Vec<Provider> {
        let Some(entry) = self.interfaces.get(interface_name) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        entry
            .providers()
            .filter(|p| seen.insert(p.index))
            .cloned()
            .collect()
    }

    /// Total number of registrations
    pub fn service_count(&self) -> usize {
        self.service_count
    }

    /// Names of all registered interfaces, sorted
    pub fn interface_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.interfaces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
