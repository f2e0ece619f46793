//! Package Registry System
//!
//! Packages contribute themselves at compile time through the `linkme` crate and are
//! discovered at runtime, without the composition root naming them.
//!
//! ## Registering a Package
//!
//! ```ignore
//! use trellis_domain::registry::{PackageEntry, PACKAGES};
//!
//! #[linkme::distributed_slice(PACKAGES)]
//! static MAP_PACKAGE: PackageEntry = PackageEntry {
//!     name: "map",
//!     description: "Map registry and layer factories",
//!     definition: map_package,
//! };
//! ```

use crate::error::{Error, Result};
use crate::manifest::PackageDefinition;

/// Registry entry for a package
pub struct PackageEntry {
    /// Package name, must equal the manifest name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Builds the package definition
    pub definition: fn() -> PackageDefinition,
}

#[linkme::distributed_slice]
pub static PACKAGES: [PackageEntry] = [..];

/// Build every registered package, sorted by name
pub fn discover_packages() -> Result<Vec<PackageDefinition>> {
    let mut entries: Vec<&PackageEntry> = PACKAGES.iter().collect();
    entries.sort_by_key(|entry| entry.name);

    entries
        .into_iter()
        .map(|entry| {
            let definition = (entry.definition)();
            if definition.name() == entry.name {
                Ok(definition)
            } else {
                Err(Error::invalid_metadata(format!(
                    "Package entry '{}' builds a package named '{}'",
                    entry.name,
                    definition.name()
                )))
            }
        })
        .collect()
}

/// List all registered packages as (name, description)
pub fn list_packages() -> Vec<(&'static str, &'static str)> {
    let mut packages: Vec<(&'static str, &'static str)> = PACKAGES
        .iter()
        .map(|entry| (entry.name, entry.description))
        .collect();
    packages.sort_unstable();
    packages
}
