//! Composition root bootstrap
//!
//! Builds a ready-to-start [`ServiceOrchestrator`] from package definitions and the
//! application configuration.
//!
//! ```text
//! TrellisConfig ─┐
//!                ├─▶ PackageDescriptor (properties merged) ─▶ ServiceOrchestrator
//! definitions  ──┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let mut orchestrator = build_orchestrator(&config, discover_packages()?, required)?;
//! orchestrator.start()?;
//! ```

use tracing::{info, warn};
use trellis_domain::error::Result;
use trellis_domain::{PackageDefinition, ReferenceSpec};

use super::orchestrator::ServiceOrchestrator;
use super::package::PackageDescriptor;
use crate::config::TrellisConfig;

/// Validate `definitions` and wire them into an orchestrator
///
/// Property overrides come from `config.packages`, keyed by package name.
pub fn build_orchestrator(
    config: &TrellisConfig,
    definitions: Vec<PackageDefinition>,
    required: Vec<ReferenceSpec>,
) -> Result<ServiceOrchestrator> {
    for package in config.packages.keys() {
        if !definitions.iter().any(|definition| definition.name() == package) {
            warn!(package = %package, "Properties configured for unknown package");
        }
    }

    let packages = definitions
        .into_iter()
        .map(|definition| {
            let overrides = config.packages.get(definition.name());
            PackageDescriptor::new(definition, overrides, &config.runtime.locale)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        packages = packages.len(),
        locale = %config.runtime.locale,
        enforce_declarations = config.runtime.enforce_declarations,
        "Bootstrapping service orchestrator"
    );
    Ok(ServiceOrchestrator::new(packages, required)?
        .with_declaration_enforcement(config.runtime.enforce_declarations))
}
