//! # Trellis
//!
//! A service composition runtime: packages contribute services that provide and
//! require named interfaces, and the orchestrator wires them together.
//!
//! ## Features
//!
//! - **Verified wiring**: missing, ambiguous and cyclic references are rejected
//!   before any service is built, with the full chain in the error
//! - **Shared instances**: each service is built once and torn down after its last consumer
//! - **Qualifiers and multi-injection**: select one provider by label, or inject all of them
//! - **Declared lookups**: runtime lookups only answer what a package declared
//!
//! ## Example
//!
//! ```ignore
//! use trellis::{ConfigLoader, LookupOptions, ReferenceSpec};
//!
//! let mut orchestrator = trellis::bootstrap_from_config(
//!     &ConfigLoader::new(),
//!     vec![ReferenceSpec::single("map.MapRegistry")],
//! )?;
//! orchestrator.start()?;
//!
//! let registry = orchestrator
//!     .get_service("map-ui", "map.MapRegistry", None, LookupOptions::default())?
//!     .downcast::<MapRegistry>();
//!
//! orchestrator.destroy()?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - manifests, reference specs, service ports, error taxonomy
//! - `infrastructure` - graph verification, orchestration, config, logging

use tracing::info;

/// Domain layer - metadata, ports and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use trellis_domain::*;
}

/// Infrastructure layer - orchestrator, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use trellis_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the runtime entry points at the crate root
pub use infrastructure::{
    ConfigLoader, LookupOptions, OrchestratorState, ServiceLookup, ServiceOrchestrator,
    ServicesLookup, TrellisConfig, build_orchestrator,
};

/// Build an orchestrator from every compile-time registered package
///
/// Loads the configuration through `loader` and applies its per-package property
/// overrides. The returned orchestrator still has to be started.
pub fn bootstrap_from_config(
    loader: &ConfigLoader,
    required: Vec<ReferenceSpec>,
) -> Result<ServiceOrchestrator> {
    let config = loader.load()?;
    let packages = registry::discover_packages()?;
    info!(
        packages = packages.len(),
        required = required.len(),
        "Bootstrapping registered packages"
    );
    build_orchestrator(&config, packages, required)
}
