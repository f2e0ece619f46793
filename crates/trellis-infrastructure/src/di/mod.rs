//! Service composition
//!
//! Wires services contributed by independent packages: descriptors carry the static
//! metadata and lifecycle of each service, the verifier checks the dependency graph,
//! and the orchestrator builds and tears down the services.
//!
//! ```text
//! PackageDefinition ─▶ PackageDescriptor ─▶ ServiceOrchestrator::new
//!                                              │  DependencyGraphVerifier
//!                                              │  (InterfaceRegistry + dependency map)
//!                                              ▼
//!                            start ─▶ get_service / get_services ─▶ destroy
//! ```

pub mod bootstrap;
pub mod declarations;
pub mod descriptor;
pub mod interfaces;
pub mod orchestrator;
pub mod package;
pub mod verifier;

pub use bootstrap::build_orchestrator;
pub use descriptor::{Dependency, ServiceDescriptor, ServiceState};
pub use interfaces::{InterfaceRegistry, Lookup, Provider, ServiceChoice, ServiceIndex};
pub use orchestrator::{
    LookupOptions, OrchestratorState, ServiceLookup, ServiceOrchestrator, ServicesLookup,
};
pub use package::PackageDescriptor;
pub use verifier::{DependencyGraphVerifier, ResolvedDependency, RootReference, VerifiedGraph};
