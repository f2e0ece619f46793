//! # Trellis Infrastructure
//!
//! Runtime side of the service composition: graph verification, orchestration,
//! configuration and logging.
//!
//! ## Module Categories
//!
//! ### Service Composition
//! | Module | Description |
//! |--------|-------------|
//! | [`di`] | Descriptors, interface registry, graph verifier, orchestrator |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via figment |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigLoader, TrellisConfig};
pub use di::{
    LookupOptions, OrchestratorState, ServiceLookup, ServiceOrchestrator, ServicesLookup,
    build_orchestrator,
};
pub use error_ext::ErrorContext;
