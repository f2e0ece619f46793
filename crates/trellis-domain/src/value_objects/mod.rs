//! Value objects
//!
//! Immutable values describing services, references and configuration.

pub mod ids;
pub mod properties;
pub mod reference;

pub use ids::{ServiceId, validate_package_name, validate_service_name};
pub use properties::Properties;
pub use reference::{ProvidedInterface, ReferenceManifest, ReferenceSpec};
