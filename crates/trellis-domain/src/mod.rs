//! # Trellis Domain
//!
//! Core types of the service composition runtime: reference specifications,
//! package and service manifests, the service ports and the error taxonomy.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy with stable identifiers |
//! | [`value_objects`] | Service ids, reference specs, property bags |
//! | [`manifest`] | Static package/service metadata |
//! | [`ports`] | Service instance, factory and context |
//! | [`registry`] | Compile-time package registration |

pub mod constants;
pub mod error;
pub mod manifest;
pub mod ports;
pub mod registry;
pub mod value_objects;

pub use error::{BoxError, Error, Result};
pub use manifest::{PackageDefinition, PackageManifest, ServiceManifest};
pub use ports::{
    Localization, ReferenceMeta, ResolvedReference, ResolvedReferenceMeta, ServiceContext,
    ServiceFactory, ServiceInstance, service_factory,
};
pub use value_objects::{
    Properties, ProvidedInterface, ReferenceManifest, ReferenceSpec, ServiceId,
};
