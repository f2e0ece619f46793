//! Domain ports
//!
//! Traits and types that services implement or receive from the runtime.

pub mod service;

pub use service::{
    Localization, ReferenceMeta, ResolvedReference, ResolvedReferenceMeta, ServiceContext,
    ServiceFactory, ServiceInstance, service_factory,
};
