//! Service composition tests
//!
//! - Construction and destruction ordering with shared instances
//! - Graph verification failures surfaced by the orchestrator
//! - Declaration-gated runtime lookups
//! - Bootstrap from configuration

mod lookup_tests;
mod verification_tests;
