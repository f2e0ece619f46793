//! Configuration
//!
//! TOML files and `TRELLIS_` environment variables merged over defaults.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{LoggingConfig, RuntimeConfig, TrellisConfig};
