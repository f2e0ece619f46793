//! Configuration types

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use trellis_domain::Properties;
use trellis_domain::constants::DEFAULT_LOCALE;

use crate::constants::DEFAULT_LOG_LEVEL;

/// Main configuration of a Trellis application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrellisConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Service runtime configuration
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Property overrides by package name
    #[serde(default)]
    pub packages: BTreeMap<String, Properties>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Service runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Locale handed to service factories
    pub locale: String,

    /// Gate runtime lookups against declared UI references
    pub enforce_declarations: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            enforce_declarations: true,
        }
    }
}
