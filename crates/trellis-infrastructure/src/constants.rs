//! Infrastructure layer constants
//!
//! Domain-specific constants are defined in `trellis_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "trellis.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "trellis";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "TRELLIS";

/// Separator for nested keys in environment variables (`TRELLIS_LOGGING__LEVEL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "TRELLIS_LOG";

/// Fallback log file stem when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "trellis";

// ============================================================================
// RUNTIME CONSTANTS
// ============================================================================

/// Label used in diagnostics for references required by the composition root
pub const ROOT_REQUIREMENT_LABEL: &str = "the application";
