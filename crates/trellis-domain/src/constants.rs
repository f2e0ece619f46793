//! Domain constants
//!
//! Naming rules shared by package and service metadata.

/// Pattern package names must match (optionally scoped, npm style)
pub const PACKAGE_NAME_PATTERN: &str = r"^(@[a-z0-9][a-z0-9._-]*/)?[a-z0-9][a-z0-9._-]*$";

/// Pattern service names must match (identifier-safe characters)
pub const SERVICE_NAME_PATTERN: &str = r"^[A-Za-z_$][A-Za-z0-9_$]*$";

/// Separator between package and service name in a service id
pub const SERVICE_ID_SEPARATOR: &str = "::";

/// Default locale handed to service factories
pub const DEFAULT_LOCALE: &str = "en";
