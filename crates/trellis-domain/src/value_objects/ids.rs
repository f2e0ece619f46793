//! Service identifiers and name validation

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{PACKAGE_NAME_PATTERN, SERVICE_ID_SEPARATOR, SERVICE_NAME_PATTERN};
use crate::error::{Error, Result};

static PACKAGE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PACKAGE_NAME_PATTERN).expect("Invalid regex"));

static SERVICE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(SERVICE_NAME_PATTERN).expect("Invalid regex"));

/// Check a package name against [`PACKAGE_NAME_PATTERN`]
pub fn validate_package_name(name: &str) -> Result<()> {
    if PACKAGE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_metadata(format!("Invalid package name '{name}'")))
    }
}

/// Check a service name against [`SERVICE_NAME_PATTERN`]
pub fn validate_service_name(package_name: &str, name: &str) -> Result<()> {
    if SERVICE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_metadata(format!(
            "Invalid service name '{name}' in package '{package_name}'"
        )))
    }
}

/// Globally unique service id: `packageName::serviceName`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Build the id of `service_name` inside `package_name`
    pub fn new(package_name: &str, service_name: &str) -> Self {
        Self(format!("{package_name}{SERVICE_ID_SEPARATOR}{service_name}"))
    }

    /// Id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package part of the id
    pub fn package_name(&self) -> &str {
        self.0
            .rsplit_once(SERVICE_ID_SEPARATOR)
            .map_or(self.0.as_str(), |(package, _)| package)
    }

    /// Service part of the id
    pub fn service_name(&self) -> &str {
        self.0
            .rsplit_once(SERVICE_ID_SEPARATOR)
            .map_or(self.0.as_str(), |(_, service)| service)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
