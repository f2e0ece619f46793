//! Reference specifications
//!
//! A [`ReferenceSpec`] describes one dependency request. It is a closed union so a
//! qualifier and "all implementations" can never be requested together; the raw
//! [`ReferenceManifest`] read from metadata is checked when converted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One dependency request against the interface registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceSpec {
    /// Exactly one provider, optionally narrowed down by a qualifier
    Single {
        /// Interface name
        interface_name: String,
        /// Qualifier selecting a specific provider
        qualifier: Option<String>,
    },
    /// Every provider of the interface
    All {
        /// Interface name
        interface_name: String,
    },
}

impl ReferenceSpec {
    /// Unqualified single reference
    pub fn single(interface_name: impl Into<String>) -> Self {
        Self::Single {
            interface_name: interface_name.into(),
            qualifier: None,
        }
    }

    /// Single reference narrowed down by `qualifier`
    pub fn qualified(interface_name: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self::Single {
            interface_name: interface_name.into(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Reference to every provider of the interface
    pub fn all(interface_name: impl Into<String>) -> Self {
        Self::All {
            interface_name: interface_name.into(),
        }
    }

    /// Interface name requested by this reference
    pub fn interface_name(&self) -> &str {
        match self {
            Self::Single { interface_name, .. } | Self::All { interface_name } => interface_name,
        }
    }

    /// Qualifier, if this is a qualified single reference
    pub fn qualifier(&self) -> Option<&str> {
        match self {
            Self::Single { qualifier, .. } => qualifier.as_deref(),
            Self::All { .. } => None,
        }
    }

    /// Whether every provider is requested
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All { .. })
    }

    /// Reject empty interface names and empty qualifiers
    pub fn validate(&self) -> Result<()> {
        if self.interface_name().is_empty() {
            return Err(Error::invalid_metadata("Interface name must not be empty"));
        }
        if self.qualifier().is_some_and(str::is_empty) {
            return Err(Error::invalid_metadata(format!(
                "Qualifier for interface '{}' must not be empty",
                self.interface_name()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ReferenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single {
                interface_name,
                qualifier: None,
            } => write!(f, "'{interface_name}'"),
            Self::Single {
                interface_name,
                qualifier: Some(qualifier),
            } => write!(f, "'{interface_name}' (qualifier '{qualifier}')"),
            Self::All { interface_name } => write!(f, "all of '{interface_name}'"),
        }
    }
}

/// Reference as written in package metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceManifest {
    /// Interface name
    pub interface_name: String,
    /// Optional qualifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    /// Request every provider
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
}

impl TryFrom<ReferenceManifest> for ReferenceSpec {
    type Error = Error;

    fn try_from(manifest: ReferenceManifest) -> Result<Self> {
        let spec = match (manifest.qualifier, manifest.all) {
            (Some(qualifier), true) => {
                return Err(Error::invalid_metadata(format!(
                    "Reference to '{}' cannot specify both qualifier '{qualifier}' and 'all'",
                    manifest.interface_name
                )));
            }
            (qualifier, false) => Self::Single {
                interface_name: manifest.interface_name,
                qualifier,
            },
            (None, true) => Self::All {
                interface_name: manifest.interface_name,
            },
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl From<&ReferenceSpec> for ReferenceManifest {
    fn from(spec: &ReferenceSpec) -> Self {
        Self {
            interface_name: spec.interface_name().to_string(),
            qualifier: spec.qualifier().map(ToString::to_string),
            all: spec.is_all(),
        }
    }
}

/// Interface a service provides, optionally under a qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidedInterface {
    /// Interface name
    pub interface_name: String,
    /// Qualifier distinguishing this provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl ProvidedInterface {
    /// Unqualified provision
    pub fn new(interface_name: impl Into<String>) -> Self {
        Self {
            interface_name: interface_name.into(),
            qualifier: None,
        }
    }

    /// Qualified provision
    pub fn qualified(interface_name: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            interface_name: interface_name.into(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Reject empty interface names and empty qualifiers
    pub fn validate(&self) -> Result<()> {
        if self.interface_name.is_empty() {
            return Err(Error::invalid_metadata(
                "Provided interface name must not be empty",
            ));
        }
        if self.qualifier.as_deref().is_some_and(str::is_empty) {
            return Err(Error::invalid_metadata(format!(
                "Qualifier for provided interface '{}' must not be empty",
                self.interface_name
            )));
        }
        Ok(())
    }
}
