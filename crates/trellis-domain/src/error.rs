//! Error handling types
//!
//! Every failure of the composition runtime maps onto one variant of [`Error`].
//! Each variant carries a stable identifier (see [`Error::code`]) so callers can
//! match on the kind without parsing messages.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by service factories and teardown hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the Trellis service runtime
#[derive(Error, Debug)]
pub enum Error {
    /// A required reference has no registered provider
    #[error("Interface not found: {message}")]
    InterfaceNotFound {
        /// Interface that could not be resolved
        interface_name: String,
        /// Qualifier requested, if any
        qualifier: Option<String>,
        /// Description of the failed requirement
        message: String,
    },

    /// An unqualified reference matches more than one provider
    #[error("Ambiguous dependency: {message}")]
    AmbiguousDependency {
        /// Interface with several providers
        interface_name: String,
        /// Rendered candidate providers
        choices: Vec<String>,
        /// Description of the failed requirement
        message: String,
    },

    /// The dependency graph contains a cycle
    #[error("Dependency cycle: {message}")]
    DependencyCycle {
        /// Service ids on the cycle, starting and ending with the same service
        path: Vec<String>,
        /// Rendered cycle with the references that formed each edge
        message: String,
    },

    /// Two services register the same qualifier for the same interface
    #[error("Duplicate interface: {message}")]
    DuplicateInterface {
        /// Interface registered twice
        interface_name: String,
        /// Qualifier registered twice
        qualifier: String,
        /// Description of the conflicting registrations
        message: String,
    },

    /// Malformed service or package metadata
    #[error("Invalid metadata: {message}")]
    InvalidMetadata {
        /// Description of the problem
        message: String,
    },

    /// A service factory failed
    #[error("Failed to construct service '{service_id}': {source}")]
    ServiceConstructionFailed {
        /// Service whose factory failed
        service_id: String,
        /// Error reported by the factory
        #[source]
        source: BoxError,
    },

    /// A service teardown hook failed
    #[error("Failed to destroy service '{service_id}': {source}")]
    ServiceDestructionFailed {
        /// Service whose teardown failed
        service_id: String,
        /// Error reported by the teardown hook
        #[source]
        source: BoxError,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Internal invariant violated
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl Error {
    /// Stable identifier of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::InterfaceNotFound { .. } => "interface-not-found",
            Self::AmbiguousDependency { .. } => "ambiguous-dependency",
            Self::DependencyCycle { .. } => "dependency-cycle",
            Self::DuplicateInterface { .. } => "duplicate-interface",
            Self::InvalidMetadata { .. } => "invalid-metadata",
            Self::ServiceConstructionFailed { .. } => "service-construction-failed",
            Self::ServiceDestructionFailed { .. } => "service-destruction-failed",
            Self::Configuration { .. } => "configuration",
            Self::Internal { .. } => "internal",
        }
    }
}

// Metadata and internal error creation methods
impl Error {
    /// Create an invalid metadata error
    pub fn invalid_metadata<S: Into<String>>(message: S) -> Self {
        Self::InvalidMetadata {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Lifecycle error creation methods
impl Error {
    /// Wrap a factory failure
    pub fn construction_failed<S: Into<String>>(service_id: S, source: BoxError) -> Self {
        Self::ServiceConstructionFailed {
            service_id: service_id.into(),
            source,
        }
    }

    /// Wrap a teardown failure
    pub fn destruction_failed<S: Into<String>>(service_id: S, source: BoxError) -> Self {
        Self::ServiceDestructionFailed {
            service_id: service_id.into(),
            source,
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
