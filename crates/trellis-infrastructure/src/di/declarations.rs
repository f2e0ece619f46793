//! Declared UI references per package
//!
//! Runtime lookups are only answered for what the calling package declared up front.

use std::collections::{BTreeSet, HashMap};

use trellis_domain::ReferenceSpec;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct DeclaredInterface {
    unqualified: bool,
    qualifiers: BTreeSet<String>,
    all: bool,
}

/// `package -> interface -> declared shapes`
#[derive(Debug, Default, Clone)]
pub struct DeclarationIndex {
    packages: HashMap<String, HashMap<String, DeclaredInterface>>,
}

impl DeclarationIndex {
    /// Empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `package` declared `spec`
    pub fn declare(&mut self, package: &str, spec: &ReferenceSpec) {
        let declared = self
            .packages
            .entry(package.to_string())
            .or_default()
            .entry(spec.interface_name().to_string())
            .or_default();
        match spec {
            ReferenceSpec::All { .. } => declared.all = true,
            ReferenceSpec::Single {
                qualifier: None, ..
            } => declared.unqualified = true,
            ReferenceSpec::Single {
                qualifier: Some(qualifier),
                ..
            } => {
                declared.qualifiers.insert(qualifier.clone());
            }
        }
    }

    /// Whether `package` declared exactly this interface and qualifier, or "all"
    pub fn allows(&self, package: &str, spec: &ReferenceSpec) -> bool {
        let Some(declared) = self
            .packages
            .get(package)
            .and_then(|interfaces| interfaces.get(spec.interface_name()))
        else {
            return false;
        };
        match spec {
            ReferenceSpec::All { .. } => declared.all,
            ReferenceSpec::Single {
                qualifier: None, ..
            } => declared.unqualified,
            ReferenceSpec::Single {
                qualifier: Some(qualifier),
                ..
            } => declared.qualifiers.contains(qualifier),
        }
    }
}
