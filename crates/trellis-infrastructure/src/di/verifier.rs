//! Dependency graph verification
//!
//! Registers every provided interface, then walks the graph depth-first from the
//! required root references and from every declared service. Nodes are colored
//! unvisited / pending / done and the walk keeps its own stack, so deep graphs do not
//! depend on the call stack. Any unresolved, ambiguous or cyclic reference aborts
//! verification with the chain of services involved.
//!
//! The result is the populated [`InterfaceRegistry`] plus, per service, the resolved
//! provider(s) for each of its references.

use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, info};
use trellis_domain::ReferenceSpec;
use trellis_domain::error::{Error, Result};

use super::descriptor::ServiceDescriptor;
use super::interfaces::{InterfaceRegistry, Lookup, Provider, ServiceIndex};

/// A reference required from outside any service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootReference {
    /// What is required
    pub spec: ReferenceSpec,
    /// Who requires it, used in diagnostics (e.g. "package 'map'")
    pub required_by: String,
}

impl RootReference {
    /// Root reference required by `required_by`
    pub fn new(spec: ReferenceSpec, required_by: impl Into<String>) -> Self {
        Self {
            spec,
            required_by: required_by.into(),
        }
    }
}

/// Provider(s) selected for one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDependency {
    /// Single provider
    Single(Provider),
    /// Every provider of the interface
    All(Vec<Provider>),
}

impl ResolvedDependency {
    /// Positions of the selected providers
    pub fn indices(&self) -> Vec<ServiceIndex> {
        match self {
            Self::Single(provider) => vec![provider.index],
            Self::All(providers) => providers.iter().map(|p| p.index).collect(),
        }
    }
}

/// Resolved references of one service, in declaration order
pub type ComputedDependencies = Vec<(String, ResolvedDependency)>;

/// Outcome of a successful verification
#[derive(Debug)]
pub struct VerifiedGraph {
    /// Registry of every provided interface
    pub registry: InterfaceRegistry,
    /// Resolved references, indexed like the verified services
    pub dependencies: Vec<ComputedDependencies>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    Pending,
    Done,
}

/// Why a node is visited
#[derive(Debug, Clone, Copy)]
enum Reason {
    /// Every declared service is checked
    Declared,
    /// Index into the root references
    Root(usize),
    /// Dependency `dependency` of service `from`
    Reference {
        from: ServiceIndex,
        dependency: usize,
    },
}

struct Frame {
    node: ServiceIndex,
    reason: Reason,
    next_dependency: usize,
    targets: VecDeque<(ServiceIndex, usize)>,
}

impl Frame {
    fn new(node: ServiceIndex, reason: Reason) -> Self {
        Self {
            node,
            reason,
            next_dependency: 0,
            targets: VecDeque::new(),
        }
    }
}

/// Checks that a set of services forms a satisfiable, acyclic graph
pub struct DependencyGraphVerifier<'a> {
    services: &'a [ServiceDescriptor],
    roots: &'a [RootReference],
    registry: InterfaceRegistry,
    colors: Vec<Color>,
    computed: Vec<ComputedDependencies>,
}

impl<'a> DependencyGraphVerifier<'a> {
    /// Verify `services` against the required `roots`
    pub fn verify(
        services: &'a [ServiceDescriptor],
        roots: &'a [RootReference],
    ) -> Result<VerifiedGraph> {
        let mut registry = InterfaceRegistry::new();
        for (index, service) in services.iter().enumerate() {
            for provided in service.interfaces() {
                registry.register(index, service.id(), provided)?;
            }
        }

        let mut verifier = Self {
            services,
            roots,
            registry,
            colors: vec![Color::Unvisited; services.len()],
            computed: vec![Vec::new(); services.len()],
        };

        for (root_index, root) in roots.iter().enumerate() {
            let requirement = capitalize(&root.required_by);
            let resolved = verifier.resolve(&root.spec, &requirement)?;
            for target in resolved.indices() {
                verifier.visit(target, Reason::Root(root_index))?;
            }
        }
        for index in 0..services.len() {
            verifier.visit(index, Reason::Declared)?;
        }

        info!(
            services = services.len(),
            interfaces = verifier.registry.service_count(),
            roots = roots.len(),
            "Dependency graph verified"
        );
        Ok(VerifiedGraph {
            registry: verifier.registry,
            dependencies: verifier.computed,
        })
    }

    fn visit(&mut self, start: ServiceIndex, reason: Reason) -> Result<()> {
        if self.colors[start] == Color::Done {
            return Ok(());
        }

        let services = self.services;
        self.colors[start] = Color::Pending;
        let mut stack = vec![Frame::new(start, reason)];

        while let Some(frame) = stack.last_mut() {
            if let Some((target, dependency)) = frame.targets.pop_front() {
                let reason = Reason::Reference {
                    from: frame.node,
                    dependency,
                };
                match self.colors[target] {
                    Color::Done => {}
                    Color::Pending => return Err(self.cycle_error(&stack, target, reason)),
                    Color::Unvisited => {
                        self.colors[target] = Color::Pending;
                        stack.push(Frame::new(target, reason));
                    }
                }
                continue;
            }

            let node = frame.node;
            let dependency = frame.next_dependency;
            if let Some(declared) = services[node].dependencies().get(dependency) {
                frame.next_dependency += 1;
                let requirement = format!(
                    "Service '{}' (reference '{}')",
                    services[node].id(),
                    declared.reference_name
                );
                let resolved = self.resolve(&declared.spec, &requirement)?;
                frame
                    .targets
                    .extend(resolved.indices().into_iter().map(|t| (t, dependency)));
                self.computed[node].push((declared.reference_name.clone(), resolved));
            } else {
                debug!(service = %services[node].id(), "Service dependencies verified");
                self.colors[node] = Color::Done;
                stack.pop();
            }
        }
        Ok(())
    }

    fn resolve(&self, spec: &ReferenceSpec, requirement: &str) -> Result<ResolvedDependency> {
        match spec {
            ReferenceSpec::All { interface_name } => Ok(ResolvedDependency::All(
                self.registry.lookup_all(interface_name),
            )),
            ReferenceSpec::Single {
                interface_name,
                qualifier,
            } => match self.registry.lookup(interface_name, qualifier.as_deref()) {
                Lookup::Found(provider) => Ok(ResolvedDependency::Single(provider)),
                Lookup::Unimplemented => Err(Error::InterfaceNotFound {
                    interface_name: interface_name.clone(),
                    qualifier: qualifier.clone(),
                    message: format!("{requirement} requires {spec}, but no service provides it"),
                }),
                Lookup::Ambiguous(choices) => {
                    let choices: Vec<String> = choices.iter().map(ToString::to_string).collect();
                    Err(Error::AmbiguousDependency {
                        interface_name: interface_name.clone(),
                        message: format!(
                            "{requirement} requires {spec}, which is provided by several services: {}. Use a qualifier to select one",
                            choices.join(", ")
                        ),
                        choices,
                    })
                }
            },
        }
    }

    fn cycle_error(&self, stack: &[Frame], target: ServiceIndex, closing: Reason) -> Error {
        let start = stack
            .iter()
            .position(|frame| frame.node == target)
            .unwrap_or(0);

        let hops: Vec<(ServiceIndex, Reason)> = stack[start..]
            .iter()
            .map(|frame| (frame.node, frame.reason))
            .chain(std::iter::once((target, closing)))
            .collect();

        let path: Vec<String> = hops
            .iter()
            .map(|(node, _)| self.services[*node].id().to_string())
            .collect();

        let mut message = path[0].clone();
        if let Reason::Root(root) = hops[0].1 {
            message.push_str(&format!(" (required by {})", self.roots[root].required_by));
        }
        let edges = hops[1..]
            .iter()
            .map(|(node, reason)| format!(" -> {}{}", self.services[*node].id(), self.edge(*reason)))
            .join("");
        message.push_str(&edges);

        Error::DependencyCycle { path, message }
    }

    fn edge(&self, reason: Reason) -> String {
        match reason {
            Reason::Reference { from, dependency } => {
                let declared = &self.services[from].dependencies()[dependency];
                format!(
                    " (reference '{}' requires {})",
                    declared.reference_name, declared.spec
                )
            }
            Reason::Root(root) => format!(" (required by {})", self.roots[root].required_by),
            Reason::Declared => String::new(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
