use std::cell::RefCell;
use std::rc::Rc;

use vista_dom::Node;

use crate::config::CompilerConfig;
use crate::descriptor::{Descriptor, ResolvedDescriptor};
use crate::diagnostics::Diagnostic;
use crate::error::LinkError;
use crate::registry::DirectiveRegistry;
use crate::unit::{CompiledUnit, LinkTarget};

/// Compiles node trees into [`CompiledUnit`]s. Stateless per call apart from
/// the collected diagnostics.
pub struct Compiler {
    registry: Rc<DirectiveRegistry>,
    config: CompilerConfig,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Compiler {
    pub fn new(registry: DirectiveRegistry, config: CompilerConfig) -> Self {
        Self {
            registry: Rc::new(registry),
            config,
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Built-in directives, default configuration.
    pub fn with_builtins() -> Self {
        Self::new(DirectiveRegistry::with_builtins(), CompilerConfig::default())
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    /// Diagnostics collected so far (empty unless enabled in the config).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Resolve against the registry, diagnosing unknown names.
    pub(crate) fn resolve(&self, node: &Node, descriptor: Descriptor) -> Option<ResolvedDescriptor> {
        if !self.registry.contains(&descriptor.name) {
            if self.config.diagnostics {
                let diagnostic = Diagnostic::UnknownDirective {
                    name: descriptor.name.clone(),
                    attribute: descriptor.source_attr.clone(),
                    node: node.id(),
                };
                tracing::warn!(%diagnostic, "directive skipped");
                self.diagnostics.borrow_mut().push(diagnostic);
            }
            return None;
        }
        self.registry.resolve(descriptor)
    }

    /// Compile a node and, unless its own unit is terminal, its subtree.
    /// `None` when nothing in the subtree needs a binding.
    pub fn compile(&self, node: &Node) -> Option<CompiledUnit> {
        let node_unit = self.compile_node(node);
        let child_unit = if descends(node, node_unit.as_ref()) {
            self.compile_nodes(&node.children())
        } else {
            None
        };

        let unit = match (node_unit, child_unit) {
            (None, None) => None,
            (Some(unit), None) | (None, Some(unit)) => Some(unit),
            (Some(node_unit), Some(child_unit)) => Some(CompiledUnit::new(
                false,
                node_unit.priority(),
                move |scope, target| {
                    let live = target.node()?;
                    node_unit.link(scope, LinkTarget::Node(live))?;
                    child_unit.link(scope, LinkTarget::Node(live))
                },
            )),
        };
        tracing::debug!(node = %node.id(), compiled = unit.is_some(), "compiled tree");
        unit
    }

    /// Compile an ordered collection of sibling nodes into one unit that
    /// expects a live collection of the same length.
    pub fn compile_nodes(&self, nodes: &[Node]) -> Option<CompiledUnit> {
        let mut pairs: Vec<(Option<CompiledUnit>, Option<CompiledUnit>)> =
            Vec::with_capacity(nodes.len());
        for node in nodes {
            let node_unit = self.compile_node(node);
            let child_unit = if descends(node, node_unit.as_ref()) {
                self.compile_nodes(&node.children())
            } else {
                None
            };
            pairs.push((node_unit, child_unit));
        }

        let live = pairs
            .iter()
            .filter(|(n, c)| n.is_some() || c.is_some())
            .count();
        if live == 0 {
            return None;
        }

        Some(CompiledUnit::new(false, 0, move |scope, target| {
            let nodes = target.collection();
            if nodes.len() != pairs.len() {
                return Err(LinkError::StructuralMismatch {
                    expected: pairs.len(),
                    found: nodes.len(),
                });
            }
            for ((node_unit, child_unit), node) in pairs.iter().zip(&nodes) {
                if let Some(unit) = node_unit {
                    unit.link(scope, LinkTarget::Node(node))?;
                }
                if let Some(unit) = child_unit {
                    unit.link(scope, LinkTarget::Node(node))?;
                }
            }
            Ok(())
        }))
    }
}

/// Children get their own pass unless the node's unit owns them, the node is
/// an opaque script body, or there are none.
fn descends(node: &Node, node_unit: Option<&CompiledUnit>) -> bool {
    !node_unit.is_some_and(CompiledUnit::is_terminal)
        && !node.has_tag("script")
        && node.has_children()
}
