use std::fmt;
use std::rc::Rc;

use vista_core::ViewModel;
use vista_dom::Node;

use crate::error::LinkError;

/// Runtime context a compiled unit executes in.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    /// View-model whose ledger receives the bindings.
    pub vm: &'a Rc<ViewModel>,
    /// Parent view-model when executing a nested component.
    pub owner: Option<&'a Rc<ViewModel>>,
    /// Anchor node for directives that insert content elsewhere.
    pub placeholder: Option<&'a Node>,
}

impl<'a> Scope<'a> {
    pub fn new(vm: &'a Rc<ViewModel>) -> Self {
        Self {
            vm,
            owner: None,
            placeholder: None,
        }
    }

    pub fn with_owner(mut self, owner: &'a Rc<ViewModel>) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'a Node) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// What a unit is executed against: one live node, or a raw collection.
/// Collection units given a single node operate on that node's children.
#[derive(Debug, Clone, Copy)]
pub enum LinkTarget<'a> {
    Node(&'a Node),
    Nodes(&'a [Node]),
}

impl<'a> LinkTarget<'a> {
    pub(crate) fn node(self) -> Result<&'a Node, LinkError> {
        match self {
            LinkTarget::Node(node) => Ok(node),
            LinkTarget::Nodes([node]) => Ok(node),
            LinkTarget::Nodes(nodes) => Err(LinkError::StructuralMismatch {
                expected: 1,
                found: nodes.len(),
            }),
        }
    }

    /// Snapshot of the collection, taken before any unit mutates it.
    pub(crate) fn collection(self) -> Vec<Node> {
        match self {
            LinkTarget::Node(node) => node.children(),
            LinkTarget::Nodes(nodes) => nodes.to_vec(),
        }
    }
}

impl<'a> From<&'a Node> for LinkTarget<'a> {
    fn from(node: &'a Node) -> Self {
        LinkTarget::Node(node)
    }
}

impl<'a> From<&'a [Node]> for LinkTarget<'a> {
    fn from(nodes: &'a [Node]) -> Self {
        LinkTarget::Nodes(nodes)
    }
}

impl<'a> From<&'a Vec<Node>> for LinkTarget<'a> {
    fn from(nodes: &'a Vec<Node>) -> Self {
        LinkTarget::Nodes(nodes.as_slice())
    }
}

type LinkFn = dyn Fn(&Scope<'_>, LinkTarget<'_>) -> Result<(), LinkError>;

/// Immutable, reusable result of compiling a node or subtree.
///
/// `terminal` and `priority` are compile-time flags: `terminal` stops the
/// tree compiler from descending into the node's children, `priority`
/// orders units on the same element.
#[derive(Clone)]
pub struct CompiledUnit {
    link: Rc<LinkFn>,
    terminal: bool,
    priority: i32,
}

impl CompiledUnit {
    pub fn new<F>(terminal: bool, priority: i32, link: F) -> Self
    where
        F: Fn(&Scope<'_>, LinkTarget<'_>) -> Result<(), LinkError> + 'static,
    {
        Self {
            link: Rc::new(link),
            terminal,
            priority,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Install this unit's bindings. Prefer [`execute`](crate::execute),
    /// which also records what was installed.
    pub fn link(&self, scope: &Scope<'_>, target: LinkTarget<'_>) -> Result<(), LinkError> {
        (self.link)(scope, target)
    }
}

impl fmt::Debug for CompiledUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledUnit")
            .field("terminal", &self.terminal)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
