use std::collections::HashMap;
use std::rc::Rc;

use vista_core::LiveBinding;
use vista_dom::Node;

use crate::descriptor::{Descriptor, ResolvedDescriptor};
use crate::directives::{ATTR, AttrDirective, BIND, BindDirective};
use crate::error::DirectiveError;
use crate::unit::Scope;

/// A pluggable behavior selected by name at compile time.
pub trait Directive {
    /// Higher runs first among the directives on one element.
    fn priority(&self) -> i32 {
        0
    }

    /// A terminal directive owns its node's subtree: nothing else on the
    /// element is compiled and its children are not compiled separately.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Keep the triggering attribute on the live element.
    fn retain_attribute(&self) -> bool {
        false
    }

    fn bind(
        &self,
        scope: &Scope<'_>,
        node: &Node,
        descriptor: &Descriptor,
    ) -> Result<Box<dyn LiveBinding>, DirectiveError>;
}

#[derive(Default, Clone)]
pub struct DirectiveRegistry {
    definitions: HashMap<String, Rc<dyn Directive>>,
    terminal: Vec<String>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `bind` and `attr` directives the compiler emits for
    /// interpolation.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(BIND, BindDirective).register(ATTR, AttrDirective);
        registry
    }

    /// Register (or replace) a directive. Terminal directives are tried in
    /// registration order.
    pub fn register<D>(&mut self, name: impl Into<String>, directive: D) -> &mut Self
    where
        D: Directive + 'static,
    {
        let name = name.into();
        self.terminal.retain(|n| *n != name);
        if directive.is_terminal() {
            self.terminal.push(name.clone());
        }
        self.definitions.insert(name, Rc::new(directive));
        self
    }

    pub fn terminal_binding_names(&self) -> &[String] {
        &self.terminal
    }

    pub fn definition(&self, name: &str) -> Option<Rc<dyn Directive>> {
        self.definitions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Merge a descriptor with its definition; `None` when the name is
    /// unknown.
    pub fn resolve(&self, mut descriptor: Descriptor) -> Option<ResolvedDescriptor> {
        let directive = self.definition(&descriptor.name)?;
        descriptor.terminal = directive.is_terminal();
        Some(ResolvedDescriptor {
            descriptor,
            directive,
        })
    }
}
