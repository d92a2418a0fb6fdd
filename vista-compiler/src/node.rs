//! Per-node classification: elements, text with interpolation, and nothing
//! else.

use vista_dom::{Node, NodeKind};
use vista_template::{Token, has_interpolation, tokenize};

use crate::compiler::Compiler;
use crate::descriptor::Descriptor;
use crate::directives::BIND;
use crate::link::{bind_resolved, interpolate};
use crate::unit::CompiledUnit;

impl Compiler {
    /// Compile one node, ignoring its children.
    pub fn compile_node(&self, node: &Node) -> Option<CompiledUnit> {
        match node.kind() {
            NodeKind::Element(_) => self.compile_element(node),
            NodeKind::Text => self.compile_text(node),
            NodeKind::Comment | NodeKind::Fragment => None,
        }
    }

    fn compile_element(&self, el: &Node) -> Option<CompiledUnit> {
        let mut unit = None;
        if el.has_attributes() {
            if let Some(terminal) = self.compile_terminal(el) {
                return Some(terminal);
            }
            unit = self.compile_directives(el);
        }
        if el.has_tag("textarea") {
            unit = compile_textarea(el, unit);
        }
        unit
    }

    /// First terminal directive, in registry order, that the element carries.
    fn compile_terminal(&self, el: &Node) -> Option<CompiledUnit> {
        let prefix = &self.config().prefix;
        for name in self.registry().terminal_binding_names() {
            let attr = format!("{prefix}{name}");
            let Some(expression) = el.attribute(&attr) else {
                continue;
            };
            let descriptor = Descriptor::new(name.as_str(), expression).with_source_attr(attr);
            let Some(resolved) = self.resolve(el, descriptor) else {
                continue;
            };
            tracing::debug!(node = %el.id(), directive = %name, "terminal directive");
            return Some(CompiledUnit::new(
                true,
                resolved.priority(),
                move |scope, target| {
                    bind_resolved(scope, target.node()?, &resolved)?;
                    Ok(())
                },
            ));
        }
        None
    }

    /// Every prefixed attribute and every interpolated attribute value, bound
    /// in descending priority; ties keep attribute order.
    fn compile_directives(&self, el: &Node) -> Option<CompiledUnit> {
        let prefix = self.config().prefix.as_str();
        let mut resolved = Vec::new();

        for (attr, value) in el.attributes() {
            let directive = attr
                .strip_prefix(prefix)
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            let descriptor = match directive {
                Some(name) => Descriptor::new(name, value).with_source_attr(attr),
                None if has_interpolation(&value) => Descriptor::attr_interpolation(attr, value),
                None => continue,
            };
            if let Some(r) = self.resolve(el, descriptor) {
                resolved.push(r);
            }
        }

        if resolved.is_empty() {
            return None;
        }
        // sort_by is stable
        resolved.sort_by(|a, b| b.priority().cmp(&a.priority()));
        let priority = resolved[0].priority();

        Some(CompiledUnit::new(false, priority, move |scope, target| {
            let el = target.node()?;
            for r in &resolved {
                bind_resolved(scope, el, r)?;
            }
            Ok(())
        }))
    }

    /// Text with `{{ }}`: a template fragment of literal and placeholder text
    /// nodes, cloned per execution and swapped in for the live node.
    fn compile_text(&self, node: &Node) -> Option<CompiledUnit> {
        let data = node.data();
        if !has_interpolation(&data) {
            return None;
        }

        let template = Node::fragment(Vec::new());
        let mut slots = Vec::new();
        for token in tokenize(&data) {
            match token {
                Token::Literal(s) => template.append_child(&Node::text(s)),
                Token::Expression(expr) => {
                    let index = template.child_count();
                    template.append_child(&Node::text(""));
                    if let Some(r) = self.resolve(node, Descriptor::new(BIND, expr)) {
                        slots.push((index, r));
                    }
                }
            }
        }
        // without a `bind` directive the text is left as written
        if slots.is_empty() {
            return None;
        }

        Some(CompiledUnit::new(false, 0, move |scope, target| {
            let live = target.node()?;
            let instance = template.deep_clone();
            let placeholders = instance.children();
            for (index, r) in &slots {
                if let Some(placeholder) = placeholders.get(*index) {
                    bind_resolved(scope, placeholder, r)?;
                }
            }
            if !live.replace_with(&instance) {
                tracing::trace!(node = %live.id(), "interpolated text node is detached; nothing replaced");
            }
            Ok(())
        }))
    }
}

/// A textarea's value is its text. Resolve it before anything else on the
/// element binds; the unit is terminal since the children are that value.
fn compile_textarea(el: &Node, inner: Option<CompiledUnit>) -> Option<CompiledUnit> {
    if !has_interpolation(&el.text_content()) {
        return inner;
    }
    let priority = inner.as_ref().map_or(0, CompiledUnit::priority);
    Some(CompiledUnit::new(true, priority, move |scope, target| {
        let live = target.node()?;
        live.set_text_content(interpolate(scope.vm, &live.text_content()));
        match &inner {
            Some(unit) => unit.link(scope, target),
            None => Ok(()),
        }
    }))
}
