//! Directives the compiler itself emits: `bind` for text placeholders and
//! `attr` for interpolated attribute values.

use std::rc::{Rc, Weak};

use vista_core::{Effect, LiveBinding, ViewModel, effect};
use vista_dom::Node;

use crate::descriptor::Descriptor;
use crate::error::DirectiveError;
use crate::link::interpolate;
use crate::registry::Directive;
use crate::unit::Scope;

pub const BIND: &str = "bind";
pub const ATTR: &str = "attr";

/// Live binding backed by a reactive effect; disposing stops the effect.
pub struct EffectBinding {
    effect: Effect,
}

impl EffectBinding {
    pub fn new(effect: Effect) -> Self {
        Self { effect }
    }
}

impl LiveBinding for EffectBinding {
    fn dispose(&self) {
        self.effect.stop();
    }
}

/// Effects hold the view-model weakly: the view-model owns the ledger that
/// owns the effect.
fn track<F>(vm: &Rc<ViewModel>, mut update: F) -> Box<dyn LiveBinding>
where
    F: FnMut(&ViewModel) + 'static,
{
    let vm: Weak<ViewModel> = Rc::downgrade(vm);
    let handle = effect(move || {
        if let Some(vm) = vm.upgrade() {
            update(&vm);
        }
    });
    Box::new(EffectBinding::new(handle))
}

/// Keeps a node's text equal to the expression's value.
pub struct BindDirective;

impl Directive for BindDirective {
    fn bind(
        &self,
        scope: &Scope<'_>,
        node: &Node,
        descriptor: &Descriptor,
    ) -> Result<Box<dyn LiveBinding>, DirectiveError> {
        let node = node.clone();
        let expression = descriptor.expression.clone();
        Ok(track(scope.vm, move |vm| {
            node.set_text_content(vm.evaluate_string(&expression));
        }))
    }
}

/// Keeps one attribute in sync. Either implicit (`title="Hi {{ name }}"`) or
/// explicit as `v-attr="title: expr"`.
pub struct AttrDirective;

impl Directive for AttrDirective {
    fn bind(
        &self,
        scope: &Scope<'_>,
        node: &Node,
        descriptor: &Descriptor,
    ) -> Result<Box<dyn LiveBinding>, DirectiveError> {
        let (attr, expression) = match &descriptor.attr_name {
            Some(attr) => (attr.clone(), descriptor.expression.clone()),
            None => {
                let (attr, expr) = descriptor.expression.split_once(':').ok_or_else(|| {
                    DirectiveError::new(format!(
                        "expected `attribute: expression`, got `{}`",
                        descriptor.expression
                    ))
                })?;
                (attr.trim().to_string(), expr.trim().to_string())
            }
        };
        if attr.is_empty() {
            return Err(DirectiveError::new("attribute name is empty"));
        }

        let node = node.clone();
        let interpolated = descriptor.interpolate;
        Ok(track(scope.vm, move |vm| {
            let value = if interpolated {
                interpolate(vm, &expression)
            } else {
                vm.evaluate_string(&expression)
            };
            node.set_attribute(attr.as_str(), value);
        }))
    }
}
