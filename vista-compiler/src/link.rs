//! Execution of compiled units and identity-based disposal of what they
//! installed.

use std::fmt;
use std::rc::Rc;

use vista_core::{BindingId, OwnedBinding, ViewModel};
use vista_dom::Node;
use vista_template::interpolate_with;

use crate::descriptor::ResolvedDescriptor;
use crate::error::LinkError;
use crate::unit::{CompiledUnit, LinkTarget, Scope};

/// Render a `{{ }}` template against the view-model's current data.
pub fn interpolate(vm: &ViewModel, text: &str) -> String {
    interpolate_with(text, |expr| vm.evaluate_string(expr))
}

/// Create one live binding on `node` and append it to the scope's ledger.
pub(crate) fn bind_resolved(
    scope: &Scope<'_>,
    node: &Node,
    resolved: &ResolvedDescriptor,
) -> Result<BindingId, LinkError> {
    let descriptor = &resolved.descriptor;
    if !resolved.directive.retain_attribute() {
        if let Some(attr) = &descriptor.source_attr {
            node.remove_attribute(attr);
        }
    }
    let binding = resolved
        .directive
        .bind(scope, node, descriptor)
        .map_err(|source| LinkError::Directive {
            name: descriptor.name.clone(),
            source,
        })?;
    Ok(scope.vm.bindings().register(binding))
}

/// Run `unit` against `target` and capture the bindings it created.
///
/// Every binding registered on `scope.vm` during the call, including those of
/// nested executions, is owned by the returned [`Disposer`]. A failing unit
/// has its partial bindings disposed before the error is returned. `None`
/// executes nothing and yields an empty disposer.
pub fn execute<'a>(
    unit: Option<&CompiledUnit>,
    scope: &Scope<'_>,
    target: impl Into<LinkTarget<'a>>,
) -> Result<Disposer, LinkError> {
    let ledger = scope.vm.bindings();
    let mark = ledger.watermark();

    if let Some(unit) = unit {
        if let Err(err) = unit.link(scope, target.into()) {
            let partial = Disposer {
                vm: Rc::clone(scope.vm),
                owned: ledger.since(mark),
            };
            tracing::debug!(error = %err, rolled_back = partial.len(), "execution failed");
            partial.dispose();
            return Err(err);
        }
    }

    let owned = ledger.since(mark);
    tracing::trace!(owned = owned.len(), ledger = ledger.len(), "executed compiled unit");
    Ok(Disposer {
        vm: Rc::clone(scope.vm),
        owned,
    })
}

/// Removes exactly the bindings one [`execute`] call created, wherever they
/// sit in the ledger by the time it runs. Consumed on use.
#[must_use = "dropping a Disposer leaves its bindings installed"]
pub struct Disposer {
    vm: Rc<ViewModel>,
    owned: Vec<OwnedBinding>,
}

impl Disposer {
    pub fn ids(&self) -> Vec<BindingId> {
        self.owned.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Dispose the owned bindings in creation order, then drop them from the
    /// ledger by id.
    pub fn dispose(self) {
        for entry in &self.owned {
            entry.binding.dispose();
        }
        let ids = self.ids();
        let removed = self.vm.bindings().remove(&ids);
        tracing::trace!(owned = ids.len(), removed, "disposed bindings");
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer").field("owned", &self.ids()).finish()
    }
}
