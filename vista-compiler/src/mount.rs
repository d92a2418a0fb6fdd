use std::cell::RefCell;
use std::collections::HashMap;

use vista_dom::{Node, NodeId};

use crate::error::MountError;
use crate::link::{Disposer, execute};
use crate::unit::{CompiledUnit, LinkTarget, Scope};

/// Side table from a mount node to the binding program installed on it.
/// At most one program per node.
#[derive(Default)]
pub struct MountTable {
    programs: RefCell<HashMap<NodeId, Disposer>>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self, el: &Node) -> bool {
        self.programs.borrow().contains_key(&el.id())
    }

    pub fn len(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.borrow().is_empty()
    }

    /// Fails with [`MountError::AlreadyMounted`] when `el` already carries a
    /// program; nothing is executed in that case.
    pub fn ensure_free(&self, el: &Node) -> Result<(), MountError> {
        if self.is_mounted(el) {
            tracing::error!(node = %el.id(), "a binding program is already mounted on this node");
            return Err(MountError::AlreadyMounted(el.id()));
        }
        Ok(())
    }

    /// Execute `unit` against `target` and record the result under `el`.
    pub fn mount<'a>(
        &self,
        el: &Node,
        unit: Option<&CompiledUnit>,
        scope: &Scope<'_>,
        target: impl Into<LinkTarget<'a>>,
    ) -> Result<(), MountError> {
        self.ensure_free(el)?;
        let disposer = execute(unit, scope, target)?;
        tracing::debug!(node = %el.id(), bindings = disposer.len(), "mounted");
        self.programs.borrow_mut().insert(el.id(), disposer);
        Ok(())
    }

    /// Dispose the program mounted on `el`. Returns false if there was none.
    pub fn unmount(&self, el: &Node) -> bool {
        // released before dispose() so bindings may touch the table
        let program = self.programs.borrow_mut().remove(&el.id());
        match program {
            Some(disposer) => {
                tracing::debug!(node = %el.id(), bindings = disposer.len(), "unmounted");
                disposer.dispose();
                true
            }
            None => false,
        }
    }
}
