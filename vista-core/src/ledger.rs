use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A runtime effect installed by a directive. `dispose` undoes whatever the
/// binding installed (subscriptions, node mutations it owns).
pub trait LiveBinding {
    fn dispose(&self);
}

/// Stable identity of a ledger entry. Ids are handed out in increasing order
/// and never reused, so "everything registered after X" is `id >= X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

#[derive(Clone)]
pub struct OwnedBinding {
    pub id: BindingId,
    pub binding: Rc<dyn LiveBinding>,
}

impl fmt::Debug for OwnedBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedBinding").field(&self.id).finish()
    }
}

/// Ordered ledger of a view-model's live bindings.
///
/// Re-entrant: no borrow is held across user code, so a binding may register
/// or remove entries while another caller is between taking a watermark and
/// reading its slice.
pub struct BindingLedger {
    entries: RefCell<Vec<OwnedBinding>>,
    next_id: Cell<u64>,
}

impl Default for BindingLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingLedger {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Append a binding; returns its id.
    pub fn register(&self, binding: Box<dyn LiveBinding>) -> BindingId {
        let id = BindingId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push(OwnedBinding {
            id,
            binding: Rc::from(binding),
        });
        id
    }

    /// The id the next registration will receive.
    pub fn watermark(&self) -> BindingId {
        BindingId(self.next_id.get())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn ids(&self) -> Vec<BindingId> {
        self.entries.borrow().iter().map(|e| e.id).collect()
    }

    pub fn contains(&self, id: BindingId) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    /// Entries still present that were registered at or after `mark`, in
    /// creation order.
    pub fn since(&self, mark: BindingId) -> Vec<OwnedBinding> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.id >= mark)
            .cloned()
            .collect()
    }

    /// Remove the given ids wherever they currently sit. Ids already gone are
    /// ignored. Returns how many entries were removed.
    pub fn remove(&self, ids: &[BindingId]) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| !ids.contains(&e.id));
        before - entries.len()
    }
}
