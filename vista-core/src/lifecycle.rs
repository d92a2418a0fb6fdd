// vista-core/src/lifecycle.rs
use std::cell::RefCell;

type Hook = Box<dyn FnOnce()>;

/// Mount/teardown hooks of one component.
#[derive(Default)]
pub struct Lifecycle {
    mounted: RefCell<Vec<Hook>>,
    destroy: RefCell<Vec<Hook>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook to run when the component is mounted
    pub fn on_mounted(&self, f: impl FnOnce() + 'static) {
        self.mounted.borrow_mut().push(Box::new(f));
    }

    /// Register a hook to run before the component is destroyed
    pub fn before_destroy(&self, f: impl FnOnce() + 'static) {
        self.destroy.borrow_mut().push(Box::new(f));
    }

    /// Run and clear all mounted hooks, in registration order
    pub fn run_mounted_hooks(&self) {
        run_all(&self.mounted);
    }

    /// Run and clear all destroy hooks, in registration order
    pub fn run_destroy_hooks(&self) {
        run_all(&self.destroy);
    }
}

// Drained before running so a hook may register further hooks.
fn run_all(hooks: &RefCell<Vec<Hook>>) {
    let pending = std::mem::take(&mut *hooks.borrow_mut());
    for hook in pending {
        hook();
    }
}
