use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// Shared cell behind an effect. `active` is cleared by [`Effect::stop`].
struct EffectCell {
    func: RefCell<Box<dyn FnMut()>>,
    active: Cell<bool>,
}

type EffectRc = Rc<EffectCell>;

// Holds the currently running/collecting effect during dependency tracking.
thread_local! {
    static CURRENT_EFFECT: RefCell<Option<EffectRc>> = const { RefCell::new(None) };

    // Simple microtask-style scheduler queue and guards.
    static EFFECT_QUEUE: RefCell<Vec<EffectRc>> = const { RefCell::new(Vec::new()) };
    static QUEUED: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
    static IS_FLUSHING: Cell<bool> = const { Cell::new(false) };
}

fn ptr_id(rc: &EffectRc) -> usize {
    Rc::as_ptr(rc) as usize
}

fn enqueue_effect(eff: EffectRc) {
    EFFECT_QUEUE.with(|q| {
        QUEUED.with(|set| {
            let id = ptr_id(&eff);
            let mut set_b = set.borrow_mut();
            if set_b.insert(id) {
                q.borrow_mut().push(eff);
            }
        });
    });
}

/// Run one effect body with dependency collection. The previous tracking
/// target is restored afterwards so effects created inside another effect's
/// body do not steal its subscriptions.
fn run_effect(eff: &EffectRc) {
    if !eff.active.get() {
        return;
    }

    // Extract the closure out of the RefCell so we don't hold a mutable borrow
    // while executing it (the body may call set() and re-enqueue itself).
    let mut func: Box<dyn FnMut()> = std::mem::replace(&mut *eff.func.borrow_mut(), Box::new(|| {}));

    let prev = CURRENT_EFFECT.with(|cur| cur.replace(Some(eff.clone())));
    func();
    CURRENT_EFFECT.with(|cur| *cur.borrow_mut() = prev);

    // Stopped mid-run: drop the body (and whatever it captured) instead of
    // putting it back.
    if eff.active.get() {
        *eff.func.borrow_mut() = func;
    }
}

fn flush_queue() {
    // Prevent re-entrant flush; effects scheduled during a flush will be queued
    // and processed by this outer flush.
    if IS_FLUSHING.with(|f| f.replace(true)) {
        return;
    }

    loop {
        let next = EFFECT_QUEUE.with(|q| q.borrow_mut().pop());
        let Some(eff) = next else { break };

        // Mark as not queued before running, so re-enqueues are allowed.
        QUEUED.with(|set| {
            set.borrow_mut().remove(&ptr_id(&eff));
        });

        run_effect(&eff);
    }

    IS_FLUSHING.with(|f| f.set(false));
}

/// A reactive signal wrapping a `T: Clone`.
pub struct Signal<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<EffectRc>>,
}

impl<T> Signal<T>
where
    T: Clone,
{
    /// Create a new signal.
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Read the value, and if inside an `effect`, register that effect as a subscriber.
    pub fn get(&self) -> T {
        CURRENT_EFFECT.with(|current| {
            if let Some(effect_rc) = current.borrow().as_ref() {
                let mut subs = self.subscribers.borrow_mut();
                if !subs.iter().any(|e| Rc::ptr_eq(e, effect_rc)) {
                    subs.push(effect_rc.clone());
                }
            }
        });
        self.value.borrow().clone()
    }

    /// Read the value without subscribing the running effect.
    pub fn peek(&self) -> T {
        self.value.borrow().clone()
    }

    /// Update the value and notify all subscribers via the scheduler.
    pub fn set(&self, new: T) {
        *self.value.borrow_mut() = new;

        // Drop stopped effects, then snapshot the live ones before enqueuing.
        let subscribers = {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|e| e.active.get());
            subs.clone()
        };

        for subscriber in subscribers {
            enqueue_effect(subscriber);
        }
        flush_queue();
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|e| e.active.get())
            .count()
    }
}

/// Handle to a registered effect.
pub struct Effect {
    cell: EffectRc,
}

impl Effect {
    /// Unsubscribe: the body never runs again and its captures are released.
    pub fn stop(&self) {
        self.cell.active.set(false);
        *self.cell.func.borrow_mut() = Box::new(|| {});
    }

    pub fn is_active(&self) -> bool {
        self.cell.active.get()
    }
}

/// Register a closure as a reactive effect:
/// - runs immediately to collect dependencies,
/// - then re-runs whenever any `Signal` it `get()`s is `set()`,
/// - until the returned handle is stopped.
pub fn effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    let cell = Rc::new(EffectCell {
        func: RefCell::new(Box::new(f)),
        active: Cell::new(true),
    });

    // Initial run with dependency collection.
    run_effect(&cell);

    Effect { cell }
}
