use std::cell::RefCell;
use std::rc::Rc;
use vista_core::{BindingLedger, LiveBinding};

struct Recorder {
    name: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl LiveBinding for Recorder {
    fn dispose(&self) {
        self.log.borrow_mut().push(self.name);
    }
}

fn record(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Box<dyn LiveBinding> {
    Box::new(Recorder { name, log: log.clone() })
}

#[test]
fn since_returns_entries_after_watermark() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let ledger = BindingLedger::new();
    ledger.register(record("a", &log));
    let mark = ledger.watermark();
    let b = ledger.register(record("b", &log));
    let c = ledger.register(record("c", &log));

    let ids: Vec<_> = ledger.since(mark).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b, c]);
}

#[test]
fn remove_is_by_identity_not_position() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let ledger = BindingLedger::new();
    let a = ledger.register(record("a", &log));
    let b = ledger.register(record("b", &log));
    let c = ledger.register(record("c", &log));

    // shift positions first
    assert_eq!(ledger.remove(&[a]), 1);
    assert_eq!(ledger.remove(&[c, a]), 1);
    assert_eq!(ledger.ids(), vec![b]);
    assert!(ledger.contains(b));
}

#[test]
fn watermark_ids_are_never_reused() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let ledger = BindingLedger::new();
    let a = ledger.register(record("a", &log));
    ledger.remove(&[a]);
    let b = ledger.register(record("b", &log));
    assert!(b > a);
}
