use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use serde_json::{Value, json};
use vista_core::{ViewModel, effect};

#[test]
fn evaluates_dotted_paths() {
    let vm = ViewModel::from_json(json!({
        "user": { "name": "Ada", "tags": ["x", "y"] },
        "count": 3
    }));
    assert_eq!(vm.evaluate("user.name"), json!("Ada"));
    assert_eq!(vm.evaluate(" user.tags.1 "), json!("y"));
    assert_eq!(vm.evaluate("count"), json!(3));
    assert_eq!(vm.evaluate("user.missing.deeper"), Value::Null);
    assert_eq!(vm.evaluate("nope"), Value::Null);
    assert_eq!(vm.evaluate_string("count"), "3");
    assert_eq!(vm.evaluate("'lit'"), json!("lit"));
}

#[test]
fn evaluation_inside_effect_tracks_the_field() {
    let vm = ViewModel::from_json(json!({ "user": { "name": "Ada" } }));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _handle = {
        let vm = vm.clone();
        let seen = seen.clone();
        effect(move || seen.borrow_mut().push(vm.evaluate_string("user.name")))
    };
    vm.set("user", json!({ "name": "Grace" }));
    assert_eq!(&*seen.borrow(), &["Ada".to_string(), "Grace".to_string()]);
}

#[test]
fn resolve_field_declares_before_settling() {
    let vm = ViewModel::new();
    let (tx_a, rx_a) = oneshot::channel::<Value>();
    let (tx_b, rx_b) = oneshot::channel::<Value>();

    let fut_a = vm.resolve_field("a", async move { rx_a.await.map_err(|e| e.to_string()) });
    let fut_b = vm.resolve_field("b", async move { rx_b.await.map_err(|e| e.to_string()) });

    // Both properties exist before anything settles.
    assert!(vm.has_field("a"));
    assert!(vm.has_field("b"));
    assert_eq!(vm.get("a"), Value::Null);

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    spawner.spawn_local(fut_a).unwrap();
    spawner.spawn_local(fut_b).unwrap();

    // settle out of order
    tx_b.send(json!(2)).unwrap();
    pool.run_until_stalled();
    assert_eq!(vm.get("b"), json!(2));
    assert_eq!(vm.get("a"), Value::Null);

    tx_a.send(json!(1)).unwrap();
    pool.run_until_stalled();
    assert_eq!(vm.get("a"), json!(1));
}

#[test]
fn rejected_field_keeps_null_value() {
    let vm = ViewModel::new();
    block_on(vm.resolve_field("data", async { Err::<Value, _>("offline") }));
    assert!(vm.has_field("data"));
    assert_eq!(vm.get("data"), Value::Null);
}

#[test]
fn late_settle_after_disposal_still_assigns() {
    let vm = ViewModel::new();
    let fut = vm.resolve_field("late", async { Ok::<_, String>(json!("v")) });
    vm.mark_disposed();
    block_on(fut);
    assert_eq!(vm.get("late"), json!("v"));
}
