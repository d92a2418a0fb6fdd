use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use serde_json::{Value, json};
use vista_compiler::{
    Compiler, Component, DirLoader, LoadError, MemoryLoader, MountError, MountTable,
    TemplateLoader,
};
use vista_core::ViewModel;
use vista_dom::h;
use vista_dom::markup::inner_markup;

const CARD: &str = r#"<article class="card"><h2>{{ title }}</h2><p title="{{ title }}">{{ body }}</p></article>"#;

#[test]
fn mount_update_unmount() {
    let compiler = Compiler::with_builtins();
    let vm = ViewModel::from_json(json!({ "title": "Hello", "body": "first" }));
    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let events = events.clone();
        vm.lifecycle().on_mounted(move || events.borrow_mut().push("mounted"));
    }
    {
        let events = events.clone();
        vm.lifecycle().before_destroy(move || events.borrow_mut().push("destroy"));
    }

    let card = Component::new("card", vm.clone(), &compiler, CARD).unwrap();
    assert!(card.has_template());
    assert!(card.unit().is_some());

    let table = MountTable::new();
    let root = h("main", (), vec![]);
    card.mount(&table, &root).unwrap();
    assert!(card.is_mounted());
    assert_eq!(*events.borrow(), ["mounted"]);
    assert_eq!(
        inner_markup(&root),
        r#"<article class="card"><h2>Hello</h2><p title="Hello">first</p></article>"#
    );

    vm.set("body", json!("second"));
    assert!(inner_markup(&root).contains(">second</p>"));

    assert!(card.unmount(&table));
    assert_eq!(*events.borrow(), ["mounted", "destroy"]);
    assert!(!root.has_children());
    assert!(vm.bindings().is_empty());
    assert!(vm.is_disposed());
    assert!(!card.unmount(&table));
}

#[test]
fn mounting_twice_on_one_node_fails() {
    let compiler = Compiler::with_builtins();
    let table = MountTable::new();
    let root = h("main", (), vec![]);

    let a = Component::new("a", ViewModel::from_json(json!({ "title": "A" })), &compiler, CARD).unwrap();
    let b = Component::new("b", ViewModel::from_json(json!({ "title": "B" })), &compiler, CARD).unwrap();
    a.mount(&table, &root).unwrap();
    let err = b.mount(&table, &root).unwrap_err();

    assert!(matches!(err, MountError::AlreadyMounted(_)));
    assert!(!b.is_mounted());
    assert!(b.vm().bindings().is_empty());
    assert_eq!(root.child_count(), 1, "only the first component's nodes were inserted");
}

#[test]
fn mounted_component_cannot_be_mounted_elsewhere() {
    let compiler = Compiler::with_builtins();
    let vm = ViewModel::from_json(json!({ "title": "T", "body": "B" }));
    let card = Component::new("card", vm.clone(), &compiler, CARD).unwrap();
    let table = MountTable::new();

    let first = h("section", (), vec![]);
    let second = h("section", (), vec![]);
    card.mount(&table, &first).unwrap();
    let bound = vm.bindings().len();

    let err = card.mount(&table, &second).unwrap_err();
    assert!(matches!(err, MountError::ComponentMounted(name) if name == "card"));
    assert!(!second.has_children());
    assert!(!table.is_mounted(&second));
    assert_eq!(vm.bindings().len(), bound);

    // unmount still tears down the one real mount
    assert!(card.unmount(&table));
    assert!(table.is_empty());
    assert!(vm.bindings().is_empty());
    assert!(!first.has_children());
    vm.set("title", json!("changed"));
    assert_eq!(inner_markup(&first), "");
}

#[test]
fn unmounted_component_stays_disposed() {
    let compiler = Compiler::with_builtins();
    let vm = ViewModel::from_json(json!({ "title": "T", "body": "B" }));
    let card = Component::new("card", vm.clone(), &compiler, CARD).unwrap();
    let table = MountTable::new();

    let first = h("section", (), vec![]);
    card.mount(&table, &first).unwrap();
    assert!(!vm.is_disposed());
    card.unmount(&table);
    assert!(vm.is_disposed());

    let second = h("section", (), vec![]);
    let err = card.mount(&table, &second).unwrap_err();
    assert!(matches!(err, MountError::ComponentDisposed(name) if name == "card"));
    assert!(!second.has_children());
    assert!(table.is_empty());
}

#[test]
fn components_sharing_a_template_get_separate_nodes() {
    let compiler = Compiler::with_builtins();
    let a = Component::new("a", ViewModel::from_json(json!({ "title": "A" })), &compiler, CARD).unwrap();
    let b = Component::new("b", ViewModel::from_json(json!({ "title": "B" })), &compiler, CARD).unwrap();
    let table = MountTable::new();

    let left = h("section", (), vec![]);
    let right = h("section", (), vec![]);
    a.mount(&table, &left).unwrap();
    b.mount(&table, &right).unwrap();
    assert!(inner_markup(&left).contains("<h2>A</h2>"));
    assert!(inner_markup(&right).contains("<h2>B</h2>"));

    a.vm().set("title", json!("A2"));
    assert!(inner_markup(&left).contains("<h2>A2</h2>"));
    assert!(inner_markup(&right).contains("<h2>B</h2>"));
}

#[test]
fn static_template_mounts_without_bindings() {
    let compiler = Compiler::with_builtins();
    let vm = ViewModel::new();
    let c = Component::new("static", vm.clone(), &compiler, "<hr><p>fixed</p>").unwrap();
    assert!(c.unit().is_none());

    let table = MountTable::new();
    let root = h("div", (), vec![]);
    c.mount(&table, &root).unwrap();
    assert_eq!(inner_markup(&root), "<hr/><p>fixed</p>");
    assert!(vm.bindings().is_empty());
}

#[test]
fn loads_from_memory() {
    let compiler = Compiler::with_builtins();
    let mut loader = MemoryLoader::new();
    loader.insert("greeting", "<p>Hi {{ who }}</p>");

    let vm = ViewModel::from_json(json!({ "who": "there" }));
    let c = block_on(Component::load("greeting", vm, &compiler, &loader));
    assert_eq!(c.name(), "greeting");

    let table = MountTable::new();
    let root = h("div", (), vec![]);
    c.mount(&table, &root).unwrap();
    assert_eq!(inner_markup(&root), "<p>Hi there</p>");
}

#[test]
fn missing_template_cannot_be_mounted() {
    let compiler = Compiler::with_builtins();
    let loader = MemoryLoader::new();
    assert!(matches!(
        block_on(loader.load("ghost")),
        Err(LoadError::NotFound(name)) if name == "ghost"
    ));

    let c = block_on(Component::load("ghost", ViewModel::new(), &compiler, &loader));
    assert!(!c.has_template());

    let table = MountTable::new();
    let err = c.mount(&table, &h("div", (), vec![])).unwrap_err();
    assert!(matches!(err, MountError::NoTemplate(name) if name == "ghost"));
    assert!(table.is_empty());
}

#[test]
fn loads_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("row.html"), "<tr><td>{{ cell }}</td></tr>").unwrap();

    let loader = DirLoader::new(dir.path());
    assert_eq!(loader.path_for("row"), dir.path().join("row.html"));
    let source = block_on(loader.load("row")).unwrap();
    assert_eq!(source, "<tr><td>{{ cell }}</td></tr>");

    let compiler = Compiler::with_builtins();
    let vm = ViewModel::from_json(json!({ "cell": 7 }));
    let c = block_on(Component::load("row", vm, &compiler, &loader));
    let table = MountTable::new();
    let root = h("tbody", (), vec![]);
    c.mount(&table, &root).unwrap();
    assert_eq!(inner_markup(&root), "<tr><td>7</td></tr>");

    assert!(matches!(
        block_on(loader.load("absent")),
        Err(LoadError::NotFound(_))
    ));
}

#[test]
fn async_field_renders_once_it_settles() {
    let compiler = Compiler::with_builtins();
    let vm = ViewModel::new();
    let (tx, rx) = oneshot::channel::<Value>();
    let pending = vm.resolve_field("user", async move { rx.await.map_err(|e| e.to_string()) });

    let c = Component::new("profile", vm.clone(), &compiler, "<b>{{ user.name }}</b>").unwrap();
    let table = MountTable::new();
    let root = h("div", (), vec![]);
    c.mount(&table, &root).unwrap();
    assert_eq!(inner_markup(&root), "<b></b>");

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(pending).unwrap();
    pool.run_until_stalled();
    assert_eq!(inner_markup(&root), "<b></b>");

    tx.send(json!({ "name": "Ada" })).unwrap();
    pool.run_until_stalled();
    assert_eq!(inner_markup(&root), "<b>Ada</b>");
}

#[test]
fn child_component_sees_its_owner() {
    let compiler = Compiler::with_builtins();
    let parent = ViewModel::from_json(json!({ "theme": "dark" }));
    let child = Component::new(
        "child",
        ViewModel::from_json(json!({ "label": "ok" })),
        &compiler,
        "<span>{{ label }}</span>",
    )
    .unwrap();

    let table = MountTable::new();
    let slot = h("div", (), vec![]);
    child.mount_with(&table, &slot, Some(&parent)).unwrap();
    assert_eq!(inner_markup(&slot), "<span>ok</span>");
    assert!(parent.bindings().is_empty());
    assert_eq!(child.vm().bindings().len(), 1);
}
