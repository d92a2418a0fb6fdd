//! Live markup tree shared by the template parser, the compiler and the
//! directives that mutate it at bind time.
//!
//! A [`Node`] is a cheap-clone handle. Cloning the handle aliases the same
//! node; use [`Node::deep_clone`] to get a structurally identical copy with
//! fresh identities.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

pub mod markup;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity. Never reused, survives re-parenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(String),
    Text,
    Comment,
    /// Multi-root container. Appending or replacing with a fragment moves its
    /// children, never the fragment itself.
    Fragment,
}

struct NodeData {
    kind: NodeKind,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
    parent: Weak<NodeInner>,
}

struct NodeInner {
    id: NodeId,
    data: RefCell<NodeData>,
}

#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl Node {
    fn with_kind(kind: NodeKind, text: String) -> Self {
        Node(Rc::new(NodeInner {
            id: NodeId::next(),
            data: RefCell::new(NodeData {
                kind,
                attrs: Vec::new(),
                text,
                children: Vec::new(),
                parent: Weak::new(),
            }),
        }))
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Element(tag.into()), String::new())
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text, data.into())
    }

    pub fn comment(data: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Comment, data.into())
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        let frag = Self::with_kind(NodeKind::Fragment, String::new());
        for child in children {
            frag.append_child(&child);
        }
        frag
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn kind(&self) -> NodeKind {
        self.0.data.borrow().kind.clone()
    }

    pub fn tag(&self) -> Option<String> {
        match &self.0.data.borrow().kind {
            NodeKind::Element(tag) => Some(tag.clone()),
            _ => None,
        }
    }

    /// Case-insensitive tag test; false for non-elements.
    pub fn has_tag(&self, tag: &str) -> bool {
        matches!(&self.0.data.borrow().kind, NodeKind::Element(t) if t.eq_ignore_ascii_case(tag))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.data.borrow().kind, NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        self.0.data.borrow().kind == NodeKind::Text
    }

    pub fn is_comment(&self) -> bool {
        self.0.data.borrow().kind == NodeKind::Comment
    }

    pub fn is_fragment(&self) -> bool {
        self.0.data.borrow().kind == NodeKind::Fragment
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ---- attributes --------------------------------------------------------

    /// Attributes in declaration order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0.data.borrow().attrs.clone()
    }

    pub fn has_attributes(&self) -> bool {
        !self.0.data.borrow().attrs.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .data
            .borrow()
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.data.borrow().attrs.iter().any(|(k, _)| k == name)
    }

    /// Overwrites in place when present so declaration order is kept.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        let mut data = self.0.data.borrow_mut();
        match data.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => data.attrs.push((name, value)),
        }
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let mut data = self.0.data.borrow_mut();
        let pos = data.attrs.iter().position(|(k, _)| k == name)?;
        Some(data.attrs.remove(pos).1)
    }

    // ---- character data ----------------------------------------------------

    /// Raw data of a text or comment node; empty for containers.
    pub fn data(&self) -> String {
        self.0.data.borrow().text.clone()
    }

    pub fn set_data(&self, value: impl Into<String>) {
        self.0.data.borrow_mut().text = value.into();
    }

    /// Concatenated text of this node and all descendant text nodes.
    pub fn text_content(&self) -> String {
        let data = self.0.data.borrow();
        match data.kind {
            NodeKind::Text => data.text.clone(),
            NodeKind::Comment => String::new(),
            NodeKind::Element(_) | NodeKind::Fragment => {
                data.children.iter().map(Node::text_content).collect()
            }
        }
    }

    /// For containers, replaces all children with a single text node.
    pub fn set_text_content(&self, value: impl Into<String>) {
        let value = value.into();
        if self.is_text() || self.is_comment() {
            self.set_data(value);
            return;
        }
        for child in self.children() {
            child.detach();
        }
        self.append_child(&Node::text(value));
    }

    // ---- structure ---------------------------------------------------------

    pub fn children(&self) -> Vec<Node> {
        self.0.data.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.data.borrow().children.len()
    }

    pub fn has_children(&self) -> bool {
        self.child_count() > 0
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.0.data.borrow().children.get(index).cloned()
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.data.borrow().parent.upgrade().map(Node)
    }

    fn index_in(parent: &Node, child: &Node) -> Option<usize> {
        parent
            .0
            .data
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    /// Removes this node from its parent. Returns false when already detached.
    pub fn detach(&self) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        if let Some(pos) = Self::index_in(&parent, self) {
            parent.0.data.borrow_mut().children.remove(pos);
        }
        self.0.data.borrow_mut().parent = Weak::new();
        true
    }

    /// Moves `child` (or a fragment's children) to the end of this node.
    pub fn append_child(&self, child: &Node) {
        let moved = Self::take_for_insert(child);
        let mut data = self.0.data.borrow_mut();
        for node in moved {
            node.0.data.borrow_mut().parent = Rc::downgrade(&self.0);
            data.children.push(node);
        }
    }

    /// Replaces this node in its parent with `replacement`; a fragment is
    /// spliced in as its children. Returns false when this node is detached.
    pub fn replace_with(&self, replacement: &Node) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        let moved = Self::take_for_insert(replacement);
        let Some(pos) = Self::index_in(&parent, self) else {
            return false;
        };
        {
            let mut data = parent.0.data.borrow_mut();
            data.children.remove(pos);
            for (offset, node) in moved.into_iter().enumerate() {
                node.0.data.borrow_mut().parent = Rc::downgrade(&parent.0);
                data.children.insert(pos + offset, node);
            }
        }
        self.0.data.borrow_mut().parent = Weak::new();
        true
    }

    fn take_for_insert(node: &Node) -> Vec<Node> {
        if node.is_fragment() {
            let moved = std::mem::take(&mut node.0.data.borrow_mut().children);
            for child in &moved {
                child.0.data.borrow_mut().parent = Weak::new();
            }
            moved
        } else {
            node.detach();
            vec![node.clone()]
        }
    }

    /// Structurally identical, detached copy with fresh node ids.
    pub fn deep_clone(&self) -> Node {
        let (kind, attrs, text, children) = {
            let data = self.0.data.borrow();
            (
                data.kind.clone(),
                data.attrs.clone(),
                data.text.clone(),
                data.children.clone(),
            )
        };
        let copy = Node::with_kind(kind, text);
        copy.0.data.borrow_mut().attrs = attrs;
        for child in children {
            copy.append_child(&child.deep_clone());
        }
        copy
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({} {})", self.id(), markup::to_markup(self))
    }
}

/// Ordered attribute list used by the [`h`] builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attrs {
    pub list: Vec<(String, String)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }
    pub fn set(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.list.push((k.into(), v.into()));
        self
    }
}

// Allow concise attrs creation
impl From<()> for Attrs {
    fn from(_: ()) -> Self {
        Attrs::default()
    }
}
impl From<Vec<(&str, &str)>> for Attrs {
    fn from(v: Vec<(&str, &str)>) -> Self {
        let mut a = Attrs::new();
        for (k, v) in v {
            a.list.push((k.to_string(), v.to_string()));
        }
        a
    }
}

pub fn h(tag: impl Into<String>, attrs: impl Into<Attrs>, children: Vec<Node>) -> Node {
    let el = Node::element(tag);
    for (k, v) in attrs.into().list {
        el.set_attribute(k, v);
    }
    for child in children {
        el.append_child(&child);
    }
    el
}

pub fn text(t: impl Into<String>) -> Node {
    Node::text(t)
}

pub fn fragment(children: Vec<Node>) -> Node {
    Node::fragment(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tree() {
        let node = h(
            "div",
            vec![("class", "app")],
            vec![text("hello"), h("span", (), vec![text("world")])],
        );
        assert_eq!(node.tag().as_deref(), Some("div"));
        assert_eq!(node.attribute("class").as_deref(), Some("app"));
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.text_content(), "helloworld");
        let span = node.child(1).unwrap();
        assert!(span.parent().unwrap().ptr_eq(&node));
    }

    #[test]
    fn set_attribute_keeps_declaration_order() {
        let el = h("a", vec![("href", "x"), ("title", "t")], vec![]);
        el.set_attribute("href", "y");
        let names: Vec<_> = el.attributes().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["href", "title"]);
        assert_eq!(el.attribute("href").as_deref(), Some("y"));
    }
}
