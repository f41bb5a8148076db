// File: omrc-ui/src/dom/memory.rs
// Purpose: In-memory Dom implementation for tests and headless runs

//! [`MemoryDom`] keeps an element tree, the registered listeners and a log
//! of window side effects (alerts, scrolls, navigations). Tests build a page
//! with [`MemoryDom::element`], mount components, then drive them with
//! [`MemoryDom::click`], [`MemoryDom::submit`], [`MemoryDom::type_text`],
//! [`MemoryDom::blur`] and [`MemoryDom::reveal`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::{Rc, Weak};

use super::selector::{Matchable, SelectorList};
use super::{
    Dom, DomEvent, EventHandler, EventKind, ScrollAlign, Subscription, VisibilityHandler,
    VisibilityOptions,
};
use crate::error::{DomError, Result};

/// Handle to an element inside a [`MemoryDom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    checked: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };
        let root = tree.alloc("html");
        let body = tree.alloc("body");
        tree.attach(root, body);
        tree.root = root;
        tree.body = body;
        tree
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != id);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, node)
    }

    /// Descendants of `scope` in document order, excluding `scope` itself
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        let node = self.node(id);
        match name {
            "class" if node.classes.is_empty() => None,
            "class" => Some(node.classes.join(" ")),
            "style" if node.styles.is_empty() => None,
            "style" => Some(
                node.styles
                    .iter()
                    .map(|(k, v)| format!("{}: {};", k, v))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => node.attrs.get(name).cloned(),
        }
    }

    fn is_form_control(&self, id: NodeId) -> bool {
        matches!(self.node(id).tag.as_str(), "input" | "select" | "textarea")
    }

    fn is_checkable(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.tag == "input"
            && matches!(
                node.attrs.get("type").map(String::as_str),
                Some("checkbox") | Some("radio")
            )
    }
}

struct TreeView<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl Matchable for TreeView<'_> {
    fn tag_name(&self) -> String {
        self.tree.node(self.id).tag.clone()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.tree.attribute(self.id, name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.tree.node(self.id).classes.iter().any(|c| c == class)
    }

    fn parent_element(&self) -> Option<Self> {
        self.tree.node(self.id).parent.map(|id| TreeView {
            tree: self.tree,
            id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerTarget {
    Document,
    Node(NodeId),
}

struct Listener {
    id: u64,
    target: ListenerTarget,
    kind: EventKind,
    handler: Rc<RefCell<EventHandler<NodeId>>>,
}

struct Watcher {
    id: u64,
    targets: Vec<NodeId>,
    options: VisibilityOptions,
    handler: Rc<RefCell<VisibilityHandler<NodeId>>>,
}

/// Window-level side effects recorded for assertions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectLog {
    pub alerts: Vec<String>,
    pub scrolls: Vec<(NodeId, ScrollAlign)>,
    pub navigations: Vec<String>,
}

struct Inner {
    tree: RefCell<Tree>,
    listeners: RefCell<Vec<Listener>>,
    watchers: RefCell<Vec<Watcher>>,
    effects: RefCell<EffectLog>,
    next_id: Cell<u64>,
}

impl Inner {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn listener_registered(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|l| l.id == id)
    }
}

/// A page held entirely in memory
#[derive(Clone)]
pub struct MemoryDom {
    inner: Rc<Inner>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDom")
            .field("nodes", &self.inner.tree.borrow().nodes.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl MemoryDom {
    /// Empty document with `<html><body></body></html>`
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                tree: RefCell::new(Tree::new()),
                listeners: RefCell::new(Vec::new()),
                watchers: RefCell::new(Vec::new()),
                effects: RefCell::new(EffectLog::default()),
                next_id: Cell::new(1),
            }),
        }
    }

    pub fn body_node(&self) -> NodeId {
        self.inner.tree.borrow().body
    }

    /// Create an element under `parent`.
    ///
    /// `class` is split into classes; `value` and `checked` also seed the
    /// live value and checkedness the way HTML parsing would.
    pub fn element(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut tree = self.inner.tree.borrow_mut();
        let id = tree.alloc(tag);
        for (name, value) in attrs {
            let node = tree.node_mut(id);
            match *name {
                "class" => node.classes = value.split_whitespace().map(str::to_string).collect(),
                _ => {
                    node.attrs.insert(name.to_string(), value.to_string());
                }
            }
            match *name {
                "value" => node.value = value.to_string(),
                "checked" => node.checked = true,
                _ => {}
            }
        }
        tree.attach(parent, id);
        id
    }

    pub fn text(&self, node: NodeId) -> String {
        self.inner.tree.borrow().node(node).text.clone()
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.inner.tree.borrow().node(node).tag.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.tree.borrow().node(node).children.clone()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.inner.tree.borrow().is_attached(node)
    }

    /// Set a control's value without firing events
    pub fn set_value(&self, node: NodeId, value: &str) {
        self.inner.tree.borrow_mut().node_mut(node).value = value.to_string();
    }

    /// Set checkedness without firing events
    pub fn set_checked(&self, node: NodeId, checked: bool) {
        self.inner.tree.borrow_mut().node_mut(node).checked = checked;
    }

    pub fn effects(&self) -> EffectLog {
        self.inner.effects.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.inner.effects.borrow().alerts.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn watched_count(&self) -> usize {
        self.inner.watchers.borrow().iter().map(|w| w.targets.len()).sum()
    }

    /// Click an element. Checkboxes toggle before listeners run, as in a browser.
    pub fn click(&self, node: NodeId) -> DomEvent<NodeId> {
        {
            let mut tree = self.inner.tree.borrow_mut();
            if tree.is_checkable(node) {
                let data = tree.node_mut(node);
                data.checked = !data.checked;
            }
        }
        self.dispatch(node, EventKind::Click)
    }

    pub fn submit(&self, form: NodeId) -> DomEvent<NodeId> {
        self.dispatch(form, EventKind::Submit)
    }

    /// Replace a control's value and fire `input`
    pub fn type_text(&self, node: NodeId, value: &str) -> DomEvent<NodeId> {
        self.set_value(node, value);
        self.dispatch(node, EventKind::Input)
    }

    pub fn blur(&self, node: NodeId) -> DomEvent<NodeId> {
        self.dispatch(node, EventKind::Blur)
    }

    /// Report that `ratio` of `node` is now inside the viewport
    pub fn reveal(&self, node: NodeId, ratio: f64) {
        let mut due = Vec::new();
        {
            let mut watchers = self.inner.watchers.borrow_mut();
            for watcher in watchers.iter_mut() {
                if !watcher.targets.contains(&node) || ratio < watcher.options.threshold {
                    continue;
                }
                if watcher.options.once {
                    watcher.targets.retain(|t| *t != node);
                }
                due.push(watcher.handler.clone());
            }
        }
        for handler in due {
            (handler.borrow_mut())(&node);
        }
    }

    /// Fire `kind` at `target`, bubbling to ancestors and the document when
    /// the event kind bubbles. Listeners removed mid-dispatch are skipped.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> DomEvent<NodeId> {
        let event = DomEvent::new(kind, target);

        let mut path = vec![ListenerTarget::Node(target)];
        if kind.bubbles() {
            let tree = self.inner.tree.borrow();
            let mut current = tree.node(target).parent;
            while let Some(id) = current {
                path.push(ListenerTarget::Node(id));
                current = tree.node(id).parent;
            }
            path.push(ListenerTarget::Document);
        }

        for hop in path {
            let handlers: Vec<(u64, Rc<RefCell<EventHandler<NodeId>>>)> = self
                .inner
                .listeners
                .borrow()
                .iter()
                .filter(|l| l.target == hop && l.kind == kind)
                .map(|l| (l.id, l.handler.clone()))
                .collect();

            for (id, handler) in handlers {
                if self.inner.listener_registered(id) {
                    (handler.borrow_mut())(&event);
                }
            }
        }

        event
    }

    /// Deterministic markup-like rendering of a subtree, for comparing states
    pub fn snapshot(&self, node: NodeId) -> String {
        let tree = self.inner.tree.borrow();
        let mut out = String::new();
        render(&tree, node, 0, &mut out);
        out
    }

    fn add_listener(&self, target: ListenerTarget, kind: EventKind, handler: EventHandler<NodeId>) -> Subscription {
        let id = self.inner.next_id();
        self.inner.listeners.borrow_mut().push(Listener {
            id,
            target,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                // Take the listener out first so its handler is dropped after the borrow ends
                let removed: Vec<Listener> = {
                    let mut listeners = inner.listeners.borrow_mut();
                    let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *listeners)
                        .into_iter()
                        .partition(|l| l.id == id);
                    *listeners = kept;
                    gone
                };
                drop(removed);
            }
        })
    }
}

fn render(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
    let node = tree.node(id);
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{}<{}", indent, node.tag);
    for (name, value) in &node.attrs {
        let _ = write!(out, " {}=\"{}\"", name, value);
    }
    if !node.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", node.classes.join(" "));
    }
    if let Some(style) = tree.attribute(id, "style") {
        let _ = write!(out, " style=\"{}\"", style);
    }
    if tree.is_form_control(id) {
        let _ = write!(out, " .value=\"{}\"", node.value);
    }
    if node.checked {
        out.push_str(" .checked");
    }
    out.push('>');
    if !node.text.is_empty() {
        out.push_str(&node.text);
    }
    out.push('\n');
    for child in &node.children {
        render(tree, *child, depth + 1, out);
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.inner.tree.borrow();
        tree.descendants(tree.root)
            .into_iter()
            .find(|node| tree.node(*node).attrs.get("id").map(String::as_str) == Some(id))
    }

    fn query_all(&self, scope: Option<&NodeId>, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let tree = self.inner.tree.borrow();
        let scope = scope.copied().unwrap_or(tree.root);
        Ok(tree
            .descendants(scope)
            .into_iter()
            .filter(|id| list.matches(&TreeView { tree: &*tree, id: *id }))
            .collect())
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body_node())
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.inner.tree.borrow().node(*node).parent
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.inner.tree.borrow().is_ancestor_or_self(*ancestor, *node)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.inner.tree.borrow().attribute(*node, name)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<()> {
        let mut tree = self.inner.tree.borrow_mut();
        let data = tree.node_mut(*node);
        match name {
            "class" => data.classes = value.split_whitespace().map(str::to_string).collect(),
            "style" => {
                return Err(DomError::Unsupported {
                    tag: data.tag.clone(),
                    operation: "style attribute writes (use set_style)",
                })
            }
            _ => {
                data.attrs.insert(name.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.inner.tree.borrow().node(*node).classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<()> {
        let mut tree = self.inner.tree.borrow_mut();
        let classes = &mut tree.node_mut(*node).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<()> {
        self.inner
            .tree
            .borrow_mut()
            .node_mut(*node)
            .classes
            .retain(|c| c != class);
        Ok(())
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.inner
            .tree
            .borrow()
            .node(*node)
            .styles
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<()> {
        let mut tree = self.inner.tree.borrow_mut();
        let styles = &mut tree.node_mut(*node).styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    fn value(&self, node: &NodeId) -> String {
        let tree = self.inner.tree.borrow();
        if tree.is_checkable(*node) {
            // Checkboxes report their value attribute, "on" by default
            return tree
                .node(*node)
                .attrs
                .get("value")
                .cloned()
                .unwrap_or_else(|| "on".to_string());
        }
        tree.node(*node).value.clone()
    }

    fn is_checked(&self, node: &NodeId) -> bool {
        self.inner.tree.borrow().node(*node).checked
    }

    fn reset_form(&self, form: &NodeId) -> Result<()> {
        let mut tree = self.inner.tree.borrow_mut();
        if tree.node(*form).tag != "form" {
            return Err(DomError::Unsupported {
                tag: tree.node(*form).tag.clone(),
                operation: "reset",
            });
        }
        for id in tree.descendants(*form) {
            if !tree.is_form_control(id) {
                continue;
            }
            let data = tree.node_mut(id);
            data.value = data.attrs.get("value").cloned().unwrap_or_default();
            data.checked = data.attrs.contains_key("checked");
        }
        Ok(())
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomError::Js(format!("invalid tag name `{}`", tag)));
        }
        Ok(self.inner.tree.borrow_mut().alloc(tag))
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.inner.tree.borrow_mut().node_mut(*node).text = text.to_string();
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let mut tree = self.inner.tree.borrow_mut();
        if tree.is_ancestor_or_self(*child, *parent) {
            return Err(DomError::Js("cannot append a node to its own subtree".to_string()));
        }
        tree.attach(*parent, *child);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        self.inner.tree.borrow_mut().detach(*node);
    }

    fn scroll_into_view(&self, node: &NodeId, align: ScrollAlign) {
        self.inner.effects.borrow_mut().scrolls.push((*node, align));
    }

    fn alert(&self, message: &str) {
        self.inner.effects.borrow_mut().alerts.push(message.to_string());
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.inner.effects.borrow_mut().navigations.push(url.to_string());
        Ok(())
    }

    fn listen(&self, target: &NodeId, kind: EventKind, handler: EventHandler<NodeId>) -> Result<Subscription> {
        Ok(self.add_listener(ListenerTarget::Node(*target), kind, handler))
    }

    fn listen_document(&self, kind: EventKind, handler: EventHandler<NodeId>) -> Result<Subscription> {
        Ok(self.add_listener(ListenerTarget::Document, kind, handler))
    }

    fn observe_visibility(
        &self,
        targets: &[NodeId],
        options: &VisibilityOptions,
        handler: VisibilityHandler<NodeId>,
    ) -> Result<Subscription> {
        if !(0.0..=1.0).contains(&options.threshold) {
            return Err(DomError::Js(format!(
                "threshold {} is outside 0.0..=1.0",
                options.threshold
            )));
        }

        let id = self.inner.next_id();
        self.inner.watchers.borrow_mut().push(Watcher {
            id,
            targets: targets.to_vec(),
            options: options.clone(),
            handler: Rc::new(RefCell::new(handler)),
        });

        let weak = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let removed: Vec<Watcher> = {
                    let mut watchers = inner.watchers.borrow_mut();
                    let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *watchers)
                        .into_iter()
                        .partition(|w| w.id == id);
                    *watchers = kept;
                    gone
                };
                drop(removed);
            }
        }))
    }
}
