// File: omrc-ui/src/dom/mod.rs
// Purpose: The DOM seam every component is written against

//! Every component in this crate talks to the page through the [`Dom`]
//! trait. The browser crate implements it on top of `web-sys`; tests use
//! [`MemoryDom`], which keeps a small element tree in memory and lets them
//! fire events by hand.

use std::cell::Cell;
use std::fmt;

use crate::error::Result;

pub mod memory;
pub mod selector;

pub use memory::{MemoryDom, NodeId};
pub use selector::SelectorList;

/// Events the components subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Input,
    Blur,
}

impl EventKind {
    /// DOM event type name
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Input => "input",
            EventKind::Blur => "blur",
        }
    }

    /// Whether the event propagates to ancestors and the document
    pub fn bubbles(self) -> bool {
        !matches!(self, EventKind::Blur)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as seen by a handler
#[derive(Debug)]
pub struct DomEvent<N> {
    pub kind: EventKind,
    /// Element the event was originally dispatched on
    pub target: N,
    default_prevented: Cell<bool>,
}

impl<N> DomEvent<N> {
    pub fn new(kind: EventKind, target: N) -> Self {
        Self {
            kind,
            target,
            default_prevented: Cell::new(false),
        }
    }

    /// Suppress the browser's default action (navigation, form submission)
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type EventHandler<N> = Box<dyn FnMut(&DomEvent<N>)>;

/// Called with each watched element as it becomes visible
pub type VisibilityHandler<N> = Box<dyn FnMut(&N)>;

/// Vertical alignment for [`Dom::scroll_into_view`]. Scrolling is always smooth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    Start,
    Center,
}

impl ScrollAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollAlign::Start => "start",
            ScrollAlign::Center => "center",
        }
    }
}

/// Options for [`Dom::observe_visibility`]
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOptions {
    /// Fraction of the element that must be visible, 0.0 to 1.0
    pub threshold: f64,
    /// CSS margin applied to the viewport, e.g. `"0px 0px -50px 0px"`
    pub root_margin: String,
    /// Stop watching an element after its first reveal
    pub once: bool,
}

/// Disposer handle for a listener or watcher.
///
/// Dropping the handle detaches whatever it guards. Keep it alive for as
/// long as the behaviour should stay active.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// Detach now
    pub fn dispose(mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.disposer.is_some())
            .finish()
    }
}

/// Access to a rendered page.
///
/// Implementations are cheap handles (`Clone` shares the same page). Reads
/// on missing state return empty values rather than errors; only operations
/// the underlying page can reject return [`Result`].
pub trait Dom: Clone + 'static {
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    // Lookup
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// All elements matching `selector` in document order, searched below
    /// `scope` or across the whole document when `scope` is `None`.
    fn query_all(&self, scope: Option<&Self::Node>, selector: &str) -> Result<Vec<Self::Node>>;

    fn query_first(&self, scope: Option<&Self::Node>, selector: &str) -> Result<Option<Self::Node>> {
        Ok(self.query_all(scope, selector)?.into_iter().next())
    }

    fn body(&self) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// True when `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    // Attributes and classes
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<()>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str) -> Result<()>;
    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<()>;

    /// Inline style property, empty when unset
    fn style(&self, node: &Self::Node, property: &str) -> String;

    /// Set an inline style property; an empty value removes it
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<()>;

    // Form controls
    fn value(&self, node: &Self::Node) -> String;
    fn is_checked(&self, node: &Self::Node) -> bool;
    fn reset_form(&self, form: &Self::Node) -> Result<()>;

    // Tree mutation
    fn create_element(&self, tag: &str) -> Result<Self::Node>;
    fn set_text(&self, node: &Self::Node, text: &str);
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
    fn remove(&self, node: &Self::Node);

    // Window
    fn scroll_into_view(&self, node: &Self::Node, align: ScrollAlign);
    fn alert(&self, message: &str);
    fn navigate(&self, url: &str) -> Result<()>;

    // Events
    fn listen(
        &self,
        target: &Self::Node,
        kind: EventKind,
        handler: EventHandler<Self::Node>,
    ) -> Result<Subscription>;

    /// Listen on the document itself; receives every bubbling event
    fn listen_document(
        &self,
        kind: EventKind,
        handler: EventHandler<Self::Node>,
    ) -> Result<Subscription>;

    fn observe_visibility(
        &self,
        targets: &[Self::Node],
        options: &VisibilityOptions,
        handler: VisibilityHandler<Self::Node>,
    ) -> Result<Subscription>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_subscription_disposes_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || c.set(c.get() + 1));
        sub.dispose();
        assert_eq!(count.get(), 1);

        let c = count.clone();
        drop(Subscription::new(move || c.set(c.get() + 1)));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_event_prevent_default() {
        let event = DomEvent::new(EventKind::Submit, 7u32);
        assert!(!event.default_prevented());
        event.prevent_default();
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn test_blur_does_not_bubble() {
        assert!(EventKind::Click.bubbles());
        assert!(EventKind::Input.bubbles());
        assert!(!EventKind::Blur.bubbles());
        assert_eq!(EventKind::Submit.to_string(), "submit");
    }
}
