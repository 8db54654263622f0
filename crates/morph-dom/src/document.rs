//! Document - High-level document API
//!
//! The tree plus the host state widgets read and write: focus, scroll
//! offset, viewport, layout rects, listeners and custom-event observers.

use std::collections::HashMap;

use crate::{
    CustomEvent, DOMRect, DOMTokenList, DomTree, ElementData, ListenerRegistry, NodeData, NodeId,
};

/// Custom events kept in the dispatch log; older ones are dropped
pub const DISPATCH_LOG_LIMIT: usize = 256;

/// Window scroll offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

/// Layout viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl Viewport {
    pub fn rect(&self) -> DOMRect {
        DOMRect::from_xywh(0.0, 0.0, self.width, self.height)
    }
}

/// Custom-event observer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Observer {
    id: ObserverId,
    node: NodeId,
    name: String,
    callback: Box<dyn FnMut(&CustomEvent)>,
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id)
            .field("node", &self.node)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    active_element: NodeId,
    scroll: ScrollPosition,
    viewport: Viewport,
    layout: HashMap<NodeId, DOMRect>,
    listeners: ListenerRegistry,
    observers: Vec<Observer>,
    next_observer: u64,
    dispatched: Vec<CustomEvent>,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            active_element: NodeId::NONE,
            scroll: ScrollPosition::default(),
            viewport: Viewport::default(),
            layout: HashMap::new(),
            listeners: ListenerRegistry::new(),
            observers: Vec::new(),
            next_observer: 0,
            dispatched: Vec::new(),
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let find_child = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.tag == tag))
                .map_or(NodeId::NONE, |(id, _)| id)
        };
        self.html_element = find_child(&self.tree, self.tree.root(), "html");
        self.head_element = find_child(&self.tree, self.html_element, "head");
        self.body_element = find_child(&self.tree, self.html_element, "body");
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        for (id, node) in self.tree.children(self.head_element) {
            if let NodeData::Element(elem) = &node.data {
                if elem.tag == "title" {
                    return self.tree.text_content(id);
                }
            }
        }
        String::new()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Document root node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_by_id(id)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.element(id)
    }

    // ---- attributes -------------------------------------------------

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.element(node)?.get_attr(name)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute; returns false if `node` is not an element
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        match self.tree.element_mut(node) {
            Some(elem) => {
                elem.set_attr(name, value);
                true
            }
            None => false,
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.tree.element_mut(node)?.remove_attr(name)
    }

    /// The `hidden` flag
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.has_attr(node, "hidden")
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if hidden {
            self.set_attr(node, "hidden", "");
        } else {
            self.remove_attr(node, "hidden");
        }
    }

    pub fn class_list(&self, node: NodeId) -> DOMTokenList {
        DOMTokenList::from_string(self.attr(node, "class").unwrap_or(""))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let mut list = self.class_list(node);
        if list.add(class) {
            self.set_attr(node, "class", &list.value());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let mut list = self.class_list(node);
        if list.remove(class) {
            self.set_attr(node, "class", &list.value());
        }
    }

    // ---- inline style and form values -------------------------------

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.tree.element(node)?.style_property(property)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(elem) = self.tree.element_mut(node) {
            elem.set_style_property(property, value);
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(elem) = self.tree.element_mut(node) {
            elem.remove_style_property(property);
        }
    }

    /// Live value of a form control (falls back to the `value` attribute)
    pub fn value(&self, node: NodeId) -> String {
        self.tree
            .element(node)
            .and_then(|e| e.value.clone().or_else(|| e.get_attr("value").map(str::to_owned)))
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(elem) = self.tree.element_mut(node) {
            elem.value = Some(value.to_string());
        }
    }

    // ---- focus ------------------------------------------------------

    pub fn active_element(&self) -> Option<NodeId> {
        Some(self.active_element).filter(|id| id.is_valid())
    }

    /// Move focus to an element; returns false for non-elements
    pub fn focus(&mut self, node: NodeId) -> bool {
        if self.tree.element(node).is_none() {
            return false;
        }
        self.active_element = node;
        true
    }

    pub fn blur(&mut self) {
        self.active_element = NodeId::NONE;
    }

    // ---- scroll, viewport, layout -----------------------------------

    pub fn scroll_position(&self) -> ScrollPosition {
        self.scroll
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll = ScrollPosition { x, y };
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport { width, height };
    }

    /// Record the laid-out box of a node
    pub fn set_bounding_rect(&mut self, node: NodeId, rect: DOMRect) {
        self.layout.insert(node, rect);
    }

    /// getBoundingClientRect; zero-sized when the node was never laid out
    pub fn bounding_rect(&self, node: NodeId) -> DOMRect {
        self.layout.get(&node).copied().unwrap_or_default()
    }

    // ---- listeners and custom events --------------------------------

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// Observe custom events named `name` reaching `node`
    pub fn observe(
        &mut self,
        node: NodeId,
        name: &str,
        callback: impl FnMut(&CustomEvent) + 'static,
    ) -> ObserverId {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        self.observers.push(Observer {
            id,
            node,
            name: name.to_string(),
            callback: Box::new(callback),
        });
        id
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    /// Deliver a custom event along its bubble path, then log it
    pub fn dispatch_event(&mut self, event: CustomEvent) {
        let path: Vec<NodeId> = if event.bubbles {
            self.tree.ancestors(event.target).collect()
        } else {
            vec![event.target]
        };

        for node in path {
            for observer in self
                .observers
                .iter_mut()
                .filter(|o| o.node == node && o.name == event.name)
            {
                (observer.callback)(&event);
            }
        }

        tracing::trace!(name = %event.name, target = %event.target, "custom event dispatched");
        if self.dispatched.len() == DISPATCH_LOG_LIMIT {
            self.dispatched.remove(0);
        }
        self.dispatched.push(event);
    }

    /// Custom events dispatched since the last `take_dispatched`, oldest
    /// first. Only the latest `DISPATCH_LOG_LIMIT` are kept.
    pub fn dispatched(&self) -> &[CustomEvent] {
        &self.dispatched
    }

    /// Drain the dispatch log
    pub fn take_dispatched(&mut self) -> Vec<CustomEvent> {
        std::mem::take(&mut self.dispatched)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventDetail;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_new_document_structure() {
        let doc = Document::default();
        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().get(doc.body()).unwrap().parent, doc.document_element());
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_focus_rejects_non_elements() {
        let mut doc = Document::default();
        let text = doc.tree.create_text("x");
        assert!(!doc.focus(text));
        assert!(doc.focus(doc.body()));
        assert_eq!(doc.active_element(), Some(doc.body()));
        doc.blur();
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_custom_event_bubbles_to_observers() {
        let mut doc = Document::default();
        let body = doc.body();
        let section = doc.tree.create_element("section");
        doc.tree.append_child(body, section);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        doc.observe(body, "accordion:open", move |e| sink.borrow_mut().push(e.target));
        doc.observe(body, "accordion:close", |_| panic!("wrong event name"));

        doc.dispatch_event(CustomEvent::new("accordion:open", section, EventDetail::default()));

        assert_eq!(*seen.borrow(), vec![section]);
        assert_eq!(doc.dispatched().len(), 1);
    }

    #[test]
    fn test_dispatch_log_is_bounded() {
        let mut doc = Document::default();
        let body = doc.body();
        for i in 0..DISPATCH_LOG_LIMIT + 3 {
            doc.dispatch_event(CustomEvent::new(&format!("e{i}"), body, EventDetail::default()));
        }
        assert_eq!(doc.dispatched().len(), DISPATCH_LOG_LIMIT);
        assert_eq!(doc.dispatched()[0].name, "e3");

        let drained = doc.take_dispatched();
        assert_eq!(drained.len(), DISPATCH_LOG_LIMIT);
        assert!(doc.dispatched().is_empty());
    }

    #[test]
    fn test_class_helpers() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.add_class(body, "drawer--shake");
        doc.add_class(body, "drawer--shake");
        assert_eq!(doc.attr(body, "class"), Some("drawer--shake"));
        doc.remove_class(body, "drawer--shake");
        assert!(!doc.has_class(body, "drawer--shake"));
    }
}
