//! Attribute and event utilities
//!
//! Id generation, custom-event dispatch, the reference-counted body
//! scroll lock, focus-trap lookup and the attribute journal controllers
//! use to undo their writes on destroy.

use morph_a11y::aria::{parse_bool, ARIA_DISABLED};
use morph_a11y::FocusTrap;
use morph_dom::{CustomEvent, Document, EventDetail, NodeId, ScrollPosition, SimpleSelector};

/// Return the element's id, assigning `{prefix}-{group}-{item}` when it
/// has none. An existing id is never overwritten; a generated id that is
/// already taken gets a numeric suffix.
pub fn ensure_id(doc: &mut Document, node: NodeId, prefix: &str, group: usize, item: usize) -> String {
    if let Some(id) = doc.element(node).and_then(|e| e.id()) {
        return id.to_string();
    }

    let base = format!("{prefix}-{group}-{item}");
    let mut id = base.clone();
    let mut n = 1;
    while doc.get_element_by_id(&id).is_some() {
        n += 1;
        id = format!("{base}-{n}");
    }
    doc.set_attr(node, "id", &id);
    id
}

/// `root` (when it matches) followed by every matching descendant
pub fn query_inclusive(doc: &Document, root: NodeId, selector: &SimpleSelector) -> Vec<NodeId> {
    let tree = doc.tree();
    let mut found = Vec::new();
    if tree.matches(root, selector) {
        found.push(root);
    }
    found.extend(tree.query_all(root, selector));
    found
}

/// `disabled` attribute or `aria-disabled="true"`
pub fn is_disabled(doc: &Document, node: NodeId) -> bool {
    doc.has_attr(node, "disabled") || parse_bool(doc.attr(node, ARIA_DISABLED))
}

/// Emit a bubbling, non-cancelable custom event
pub fn dispatch(doc: &mut Document, target: NodeId, name: &str, detail: EventDetail) {
    tracing::debug!(event = name, %target, "dispatch");
    doc.dispatch_event(CustomEvent::new(name, target, detail));
}

/// Focus trap for `container`, or `None` (with a warning) when nothing
/// inside can take focus
pub fn trap_focus(doc: &Document, container: NodeId) -> Option<FocusTrap> {
    match FocusTrap::new(doc.tree(), container) {
        Ok(trap) => Some(trap),
        Err(err) => {
            tracing::warn!(error = %err, "focus trap not installed");
            None
        }
    }
}

const LOCK_STYLES: [&str; 3] = ["position", "top", "width"];

#[derive(Debug)]
struct Saved {
    scroll: ScrollPosition,
    styles: Vec<(&'static str, Option<String>)>,
}

/// Reference-counted body scroll lock.
///
/// Only the 0 -> 1 and 1 -> 0 transitions touch the document. Locking
/// pins the body with `position: fixed` offset by the current scroll
/// position; unlocking restores the previous inline styles and the exact
/// scroll offset.
#[derive(Debug, Default)]
pub struct ScrollLock {
    count: usize,
    saved: Option<Saved>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a lock; returns true when this call locked the body
    pub fn acquire(&mut self, doc: &mut Document) -> bool {
        self.count += 1;
        if self.count > 1 {
            return false;
        }

        let body = doc.body();
        let scroll = doc.scroll_position();
        let styles = LOCK_STYLES
            .iter()
            .map(|&p| (p, doc.style(body, p).map(str::to_owned)))
            .collect();
        self.saved = Some(Saved { scroll, styles });

        doc.set_style(body, "position", "fixed");
        doc.set_style(body, "top", &format!("-{}px", scroll.y));
        doc.set_style(body, "width", "100%");
        doc.scroll_to(0.0, 0.0);
        tracing::debug!(y = scroll.y, "scroll locked");
        true
    }

    /// Drop a lock; returns true when this call unlocked the body
    pub fn release(&mut self, doc: &mut Document) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        if self.count > 0 {
            return false;
        }

        let Some(saved) = self.saved.take() else {
            return false;
        };
        let body = doc.body();
        for (property, value) in saved.styles {
            match value {
                Some(v) => doc.set_style(body, property, &v),
                None => doc.remove_style(body, property),
            }
        }
        doc.scroll_to(saved.scroll.x, saved.scroll.y);
        tracing::debug!(y = saved.scroll.y, "scroll unlocked");
        true
    }

    pub fn is_locked(&self) -> bool {
        self.count > 0
    }

    /// Active lock holders
    pub fn count(&self) -> usize {
        self.count
    }
}

/// First-write journal of attribute mutations.
///
/// Every write through the journal remembers the attribute's value from
/// before the first write, so `restore` puts the markup back exactly.
#[derive(Debug, Default)]
pub struct AttrJournal {
    originals: Vec<(NodeId, String, Option<String>)>,
}

impl AttrJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, doc: &Document, node: NodeId, name: &str) {
        if self.originals.iter().any(|(n, a, _)| *n == node && a == name) {
            return;
        }
        let original = doc.attr(node, name).map(str::to_owned);
        self.originals.push((node, name.to_string(), original));
    }

    pub fn set(&mut self, doc: &mut Document, node: NodeId, name: &str, value: &str) {
        self.record(doc, node, name);
        doc.set_attr(node, name, value);
    }

    /// Set only when the attribute is absent; returns whether it was set
    pub fn set_if_missing(&mut self, doc: &mut Document, node: NodeId, name: &str, value: &str) -> bool {
        if doc.has_attr(node, name) {
            return false;
        }
        self.set(doc, node, name, value);
        true
    }

    pub fn remove(&mut self, doc: &mut Document, node: NodeId, name: &str) {
        self.record(doc, node, name);
        doc.remove_attr(node, name);
    }

    /// Toggle the `hidden` flag
    pub fn set_hidden(&mut self, doc: &mut Document, node: NodeId, hidden: bool) {
        self.record(doc, node, "hidden");
        doc.set_hidden(node, hidden);
    }

    /// Put every journaled attribute back and forget it
    pub fn restore(&mut self, doc: &mut Document) {
        for (node, name, original) in self.originals.drain(..) {
            put_back(doc, node, &name, original);
        }
    }

    /// Restore only the attributes of `nodes`
    pub fn restore_nodes(&mut self, doc: &mut Document, nodes: &[NodeId]) {
        let (mine, rest) = std::mem::take(&mut self.originals)
            .into_iter()
            .partition(|(n, _, _)| nodes.contains(n));
        self.originals = rest;
        let mine: Vec<(NodeId, String, Option<String>)> = mine;
        for (node, name, original) in mine {
            put_back(doc, node, &name, original);
        }
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}

fn put_back(doc: &mut Document, node: NodeId, name: &str, original: Option<String>) {
    match original {
        Some(value) => {
            doc.set_attr(node, name, &value);
        }
        None => {
            doc.remove_attr(node, name);
        }
    }
}
