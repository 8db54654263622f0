//! Focus Management
//!
//! Focusable-element computation and Tab cycling inside a container.

use morph_dom::{DomTree, ElementData, NodeId};

use crate::A11yError;

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    NotFocusable,       // tabindex="-1" or unparsable
    Sequential(i32),    // tabindex="0" or positive
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::NotFocusable,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::NotFocusable,
        }
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

fn natively_focusable(elem: &ElementData) -> bool {
    match elem.tag.as_str() {
        "a" => elem.has_attr("href"),
        "input" => !elem.has_attr("disabled") && elem.get_attr("type") != Some("hidden"),
        "button" | "select" | "textarea" => !elem.has_attr("disabled"),
        _ => false,
    }
}

/// Whether an element takes part in sequential focus navigation.
///
/// An explicit `tabindex` wins over the element's native behaviour.
pub fn is_focusable(tree: &DomTree, node: NodeId) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };
    match elem.get_attr("tabindex") {
        Some(value) => TabIndex::parse(value).is_focusable(),
        None => natively_focusable(elem),
    }
}

/// Focusable descendants of `container` in document order, skipping
/// anything inside a `hidden` subtree
pub fn focusable_descendants(tree: &DomTree, container: NodeId) -> Vec<NodeId> {
    tree.descendants(container)
        .into_iter()
        .filter(|&node| is_focusable(tree, node))
        .filter(|&node| {
            !tree
                .ancestors(node)
                .take_while(|&a| a != container)
                .any(|a| tree.element(a).is_some_and(|e| e.has_attr("hidden")))
        })
        .collect()
}

/// Tab/Shift+Tab cycle confined to a container
#[derive(Debug, Clone)]
pub struct FocusTrap {
    container: NodeId,
    elements: Vec<NodeId>,
}

impl FocusTrap {
    /// Compute the trap for `container`; fails when nothing inside can take focus
    pub fn new(tree: &DomTree, container: NodeId) -> Result<Self, A11yError> {
        let elements = focusable_descendants(tree, container);
        if elements.is_empty() {
            return Err(A11yError::NoFocusable(container));
        }
        Ok(Self { container, elements })
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn first(&self) -> NodeId {
        self.elements[0]
    }

    pub fn last(&self) -> NodeId {
        self.elements[self.elements.len() - 1]
    }

    /// Where Tab (or Shift+Tab) moves focus from `active`.
    ///
    /// Wraps at both ends. Focus outside the trap re-enters at the
    /// first element (last for Shift+Tab).
    pub fn step(&self, active: Option<NodeId>, shift: bool) -> NodeId {
        let len = self.elements.len();
        match active.and_then(|a| self.elements.iter().position(|&e| e == a)) {
            Some(pos) if shift => self.elements[(pos + len - 1) % len],
            Some(pos) => self.elements[(pos + 1) % len],
            None if shift => self.last(),
            None => self.first(),
        }
    }
}
