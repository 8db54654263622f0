//! Morph DOM - Document Object Model
//!
//! Arena-backed DOM tree plus the host surface the widget controllers
//! run against: focus, scroll offset, viewport, layout rects, native
//! and custom events, listener handles and a virtual timer queue.

mod node;
mod tree;
mod document;
mod selector;
mod classlist;
mod geometry;
mod events;
mod listeners;
mod timers;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Ancestors};
pub use document::{Document, ObserverId, ScrollPosition, Viewport, DISPATCH_LOG_LIMIT};
pub use selector::{SimpleSelector, SelectorError};
pub use classlist::DOMTokenList;
pub use geometry::DOMRect;
pub use events::{EventType, UiEvent, CustomEvent, EventDetail};
pub use listeners::{ListenerRegistry, ListenerHandle, Listener};
pub use timers::{TimerQueue, TimerId};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Arena index
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
