//! Host
//!
//! The document plus the state controllers share: the body scroll lock,
//! the overlay stack and the timer queue.

use morph_dom::{Document, EventType, ListenerHandle, NodeId, TimerQueue};

use crate::util::ScrollLock;

/// Deferred work scheduled on the host clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostTask {
    /// Resize debounce elapsed
    ResizeSettled { owner: &'static str },
    /// Remove a cosmetic class added by a static-backdrop click
    ShakeReset {
        owner: &'static str,
        node: NodeId,
        class: String,
    },
}

impl HostTask {
    /// Controller the task belongs to
    pub fn owner(&self) -> &'static str {
        match self {
            Self::ResizeSettled { owner } | Self::ShakeReset { owner, .. } => *owner,
        }
    }
}

/// Open overlay record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    pub owner: &'static str,
    pub id: String,
}

/// Open overlays in opening order; the last entry is the top
#[derive(Debug, Default)]
pub struct OverlayStack {
    entries: Vec<OverlayEntry>,
}

impl OverlayStack {
    pub fn push(&mut self, owner: &'static str, id: &str) {
        self.remove(owner, id);
        self.entries.push(OverlayEntry {
            owner,
            id: id.to_string(),
        });
    }

    pub fn remove(&mut self, owner: &str, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !(e.owner == owner && e.id == id));
        self.entries.len() != before
    }

    /// Most recently opened overlay
    pub fn top(&self) -> Option<&OverlayEntry> {
        self.entries.last()
    }

    pub fn contains(&self, owner: &str, id: &str) -> bool {
        self.entries.iter().any(|e| e.owner == owner && e.id == id)
    }

    /// Ids opened by `owner`, oldest first
    pub fn ids_for(&self, owner: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.owner == owner)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Host environment every controller operates on
#[derive(Debug)]
pub struct Host {
    pub document: Document,
    pub scroll_lock: ScrollLock,
    pub overlays: OverlayStack,
    pub timers: TimerQueue<HostTask>,
}

impl Host {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            scroll_lock: ScrollLock::new(),
            overlays: OverlayStack::default(),
            timers: TimerQueue::new(),
        }
    }

    /// Attach a listener and return its handle
    pub fn listen(&mut self, owner: &'static str, target: NodeId, event_type: EventType) -> ListenerHandle {
        self.document.listeners_mut().add(owner, target, event_type)
    }

    /// Detach every handle in `handles`, leaving it empty
    pub fn unlisten(&mut self, handles: &mut Vec<ListenerHandle>) {
        for handle in handles.drain(..) {
            self.document.listeners_mut().remove(handle);
        }
    }
}
