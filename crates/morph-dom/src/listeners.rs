//! Listener registry
//!
//! Every listener is identified by the handle returned when it was
//! attached; removal goes through that exact handle.

use crate::{EventType, NodeId};

/// Handle of an attached listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

/// Attached listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub handle: ListenerHandle,
    /// Controller that receives the event
    pub owner: &'static str,
    pub target: NodeId,
    pub event_type: EventType,
}

/// Listeners in registration order
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_handle: u64,
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. Duplicate (owner, target, type) triples are
    /// coalesced and return the existing handle.
    pub fn add(&mut self, owner: &'static str, target: NodeId, event_type: EventType) -> ListenerHandle {
        if let Some(existing) = self
            .listeners
            .iter()
            .find(|l| l.owner == owner && l.target == target && l.event_type == event_type)
        {
            return existing.handle;
        }

        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        self.listeners.push(Listener {
            handle,
            owner,
            target,
            event_type,
        });
        handle
    }

    /// Detach by handle
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.handle != handle);
        self.listeners.len() != before
    }

    pub fn contains(&self, handle: ListenerHandle) -> bool {
        self.listeners.iter().any(|l| l.handle == handle)
    }

    /// Listeners on `target` for `event_type`, in registration order
    pub fn at(&self, target: NodeId, event_type: EventType) -> impl Iterator<Item = &Listener> {
        self.listeners
            .iter()
            .filter(move |l| l.target == target && l.event_type == event_type)
    }

    /// Number of listeners attached by `owner`
    pub fn count_for(&self, owner: &str) -> usize {
        self.listeners.iter().filter(|l| l.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
