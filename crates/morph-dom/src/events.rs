//! DOM Events
//!
//! Native UI events fed in by the host, and custom events emitted by
//! widgets for outside observers.

use crate::NodeId;

/// Native event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    KeyDown,
    KeyUp,
    MouseEnter,
    MouseLeave,
    Focus,
    Blur,
    Input,
    Resize,
}

impl EventType {
    /// Check if this event type can bubble
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            EventType::Focus
                | EventType::Blur
                | EventType::MouseEnter
                | EventType::MouseLeave
                | EventType::Resize
        )
    }

    /// Check if listeners may cancel the default action
    pub fn cancelable(&self) -> bool {
        matches!(self, EventType::Click | EventType::KeyDown | EventType::KeyUp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Input => "input",
            Self::Resize => "resize",
        }
    }
}

/// Native UI event
#[derive(Debug, Clone)]
pub struct UiEvent {
    pub event_type: EventType,
    pub target: NodeId,
    /// `KeyboardEvent.key` for key events
    pub key: Option<String>,
    pub shift_key: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl UiEvent {
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            key: None,
            shift_key: false,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventType::Click, target)
    }

    pub fn key_down(target: NodeId, key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::new(EventType::KeyDown, target)
        }
    }

    pub fn mouse_enter(target: NodeId) -> Self {
        Self::new(EventType::MouseEnter, target)
    }

    pub fn mouse_leave(target: NodeId) -> Self {
        Self::new(EventType::MouseLeave, target)
    }

    pub fn focus(target: NodeId) -> Self {
        Self::new(EventType::Focus, target)
    }

    pub fn blur(target: NodeId) -> Self {
        Self::new(EventType::Blur, target)
    }

    pub fn input(target: NodeId) -> Self {
        Self::new(EventType::Input, target)
    }

    /// Window resize, targeted at the document root
    pub fn resize() -> Self {
        Self::new(EventType::Resize, NodeId::ROOT)
    }

    /// Set the shift modifier
    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.event_type.cancelable() {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Payload carried by a widget custom event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetail {
    pub trigger: Option<NodeId>,
    pub panel: Option<NodeId>,
    pub index: Option<usize>,
    /// Overlay id for modal/drawer events
    pub id: Option<String>,
}

/// Custom event (`accordion:open`, `tabs:change`, ...)
///
/// Always bubbling and never cancelable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEvent {
    pub name: String,
    pub target: NodeId,
    pub detail: EventDetail,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl CustomEvent {
    pub fn new(name: &str, target: NodeId, detail: EventDetail) -> Self {
        Self {
            name: name.to_string(),
            target,
            detail,
            bubbles: true,
            cancelable: false,
        }
    }
}
