//! Morph Accessibility
//!
//! Accessibility helpers for the Morph widgets.
//!
//! Features:
//! - ARIA roles and attribute names
//! - Focusable-element computation and focus traps
//! - Keyboard navigation (roving index)

pub mod aria;
pub mod focus;
pub mod keyboard;

pub use aria::AriaRole;
pub use focus::{focusable_descendants, is_focusable, FocusTrap, TabIndex};
pub use keyboard::{roving_target, Key, Orientation};

use morph_dom::NodeId;

/// Accessibility error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum A11yError {
    #[error("No focusable elements inside {0}")]
    NoFocusable(NodeId),
}
