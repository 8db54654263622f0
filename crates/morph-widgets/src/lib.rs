//! Morph Widgets
//!
//! Disclosure widgets layered onto server-rendered markup:
//! accordion, tabs, modal, drawer, dropdown, tooltip and text-input
//! affordances.
//!
//! Every controller follows the same model. `initialize` scans a root
//! for groups, derives the initial state from markup and attaches
//! delegated listeners through the host. Operations mutate an in-memory
//! item/group model and project it back onto ARIA attributes and the
//! `hidden` flag. `destroy` detaches every listener by handle and
//! restores the attributes it touched.

pub mod accordion;
pub mod config;
pub mod disclosure;
pub mod floating;
pub mod host;
pub mod overlay;
pub mod positioning;
pub mod runtime;
pub mod tabs;
pub mod text_input;
pub mod util;

pub use accordion::AccordionController;
pub use config::{
    AccordionOptions, FloatingKind, FloatingOptions, OverlayKind, OverlayOptions, TabsOptions,
    TextInputOptions, WidgetConfig,
};
pub use disclosure::{Group, GroupMode, GroupRegistry, Item, ItemState, Transition};
pub use floating::FloatingController;
pub use host::{Host, HostTask, OverlayEntry, OverlayStack};
pub use overlay::OverlayController;
pub use positioning::{
    Alignment, ComputedPosition, FloatingSession, Offset, Placement, PlacementEngine,
    PlacementOptions, Side, ViewportEngine,
};
pub use runtime::{Controller, WidgetRuntime};
pub use tabs::TabsController;
pub use text_input::TextInputController;
pub use util::{AttrJournal, ScrollLock};

use morph_dom::{NodeId, SelectorError};

/// Widget configuration defect
///
/// Scans log these at `warn` and skip the offending item or group.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("{kind} element {node} has no id")]
    MissingId { kind: &'static str, node: NodeId },

    #[error("{kind} trigger {node} has an empty {attr}")]
    MissingTarget {
        kind: &'static str,
        node: NodeId,
        attr: String,
    },

    #[error("{kind} target #{id} not found")]
    UnresolvedTarget { kind: &'static str, id: String },

    #[error("{kind} {container} has no {part}")]
    MissingPart {
        kind: &'static str,
        container: NodeId,
        part: String,
    },

    #[error("{kind} {container} has {triggers} triggers but {panels} panels")]
    CountMismatch {
        kind: &'static str,
        container: NodeId,
        triggers: usize,
        panels: usize,
    },

    #[error("unknown {kind}: {id}")]
    UnknownOverlay { kind: &'static str, id: String },

    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("invalid offset: {0}")]
    InvalidOffset(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("invalid widget config: {0}")]
    Config(#[from] serde_json::Error),
}
