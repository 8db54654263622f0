//! Widget Configuration
//!
//! Option structs default to the Morph theme's class names and data
//! attributes. A host may override any subset of them from JSON.

use serde::{Deserialize, Deserializer};

use crate::positioning::{Offset, Placement};
use crate::WidgetError;

/// Accordion options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccordionOptions {
    /// Group containers; the attribute also carries the mode
    pub container_attr: String,
    pub item_selector: String,
    pub trigger_selector: String,
    pub panel_selector: String,
    pub trigger_id_prefix: String,
    pub panel_id_prefix: String,
    /// Arrow/Home/End focus movement between triggers
    pub keyboard_nav: bool,
}

impl Default for AccordionOptions {
    fn default() -> Self {
        Self {
            container_attr: "data-accordion".into(),
            item_selector: ".accordion__item".into(),
            trigger_selector: ".accordion__item-trigger".into(),
            panel_selector: ".accordion__item-content".into(),
            trigger_id_prefix: "accordion-trigger".into(),
            panel_id_prefix: "accordion-content".into(),
            keyboard_nav: true,
        }
    }
}

/// Tabs options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TabsOptions {
    pub selector: String,
    pub list_selector: String,
    pub trigger_selector: String,
    pub panel_selector: String,
    pub trigger_id_prefix: String,
    pub panel_id_prefix: String,
    pub keyboard_nav: bool,
}

impl Default for TabsOptions {
    fn default() -> Self {
        Self {
            selector: ".tabs".into(),
            list_selector: ".tabs__list".into(),
            trigger_selector: ".tabs__trigger".into(),
            panel_selector: ".tabs__panel".into(),
            trigger_id_prefix: "tabs-trigger".into(),
            panel_id_prefix: "tabs-panel".into(),
            keyboard_nav: true,
        }
    }
}

/// Overlay variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Modal,
    Drawer,
}

impl OverlayKind {
    /// Listener owner and event-name prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modal => "modal",
            Self::Drawer => "drawer",
        }
    }
}

/// Modal/drawer options
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    pub kind: OverlayKind,
    pub selector: String,
    pub backdrop_selector: String,
    pub target_attr: String,
    pub toggle_attr: String,
    pub show_attr: String,
    pub hide_attr: String,
    pub state_attr: String,
    pub backdrop_attr: String,
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
    pub lock_scroll: bool,
    pub return_focus: bool,
    /// Confine Tab to the overlay; otherwise focus moves softly
    pub trap_focus: bool,
    /// Set `aria-modal="true"` when missing
    pub aria_modal: bool,
    /// Close every open overlay once the viewport is at least this wide
    pub close_above_width: Option<f64>,
    pub resize_debounce_ms: u64,
    pub shake_class: String,
    pub shake_ms: u64,
}

impl OverlayOptions {
    fn preset(kind: OverlayKind) -> Self {
        let k = kind.as_str();
        Self {
            kind,
            selector: format!(".{k}"),
            backdrop_selector: format!(".{k}__backdrop"),
            target_attr: format!("data-{k}-target"),
            toggle_attr: format!("data-{k}-toggle"),
            show_attr: format!("data-{k}-show"),
            hide_attr: format!("data-{k}-hide"),
            state_attr: format!("data-{k}-state"),
            backdrop_attr: format!("data-{k}-backdrop"),
            close_on_backdrop: true,
            close_on_escape: true,
            lock_scroll: true,
            return_focus: true,
            trap_focus: kind == OverlayKind::Modal,
            aria_modal: kind == OverlayKind::Modal,
            close_above_width: Some(768.0),
            resize_debounce_ms: 250,
            shake_class: format!("{k}--shake"),
            shake_ms: 500,
        }
    }

    pub fn modal() -> Self {
        Self::preset(OverlayKind::Modal)
    }

    pub fn drawer() -> Self {
        Self::preset(OverlayKind::Drawer)
    }
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self::modal()
    }
}

/// Floating variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatingKind {
    /// Click toggles; one open at a time; outside click closes
    Dropdown,
    /// Hover/focus shows, leave/blur hides
    Tooltip,
}

impl FloatingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dropdown => "dropdown",
            Self::Tooltip => "tooltip",
        }
    }
}

/// Dropdown/tooltip options
#[derive(Debug, Clone)]
pub struct FloatingOptions {
    pub kind: FloatingKind,
    pub target_attr: String,
    pub placement_attr: String,
    pub offset_attr: String,
    /// Presentation flag toggled on the panel
    pub shown_attr: String,
    pub placement: Placement,
    pub offset: Offset,
    pub flip: bool,
    pub fallbacks: Vec<Placement>,
    pub padding: f64,
    /// Panel `min-width` follows the trigger width
    pub same_width: bool,
    pub prevent_overflow: bool,
}

impl FloatingOptions {
    fn preset(kind: FloatingKind) -> Self {
        let k = kind.as_str();
        let dropdown = kind == FloatingKind::Dropdown;
        Self {
            kind,
            target_attr: format!("data-{k}-target"),
            placement_attr: format!("data-{k}-placement"),
            offset_attr: format!("data-{k}-offset"),
            shown_attr: "data-show".into(),
            placement: if dropdown { Placement::BOTTOM_START } else { Placement::TOP },
            offset: Offset::new(0.0, 8.0),
            flip: !dropdown,
            fallbacks: if dropdown {
                Vec::new()
            } else {
                vec![Placement::TOP, Placement::BOTTOM, Placement::LEFT, Placement::RIGHT]
            },
            padding: 8.0,
            same_width: dropdown,
            prevent_overflow: !dropdown,
        }
    }

    pub fn dropdown() -> Self {
        Self::preset(FloatingKind::Dropdown)
    }

    pub fn tooltip() -> Self {
        Self::preset(FloatingKind::Tooltip)
    }
}

/// Text input affordance options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextInputOptions {
    pub wrapper_selector: String,
    pub input_selector: String,
    pub action_selector: String,
    pub clear_selector: String,
    pub password_toggle_selector: String,
    pub show_password_label: String,
    pub hide_password_label: String,
    /// Sprite symbol while the password is masked
    pub icon_masked: String,
    /// Sprite symbol while the password is visible
    pub icon_revealed: String,
}

impl Default for TextInputOptions {
    fn default() -> Self {
        Self {
            wrapper_selector: ".input-text".into(),
            input_selector: ".input-text__input".into(),
            action_selector: ".input-text__action".into(),
            clear_selector: "[data-clear-input]".into(),
            password_toggle_selector: "[data-toggle-password]".into(),
            show_password_label: "Show password".into(),
            hide_password_label: "Hide password".into(),
            icon_masked: "icon-eye-regular".into(),
            icon_revealed: "icon-eye-off-regular".into(),
        }
    }
}

/// Options for every controller the runtime owns
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub accordion: AccordionOptions,
    pub tabs: TabsOptions,
    #[serde(deserialize_with = "modal_options")]
    pub modal: OverlayOptions,
    #[serde(deserialize_with = "drawer_options")]
    pub drawer: OverlayOptions,
    #[serde(deserialize_with = "dropdown_options")]
    pub dropdown: FloatingOptions,
    #[serde(deserialize_with = "tooltip_options")]
    pub tooltip: FloatingOptions,
    pub text_input: TextInputOptions,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            accordion: AccordionOptions::default(),
            tabs: TabsOptions::default(),
            modal: OverlayOptions::modal(),
            drawer: OverlayOptions::drawer(),
            dropdown: FloatingOptions::dropdown(),
            tooltip: FloatingOptions::tooltip(),
            text_input: TextInputOptions::default(),
        }
    }
}

impl WidgetConfig {
    /// Load a (partial) JSON config; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, WidgetError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Overrides applied on top of an overlay preset
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OverlayPatch {
    selector: Option<String>,
    backdrop_selector: Option<String>,
    target_attr: Option<String>,
    toggle_attr: Option<String>,
    show_attr: Option<String>,
    hide_attr: Option<String>,
    state_attr: Option<String>,
    backdrop_attr: Option<String>,
    close_on_backdrop: Option<bool>,
    close_on_escape: Option<bool>,
    lock_scroll: Option<bool>,
    return_focus: Option<bool>,
    trap_focus: Option<bool>,
    aria_modal: Option<bool>,
    /// `null` disables the breakpoint, absence keeps the preset
    #[serde(deserialize_with = "present")]
    close_above_width: Option<Option<f64>>,
    resize_debounce_ms: Option<u64>,
    shake_class: Option<String>,
    shake_ms: Option<u64>,
}

impl OverlayPatch {
    fn apply(self, mut base: OverlayOptions) -> OverlayOptions {
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field { base.$field = v; })*
            };
        }
        merge!(
            selector, backdrop_selector, target_attr, toggle_attr, show_attr, hide_attr,
            state_attr, backdrop_attr, close_on_backdrop, close_on_escape, lock_scroll,
            return_focus, trap_focus, aria_modal, close_above_width, resize_debounce_ms,
            shake_class, shake_ms
        );
        base
    }
}

/// Overrides applied on top of a floating preset
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FloatingPatch {
    target_attr: Option<String>,
    placement_attr: Option<String>,
    offset_attr: Option<String>,
    shown_attr: Option<String>,
    placement: Option<Placement>,
    offset: Option<Offset>,
    flip: Option<bool>,
    fallbacks: Option<Vec<Placement>>,
    padding: Option<f64>,
    same_width: Option<bool>,
    prevent_overflow: Option<bool>,
}

impl FloatingPatch {
    fn apply(self, mut base: FloatingOptions) -> FloatingOptions {
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field { base.$field = v; })*
            };
        }
        merge!(
            target_attr, placement_attr, offset_attr, shown_attr, placement, offset, flip,
            fallbacks, padding, same_width, prevent_overflow
        );
        base
    }
}

fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<f64>>, D::Error> {
    Ok(Some(Option::deserialize(d)?))
}

fn modal_options<'de, D: Deserializer<'de>>(d: D) -> Result<OverlayOptions, D::Error> {
    Ok(OverlayPatch::deserialize(d)?.apply(OverlayOptions::modal()))
}

fn drawer_options<'de, D: Deserializer<'de>>(d: D) -> Result<OverlayOptions, D::Error> {
    Ok(OverlayPatch::deserialize(d)?.apply(OverlayOptions::drawer()))
}

fn dropdown_options<'de, D: Deserializer<'de>>(d: D) -> Result<FloatingOptions, D::Error> {
    Ok(FloatingPatch::deserialize(d)?.apply(FloatingOptions::dropdown()))
}

fn tooltip_options<'de, D: Deserializer<'de>>(d: D) -> Result<FloatingOptions, D::Error> {
    Ok(FloatingPatch::deserialize(d)?.apply(FloatingOptions::tooltip()))
}
