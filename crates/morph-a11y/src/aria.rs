//! ARIA Support
//!
//! The roles and state attributes disclosure widgets project onto markup.

pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const ARIA_SELECTED: &str = "aria-selected";
pub const ARIA_HIDDEN: &str = "aria-hidden";
pub const ARIA_CONTROLS: &str = "aria-controls";
pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
pub const ARIA_LABEL: &str = "aria-label";
pub const ARIA_MODAL: &str = "aria-modal";
pub const ARIA_DISABLED: &str = "aria-disabled";
pub const ROLE: &str = "role";
pub const TABINDEX: &str = "tabindex";

/// Roles the widgets assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Dialog,
    Region,
    Tab,
    TabList,
    TabPanel,
}

impl AriaRole {
    /// Attribute value for `role`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::Region => "region",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
        }
    }
}

impl std::fmt::Display for AriaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read an ARIA boolean (`"true"` is the only true value)
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Serialize an ARIA boolean
pub fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
