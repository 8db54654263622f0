//! Positioning adapter
//!
//! Places a floating panel relative to its trigger inside the viewport.
//! The arithmetic lives behind [`PlacementEngine`]; a [`FloatingSession`]
//! binds one trigger/panel pair to an engine and writes the result as
//! inline styles on `recompute`.

use std::fmt;
use std::str::FromStr;

use morph_dom::{DOMRect, Document, NodeId};
use serde::Deserialize;

use crate::WidgetError;

/// Side of the trigger the panel sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Alignment along the trigger edge; `None` centers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    End,
}

/// Preferred placement such as `bottom-start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Placement {
    pub side: Side,
    pub alignment: Option<Alignment>,
}

impl Placement {
    pub const TOP: Placement = Placement::new(Side::Top, None);
    pub const BOTTOM: Placement = Placement::new(Side::Bottom, None);
    pub const LEFT: Placement = Placement::new(Side::Left, None);
    pub const RIGHT: Placement = Placement::new(Side::Right, None);
    pub const BOTTOM_START: Placement = Placement::new(Side::Bottom, Some(Alignment::Start));

    pub const fn new(side: Side, alignment: Option<Alignment>) -> Self {
        Self { side, alignment }
    }

    pub fn parse(s: &str) -> Result<Self, WidgetError> {
        let s = s.trim().to_ascii_lowercase();
        let (side, align) = match s.split_once('-') {
            Some((side, align)) => (side, Some(align)),
            None => (s.as_str(), None),
        };
        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            _ => return Err(WidgetError::InvalidPlacement(s.clone())),
        };
        let alignment = match align {
            None => None,
            Some("start") => Some(Alignment::Start),
            Some("end") => Some(Alignment::End),
            Some(_) => return Err(WidgetError::InvalidPlacement(s.clone())),
        };
        Ok(Self { side, alignment })
    }

    fn is_vertical(&self) -> bool {
        matches!(self.side, Side::Top | Side::Bottom)
    }
}

impl FromStr for Placement {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Placement {
    type Error = WidgetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        };
        match self.alignment {
            None => f.write_str(side),
            Some(Alignment::Start) => write!(f, "{side}-start"),
            Some(Alignment::End) => write!(f, "{side}-end"),
        }
    }
}

/// Pixel offset: `skidding` along the trigger edge, `distance` away from it
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct Offset {
    pub skidding: f64,
    pub distance: f64,
}

impl Offset {
    pub const fn new(skidding: f64, distance: f64) -> Self {
        Self { skidding, distance }
    }

    /// Parse an `"x,y"` pixel pair; each part is read up to its first
    /// non-digit, so `"0,8px"` is accepted
    pub fn parse(s: &str) -> Result<Self, WidgetError> {
        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [x, y] => match (leading_int(x), leading_int(y)) {
                (Some(x), Some(y)) => Ok(Self::new(x as f64, y as f64)),
                _ => Err(WidgetError::InvalidOffset(s.to_string())),
            },
            _ => Err(WidgetError::InvalidOffset(s.to_string())),
        }
    }
}

/// Optional sign followed by at least one digit, after leading whitespace
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let end = s.len() - unsigned.len() + digits;
    s[..end].parse().ok()
}

impl From<[f64; 2]> for Offset {
    fn from([skidding, distance]: [f64; 2]) -> Self {
        Self::new(skidding, distance)
    }
}

/// Inputs to one placement computation
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOptions {
    pub placement: Placement,
    pub offset: Offset,
    /// Try `fallbacks` when the preferred placement overflows
    pub flip: bool,
    pub fallbacks: Vec<Placement>,
    /// Viewport inset used by flip and overflow checks
    pub padding: f64,
    pub same_width: bool,
    /// Shift along the trigger edge to stay inside the viewport
    pub prevent_overflow: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            placement: Placement::BOTTOM,
            offset: Offset::new(0.0, 8.0),
            flip: false,
            fallbacks: Vec::new(),
            padding: 0.0,
            same_width: false,
            prevent_overflow: false,
        }
    }
}

/// Result of a placement computation, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedPosition {
    pub x: f64,
    pub y: f64,
    /// Placement actually used after flipping
    pub placement: Placement,
    pub min_width: Option<f64>,
}

/// Floating-position service
pub trait PlacementEngine {
    fn compute(
        &self,
        reference: DOMRect,
        floating: DOMRect,
        boundary: DOMRect,
        options: &PlacementOptions,
    ) -> ComputedPosition;
}

/// Default engine: side/alignment arithmetic, flip, and overflow shift
/// against the viewport rectangle
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportEngine;

impl ViewportEngine {
    fn place(reference: &DOMRect, floating: &DOMRect, placement: Placement, offset: Offset) -> DOMRect {
        let (w, h) = (floating.width, floating.height);
        let (x, y);

        if placement.is_vertical() {
            x = match placement.alignment {
                None => reference.x + reference.width / 2.0 - w / 2.0,
                Some(Alignment::Start) => reference.x,
                Some(Alignment::End) => reference.right() - w,
            } + offset.skidding;
            y = match placement.side {
                Side::Top => reference.top() - h - offset.distance,
                _ => reference.bottom() + offset.distance,
            };
        } else {
            y = match placement.alignment {
                None => reference.y + reference.height / 2.0 - h / 2.0,
                Some(Alignment::Start) => reference.y,
                Some(Alignment::End) => reference.bottom() - h,
            } + offset.skidding;
            x = match placement.side {
                Side::Left => reference.left() - w - offset.distance,
                _ => reference.right() + offset.distance,
            };
        }

        DOMRect::from_xywh(x, y, w, h)
    }
}

fn inset(rect: DOMRect, padding: f64) -> DOMRect {
    DOMRect::from_xywh(
        rect.x + padding,
        rect.y + padding,
        (rect.width - 2.0 * padding).max(0.0),
        (rect.height - 2.0 * padding).max(0.0),
    )
}

impl PlacementEngine for ViewportEngine {
    fn compute(
        &self,
        reference: DOMRect,
        mut floating: DOMRect,
        boundary: DOMRect,
        options: &PlacementOptions,
    ) -> ComputedPosition {
        let min_width = options.same_width.then_some(reference.width);
        if let Some(min) = min_width {
            floating.width = floating.width.max(min);
        }

        let bounds = inset(boundary, options.padding);
        let mut placement = options.placement;
        let mut rect = Self::place(&reference, &floating, placement, options.offset);

        if options.flip && !bounds.contains_rect(&rect) {
            let fitting = options
                .fallbacks
                .iter()
                .filter(|&&p| p != options.placement)
                .map(|&p| (p, Self::place(&reference, &floating, p, options.offset)))
                .find(|(_, r)| bounds.contains_rect(r));
            if let Some((p, r)) = fitting {
                placement = p;
                rect = r;
            }
        }

        if options.prevent_overflow {
            if placement.is_vertical() {
                let max = (bounds.right() - rect.width).max(bounds.left());
                rect.x = rect.x.max(bounds.left()).min(max);
            } else {
                let max = (bounds.bottom() - rect.height).max(bounds.top());
                rect.y = rect.y.max(bounds.top()).min(max);
            }
        }

        ComputedPosition {
            x: rect.x,
            y: rect.y,
            placement,
            min_width,
        }
    }
}

const SESSION_STYLES: [&str; 5] = ["position", "left", "top", "transform", "min-width"];

/// Live positioning of one panel against one trigger
#[derive(Debug, Clone)]
pub struct FloatingSession {
    reference: NodeId,
    floating: NodeId,
    options: PlacementOptions,
    last: Option<ComputedPosition>,
}

impl FloatingSession {
    pub fn new(reference: NodeId, floating: NodeId, options: PlacementOptions) -> Self {
        Self {
            reference,
            floating,
            options,
            last: None,
        }
    }

    pub fn options(&self) -> &PlacementOptions {
        &self.options
    }

    /// Position from the most recent `recompute`
    pub fn last(&self) -> Option<ComputedPosition> {
        self.last
    }

    /// Measure both elements, compute the placement and write it to the
    /// panel's inline style
    pub fn recompute(&mut self, doc: &mut Document, engine: &dyn PlacementEngine) -> ComputedPosition {
        let reference = doc.bounding_rect(self.reference);
        let floating = doc.bounding_rect(self.floating);
        let pos = engine.compute(reference, floating, doc.viewport().rect(), &self.options);

        // absolute positioning is relative to the page, not the viewport
        let scroll = doc.scroll_position();
        let panel = self.floating;
        doc.set_style(panel, "position", "absolute");
        doc.set_style(panel, "left", "0");
        doc.set_style(panel, "top", "0");
        doc.set_style(
            panel,
            "transform",
            &format!("translate({}px, {}px)", pos.x + scroll.x, pos.y + scroll.y),
        );
        if let Some(min) = pos.min_width {
            doc.set_style(panel, "min-width", &format!("{min}px"));
        }

        tracing::trace!(panel = %panel, placement = %pos.placement, x = pos.x, y = pos.y, "recomputed");
        self.last = Some(pos);
        pos
    }

    /// Remove every style the session wrote
    pub fn dispose(&mut self, doc: &mut Document) {
        for property in SESSION_STYLES {
            doc.remove_style(self.floating, property);
        }
        self.last = None;
    }
}
