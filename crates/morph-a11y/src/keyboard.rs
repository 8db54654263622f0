//! Keyboard Navigation
//!
//! Key names and the roving-index arithmetic shared by accordion
//! headers and tab lists.

/// Keys the widgets react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Tab,
    Escape,
    Enter,
    Space,
    Other(String),
}

impl Key {
    /// Parse a `KeyboardEvent.key` value
    pub fn parse(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Axis the arrow keys move along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    fn next_key(self) -> Key {
        match self {
            Self::Vertical => Key::ArrowDown,
            Self::Horizontal => Key::ArrowRight,
        }
    }

    fn prev_key(self) -> Key {
        match self {
            Self::Vertical => Key::ArrowUp,
            Self::Horizontal => Key::ArrowLeft,
        }
    }
}

/// Target index for a navigation key in a list of `len` items.
///
/// Arrows wrap around, Home/End jump to the ends. Indices for which
/// `skip` returns true are never targets. Returns `None` for keys that do
/// not navigate along `orientation`, or when every item is skipped.
pub fn roving_target(
    key: &Key,
    orientation: Orientation,
    current: usize,
    len: usize,
    skip: impl Fn(usize) -> bool,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    if *key == Key::Home {
        return (0..len).find(|&i| !skip(i));
    }
    if *key == Key::End {
        return (0..len).rev().find(|&i| !skip(i));
    }

    let forward = if *key == orientation.next_key() {
        true
    } else if *key == orientation.prev_key() {
        false
    } else {
        return None;
    };

    (1..=len)
        .map(|step| {
            if forward {
                (current + step) % len
            } else {
                (current + len * step - step) % len
            }
        })
        .find(|&i| !skip(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::parse("Esc"), Key::Escape);
        assert_eq!(Key::parse(" "), Key::Space);
        assert_eq!(Key::parse("a"), Key::Other("a".into()));
    }

    #[test]
    fn test_home_end_and_wrap() {
        let none = |_| false;
        let v = Orientation::Vertical;
        assert_eq!(roving_target(&Key::Home, v, 0, 3, none), Some(0));
        assert_eq!(roving_target(&Key::End, v, 0, 3, none), Some(2));
        assert_eq!(roving_target(&Key::ArrowDown, v, 2, 3, none), Some(0));
        assert_eq!(roving_target(&Key::ArrowUp, v, 0, 3, none), Some(2));
    }

    #[test]
    fn test_orientation_filters_keys() {
        assert_eq!(roving_target(&Key::ArrowRight, Orientation::Vertical, 0, 3, |_| false), None);
        assert_eq!(roving_target(&Key::ArrowRight, Orientation::Horizontal, 0, 3, |_| false), Some(1));
        assert_eq!(roving_target(&Key::Enter, Orientation::Horizontal, 0, 3, |_| false), None);
    }

    #[test]
    fn test_skips_disabled() {
        let disabled = |i| i == 3;
        let h = Orientation::Horizontal;
        assert_eq!(roving_target(&Key::ArrowRight, h, 2, 4, disabled), Some(0));
        assert_eq!(roving_target(&Key::ArrowLeft, h, 0, 4, disabled), Some(2));
        assert_eq!(roving_target(&Key::End, h, 0, 4, disabled), Some(2));
        assert_eq!(roving_target(&Key::Home, h, 2, 4, |_| true), None);
    }
}
