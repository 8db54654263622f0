//! Simple selectors
//!
//! The single-compound subset widgets configure themselves with:
//! `tag`, `#id`, `.class`, `[attr]`, `[attr=value]` and `*`.

use crate::ElementData;

/// Selector parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unterminated attribute selector: {0}")]
    Unterminated(String),

    #[error("unsupported selector: {0}")]
    Unsupported(String),
}

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Attr(String),
    AttrEquals(String, String),
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Result<Self, SelectorError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }

        if s == "*" {
            Ok(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            Self::plain(id, s).map(Self::Id)
        } else if let Some(class) = s.strip_prefix('.') {
            Self::plain(class, s).map(Self::Class)
        } else if let Some(body) = s.strip_prefix('[') {
            let body = body
                .strip_suffix(']')
                .ok_or_else(|| SelectorError::Unterminated(s.to_string()))?;
            match body.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                    Ok(Self::AttrEquals(Self::plain(name.trim(), s)?, value.to_string()))
                }
                None => Self::plain(body.trim(), s).map(Self::Attr),
            }
        } else {
            Self::plain(s, s).map(|t| Self::Tag(t.to_ascii_lowercase()))
        }
    }

    fn plain(token: &str, whole: &str) -> Result<String, SelectorError> {
        let valid = !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':');
        if valid {
            Ok(token.to_string())
        } else {
            Err(SelectorError::Unsupported(whole.to_string()))
        }
    }

    /// Attribute-style selector for `name`
    pub fn attr(name: &str) -> Self {
        Self::Attr(name.to_string())
    }

    /// Check whether an element matches
    pub fn matches(&self, elem: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => elem.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => elem.id() == Some(id.as_str()),
            Self::Class(class) => elem.has_class(class),
            Self::Attr(name) => elem.has_attr(name),
            Self::AttrEquals(name, value) => elem.get_attr(name) == Some(value.as_str()),
        }
    }

    /// Class name for class selectors
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl std::str::FromStr for SimpleSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
