//! Token value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::set::TokenSet;

/// A single design token value.
///
/// Values are a tagged union over the three kinds a theme can hold: plain
/// numbers (sizes, ratios, durations in ms), strings (colors, line types,
/// class names) and nested records (per-component override sections).
///
/// # Example
///
/// ```rust
/// use tokenweave::TokenValue;
///
/// let width: TokenValue = 80.0.into();
/// let color: TokenValue = "#1677ff".into();
/// assert_eq!(width.as_number(), Some(80.0));
/// assert_eq!(color.as_str(), Some("#1677ff"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// A numeric token.
    Number(f64),
    /// A string token.
    Str(String),
    /// A nested record, replaced wholesale on merge.
    Nested(TokenSet),
}

impl TokenValue {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenValue::Number(_) => TokenKind::Number,
            TokenValue::Str(_) => TokenKind::String,
            TokenValue::Nested(_) => TokenKind::Nested,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TokenValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&TokenSet> {
        match self {
            TokenValue::Nested(set) => Some(set),
            _ => None,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Number(n) => write!(f, "{}", n),
            TokenValue::Str(s) => write!(f, "{}", s),
            TokenValue::Nested(set) => write!(f, "{{{} tokens}}", set.len()),
        }
    }
}

impl From<f64> for TokenValue {
    fn from(n: f64) -> Self {
        TokenValue::Number(n)
    }
}

impl From<i32> for TokenValue {
    fn from(n: i32) -> Self {
        TokenValue::Number(f64::from(n))
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        TokenValue::Str(s.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(s: String) -> Self {
        TokenValue::Str(s)
    }
}

impl From<TokenSet> for TokenValue {
    fn from(set: TokenSet) -> Self {
        TokenValue::Nested(set)
    }
}

/// The kind of value a token holds, as declared in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Number,
    String,
    Nested,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number => write!(f, "a number"),
            TokenKind::String => write!(f, "a string"),
            TokenKind::Nested => write!(f, "a nested set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(TokenValue::from(1.5).kind(), TokenKind::Number);
        assert_eq!(TokenValue::from("solid").kind(), TokenKind::String);
        assert_eq!(
            TokenValue::from(TokenSet::new()).kind(),
            TokenKind::Nested
        );
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let value = TokenValue::from("solid");
        assert_eq!(value.as_number(), None);
        assert_eq!(value.as_str(), Some("solid"));
        assert!(value.as_nested().is_none());
    }

    #[test]
    fn test_untagged_yaml() {
        let n: TokenValue = serde_yaml::from_str("4").unwrap();
        assert_eq!(n, TokenValue::Number(4.0));

        let s: TokenValue = serde_yaml::from_str("dashed").unwrap();
        assert_eq!(s, TokenValue::Str("dashed".into()));

        let nested: TokenValue = serde_yaml::from_str("{ fullBg: '#000' }").unwrap();
        let set = nested.as_nested().unwrap();
        assert_eq!(set.get("fullBg"), Some(&TokenValue::from("#000")));
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenValue::from(0.75).to_string(), "0.75");
        assert_eq!(TokenValue::from(12).to_string(), "12");
        assert_eq!(TokenValue::from("#fff").to_string(), "#fff");
    }
}
