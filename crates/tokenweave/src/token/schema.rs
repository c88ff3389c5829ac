//! Token schemas: the declared names and kinds a token set may contain.

use std::collections::BTreeMap;

use super::set::TokenSet;
use super::value::TokenKind;
use crate::error::TokenError;

/// Enumerated token names with their value kinds.
///
/// A schema is what strict merging validates overlays against. The global
/// theme declares one (see [`crate::theme::global_schema`]) and each component
/// extends it with its own tokens.
///
/// # Example
///
/// ```rust
/// use tokenweave::{TokenKind, TokenSchema, TokenSet};
///
/// let schema = TokenSchema::new()
///     .declare("yearControlWidth", TokenKind::Number)
///     .declare("fullBg", TokenKind::String);
///
/// assert!(schema.validate(&TokenSet::new().with("fullBg", "#fff")).is_ok());
/// assert!(schema.validate(&TokenSet::new().with("bogus", 1)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSchema {
    kinds: BTreeMap<String, TokenKind>,
}

impl TokenSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a token, returning the schema for chaining.
    ///
    /// Declaring a name twice keeps the last kind.
    pub fn declare(mut self, name: impl Into<String>, kind: TokenKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    /// Declares every name in `names` with the same kind.
    pub fn declare_all<I, S>(mut self, names: I, kind: TokenKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.kinds.insert(name.into(), kind);
        }
        self
    }

    /// Returns a schema holding the declarations of both; `other` wins on conflict.
    pub fn extend(mut self, other: &TokenSchema) -> Self {
        for (name, kind) in &other.kinds {
            self.kinds.insert(name.clone(), *kind);
        }
        self
    }

    /// Derives a schema from the kinds present in `tokens`.
    pub fn infer(tokens: &TokenSet) -> Self {
        Self {
            kinds: tokens
                .iter()
                .map(|(name, value)| (name.to_string(), value.kind()))
                .collect(),
        }
    }

    pub fn kind_of(&self, name: &str) -> Option<TokenKind> {
        self.kinds.get(name).copied()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Checks that every token in `tokens` is declared with a matching kind.
    ///
    /// Reports the first offending token in name order.
    pub fn validate(&self, tokens: &TokenSet) -> Result<(), TokenError> {
        for (name, value) in tokens.iter() {
            match self.kind_of(name) {
                None => {
                    return Err(TokenError::InvalidToken {
                        name: name.to_string(),
                    })
                }
                Some(expected) if expected != value.kind() => {
                    return Err(TokenError::KindMismatch {
                        name: name.to_string(),
                        expected,
                        found: value.kind(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
