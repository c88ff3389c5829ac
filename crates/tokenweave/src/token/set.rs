//! Immutable token sets and their fingerprints.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::value::{TokenKind, TokenValue};
use crate::error::TokenError;

/// An ordered mapping from token names to values.
///
/// Sets are built with [`with`](TokenSet::with) or collected from an iterator,
/// and combined with [`merge`](crate::merge). Resolution never mutates a set in
/// place: merge and derive always return new sets.
///
/// Keys are kept sorted so that iteration order, serialization and the
/// [`Fingerprint`] are independent of construction order.
///
/// # Example
///
/// ```rust
/// use tokenweave::TokenSet;
///
/// let tokens = TokenSet::new()
///     .with("marginXS", 4)
///     .with("colorPrimary", "#1677ff");
///
/// assert_eq!(tokens.get_number("marginXS"), Some(4.0));
/// assert_eq!(tokens.get_str("colorPrimary"), Some("#1677ff"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSet {
    entries: BTreeMap<String, TokenValue>,
}

impl TokenSet {
    /// Creates an empty token set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this set with `name` set to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<TokenValue>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub(crate) fn insert(&mut self, name: String, value: TokenValue) {
        self.entries.insert(name, value);
    }

    /// Returns a copy of this set without `name`.
    pub fn without(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.entries.remove(name);
        copy
    }

    pub fn get(&self, name: &str) -> Option<&TokenValue> {
        self.entries.get(name)
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TokenValue::as_number)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TokenValue::as_str)
    }

    pub fn get_nested(&self, name: &str) -> Option<&TokenSet> {
        self.get(name).and_then(TokenValue::as_nested)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over token names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Iterates over `(name, value)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a reader that reports missing tokens on behalf of `consumer`.
    ///
    /// Style builders use this to pull typed values out of the resolved set;
    /// `consumer` ends up in the `required_by` field of any
    /// [`TokenError::MissingToken`].
    pub fn reader<'a>(&'a self, consumer: &'a str) -> TokenReader<'a> {
        TokenReader {
            tokens: self,
            consumer,
        }
    }

    /// Computes the fingerprint of this set.
    ///
    /// Structurally equal sets always produce equal fingerprints. The hash
    /// covers names, value kinds and values; `-0.0` and `0.0` hash alike.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Sha256::new();
        write_canonical(self, &mut hasher);
        Fingerprint(hex::encode(hasher.finalize()))
    }
}

impl<K: Into<String>, V: Into<TokenValue>> FromIterator<(K, V)> for TokenSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn write_canonical(set: &TokenSet, hasher: &mut Sha256) {
    hasher.update((set.len() as u64).to_be_bytes());
    for (name, value) in set.iter() {
        write_str(name, hasher);
        match value {
            TokenValue::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                hasher.update([0u8]);
                hasher.update(n.to_bits().to_be_bytes());
            }
            TokenValue::Str(s) => {
                hasher.update([1u8]);
                write_str(s, hasher);
            }
            TokenValue::Nested(inner) => {
                hasher.update([2u8]);
                write_canonical(inner, hasher);
            }
        }
    }
}

fn write_str(s: &str, hasher: &mut Sha256) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}

/// Identity of a resolved token set, used as part of the style cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The full hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first twelve hex digits, for logs and class-name hashes.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed, error-reporting view over a [`TokenSet`].
#[derive(Debug, Clone, Copy)]
pub struct TokenReader<'a> {
    tokens: &'a TokenSet,
    consumer: &'a str,
}

impl<'a> TokenReader<'a> {
    fn require(&self, name: &str) -> Result<&'a TokenValue, TokenError> {
        self.tokens
            .get(name)
            .ok_or_else(|| TokenError::missing(name, self.consumer))
    }

    /// Reads a numeric token.
    pub fn number(&self, name: &str) -> Result<f64, TokenError> {
        let value = self.require(name)?;
        value.as_number().ok_or_else(|| TokenError::KindMismatch {
            name: name.to_string(),
            expected: TokenKind::Number,
            found: value.kind(),
        })
    }

    /// Reads a string token.
    pub fn text(&self, name: &str) -> Result<&'a str, TokenError> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| TokenError::KindMismatch {
            name: name.to_string(),
            expected: TokenKind::String,
            found: value.kind(),
        })
    }

    /// Reads a token of any kind.
    pub fn value(&self, name: &str) -> Result<&'a TokenValue, TokenError> {
        self.require(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_ignores_construction_order() {
        let a = TokenSet::new().with("a", 1).with("b", "x");
        let b = TokenSet::new().with("b", "x").with("a", 1);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_kinds() {
        let number = TokenSet::new().with("a", 1);
        let text = TokenSet::new().with("a", "1");
        assert_ne!(number.fingerprint(), text.fingerprint());
    }

    #[test]
    fn test_fingerprint_negative_zero() {
        let pos = TokenSet::new().with("a", 0.0);
        let neg = TokenSet::new().with("a", -0.0);
        assert_eq!(pos.fingerprint(), neg.fingerprint());
    }

    #[test]
    fn test_fingerprint_nested_changes_propagate() {
        let a = TokenSet::new().with("Calendar", TokenSet::new().with("fullBg", "#fff"));
        let b = TokenSet::new().with("Calendar", TokenSet::new().with("fullBg", "#000"));
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().as_str().len(), 64);
        assert_eq!(a.fingerprint().short().len(), 12);
    }

    #[test]
    fn test_reader_missing_and_mismatch() {
        let tokens = TokenSet::new().with("lineType", "solid");
        let reader = tokens.reader("Calendar");

        assert_eq!(reader.text("lineType"), Ok("solid"));
        assert_eq!(
            reader.number("lineWidth"),
            Err(TokenError::MissingToken {
                token: "lineWidth".into(),
                required_by: "Calendar".into(),
            })
        );
        assert!(matches!(
            reader.number("lineType"),
            Err(TokenError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_collect_and_iterate_sorted() {
        let tokens: TokenSet = vec![("b", 2), ("a", 1)].into_iter().collect();
        let names: Vec<&str> = tokens.names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
