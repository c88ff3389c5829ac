//! Token merging.
//!
//! Overlays are applied left to right on top of a base set. A key present in
//! a later overlay replaces the same key from anything before it. Nested
//! records are replaced as a whole, never unioned, so
//! `merge(base, [o1, o2]) == merge(merge(base, [o1]), [o2])` holds for every
//! input.
//!
//! Strict merging validates each overlay against a [`TokenSchema`] before
//! applying it, failing with [`TokenError::InvalidToken`] for undeclared names.

use log::trace;

use crate::error::TokenError;
use crate::token::{TokenSchema, TokenSet};

/// Merges `overlays` onto `base`, later keys winning.
///
/// # Example
///
/// ```rust
/// use tokenweave::{merge, TokenSet};
///
/// let base = TokenSet::new().with("marginXS", 8).with("lineWidth", 1);
/// let compact = TokenSet::new().with("marginXS", 4);
///
/// let merged = merge(&base, &[&compact]);
/// assert_eq!(merged.get_number("marginXS"), Some(4.0));
/// assert_eq!(merged.get_number("lineWidth"), Some(1.0));
/// ```
pub fn merge(base: &TokenSet, overlays: &[&TokenSet]) -> TokenSet {
    let mut merged = base.clone();
    for overlay in overlays {
        apply(&mut merged, overlay);
    }
    merged
}

fn apply(target: &mut TokenSet, overlay: &TokenSet) {
    trace!("applying overlay of {} tokens", overlay.len());
    for (name, value) in overlay.iter() {
        target.insert(name.to_string(), value.clone());
    }
}

/// Configurable merger with an optional strict schema.
///
/// The default merger is lenient and behaves exactly like [`merge`].
#[derive(Debug, Clone, Default)]
pub struct TokenMerger {
    schema: Option<TokenSchema>,
}

impl TokenMerger {
    /// A lenient merger: any token name is accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// A strict merger: overlays may only use tokens declared in `schema`.
    pub fn strict(schema: TokenSchema) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.schema.is_some()
    }

    /// Merges `overlays` onto `base`.
    ///
    /// In strict mode every overlay is validated before any is applied, so an
    /// error leaves no partially merged result behind. The base itself is not
    /// validated.
    pub fn merge(&self, base: &TokenSet, overlays: &[&TokenSet]) -> Result<TokenSet, TokenError> {
        if let Some(schema) = &self.schema {
            for overlay in overlays {
                schema.validate(overlay)?;
            }
        }
        Ok(merge(base, overlays))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenKind, TokenValue};

    #[test]
    fn test_merge_right_biased() {
        let base = TokenSet::new().with("a", 1).with("b", 1);
        let o1 = TokenSet::new().with("a", 2).with("c", 2);
        let o2 = TokenSet::new().with("a", 3);

        let merged = merge(&base, &[&o1, &o2]);
        assert_eq!(merged.get_number("a"), Some(3.0));
        assert_eq!(merged.get_number("b"), Some(1.0));
        assert_eq!(merged.get_number("c"), Some(2.0));
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let base = TokenSet::new().with("a", 1);
        let overlay = TokenSet::new().with("a", 2);
        let _ = merge(&base, &[&overlay]);
        assert_eq!(base.get_number("a"), Some(1.0));
    }

    #[test]
    fn test_merge_replaces_nested_wholesale() {
        let base = TokenSet::new().with(
            "Calendar",
            TokenSet::new().with("fullBg", "#fff").with("itemActiveBg", "#e6f4ff"),
        );
        let overlay = TokenSet::new().with("Calendar", TokenSet::new().with("fullBg", "#000"));

        let merged = merge(&base, &[&overlay]);
        let calendar = merged.get_nested("Calendar").unwrap();
        assert_eq!(calendar.get("fullBg"), Some(&TokenValue::from("#000")));
        assert!(!calendar.contains("itemActiveBg"));
    }

    #[test]
    fn test_merge_without_overlays_is_identity() {
        let base = TokenSet::new().with("a", 1);
        assert_eq!(merge(&base, &[]), base);
    }

    #[test]
    fn test_strict_rejects_undeclared_overlay_token() {
        let schema = TokenSchema::new().declare("a", TokenKind::Number);
        let merger = TokenMerger::strict(schema);
        assert!(merger.is_strict());

        let base = TokenSet::new().with("anything", 1);
        let overlay = TokenSet::new().with("a", 2).with("typo", 3);

        assert_eq!(
            merger.merge(&base, &[&overlay]),
            Err(TokenError::InvalidToken {
                name: "typo".into()
            })
        );
    }

    #[test]
    fn test_strict_accepts_declared_tokens() {
        let schema = TokenSchema::new().declare("a", TokenKind::Number);
        let merged = TokenMerger::strict(schema)
            .merge(&TokenSet::new(), &[&TokenSet::new().with("a", 2)])
            .unwrap();
        assert_eq!(merged.get_number("a"), Some(2.0));
    }

    #[test]
    fn test_lenient_merger_matches_free_function() {
        let base = TokenSet::new().with("a", 1);
        let overlay = TokenSet::new().with("z", 9);
        assert_eq!(
            TokenMerger::new().merge(&base, &[&overlay]).unwrap(),
            merge(&base, &[&overlay])
        );
    }
}
