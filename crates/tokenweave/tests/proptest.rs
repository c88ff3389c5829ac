//! Property-based tests for merging, derivation and fingerprints.

use proptest::prelude::*;
use tokenweave::components::{build_calendar_styles, calendar_component, date_content_height};
use tokenweave::{is_numeric_like, merge, Theme, TokenSet, TokenValue};

// ============================================================================
// Strategies
// ============================================================================

fn token_value() -> impl Strategy<Value = TokenValue> {
    prop_oneof![
        (-1.0e6..1.0e6f64).prop_map(TokenValue::Number),
        "[a-z#0-9]{0,8}".prop_map(TokenValue::Str),
    ]
}

fn token_set() -> impl Strategy<Value = TokenSet> {
    prop::collection::btree_map("[a-e]{1,2}", token_value(), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

fn content_height_sources() -> impl Strategy<Value = TokenSet> {
    (1u8..32, 1u8..40, 0u8..24, 0u8..4).prop_map(|(font, line_tenths, margin, width)| {
        TokenSet::new()
            .with("fontSizeSM", f64::from(font))
            .with("lineHeightSM", f64::from(line_tenths) / 10.0)
            .with("marginXS", f64::from(margin))
            .with("lineWidth", f64::from(width))
    })
}

// ============================================================================
// Merge
// ============================================================================

proptest! {
    /// merge(merge(a, b), c) == merge(a, merge(b, c))
    #[test]
    fn merge_is_associative(a in token_set(), b in token_set(), c in token_set()) {
        let left = merge(&merge(&a, &[&b]), &[&c]);
        let right = merge(&a, &[&merge(&b, &[&c])]);
        prop_assert_eq!(left, right);
    }

    /// One call with several overlays equals applying them one at a time.
    #[test]
    fn merge_overlays_apply_in_order(a in token_set(), b in token_set(), c in token_set()) {
        let together = merge(&a, &[&b, &c]);
        let stepwise = merge(&merge(&a, &[&b]), &[&c]);
        prop_assert_eq!(together, stepwise);
    }

    /// Every overlay key carries the overlay's value.
    #[test]
    fn merge_is_right_biased(base in token_set(), overlay in token_set()) {
        let merged = merge(&base, &[&overlay]);
        for (name, value) in overlay.iter() {
            prop_assert_eq!(merged.get(name), Some(value));
        }
        for (name, value) in base.iter() {
            if !overlay.contains(name) {
                prop_assert_eq!(merged.get(name), Some(value));
            }
        }
    }

    /// Merging never leaves the inputs changed.
    #[test]
    fn merge_leaves_inputs_alone(base in token_set(), overlay in token_set()) {
        let before = (base.clone(), overlay.clone());
        let _ = merge(&base, &[&overlay]);
        prop_assert_eq!((base, overlay), before);
    }
}

// ============================================================================
// Derivation and fingerprints
// ============================================================================

proptest! {
    /// Unrelated tokens never change a derived value.
    #[test]
    fn derivation_ignores_unrelated_tokens(
        sources in content_height_sources(),
        noise in token_set(),
    ) {
        let rule = date_content_height(3);
        let plain = rule.evaluate(&sources).unwrap();
        let noisy = rule.evaluate(&merge(&noise, &[&sources])).unwrap();
        prop_assert_eq!(plain, noisy);
    }

    /// Fingerprints depend on content, not on insertion order.
    #[test]
    fn fingerprint_ignores_insertion_order(set in token_set()) {
        let reversed: TokenSet = set
            .iter()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        prop_assert_eq!(set.fingerprint(), reversed.fingerprint());
    }

    /// Equal sets hash alike; different sets (almost surely) do not.
    #[test]
    fn fingerprint_tracks_equality(a in token_set(), b in token_set()) {
        prop_assert_eq!(a == b, a.fingerprint() == b.fingerprint());
    }

    /// Building twice from the same theme yields the same tree.
    #[test]
    fn calendar_build_is_deterministic(width in 40u16..200, primary in "#[0-9a-f]{6}") {
        let theme = Theme::new().set("colorPrimary", primary.as_str());
        let component = calendar_component();
        let resolved = component.resolve_tokens(theme.tokens(), "ant-picker").unwrap();
        let resolved = merge(&resolved, &[&TokenSet::new().with("yearControlWidth", f64::from(width))]);
        prop_assert_eq!(
            build_calendar_styles(&resolved).unwrap(),
            build_calendar_styles(&resolved).unwrap()
        );
    }

    /// Any finite float's decimal rendering is numeric-like.
    #[test]
    fn finite_float_strings_are_numeric(n in -1.0e12..1.0e12f64) {
        prop_assert!(is_numeric_like(n.to_string().as_str()));
    }
}
