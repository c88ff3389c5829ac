//! Small value predicates shared across the library.

use serde_json::Value;

use crate::token::TokenValue;

/// Values that can be asked whether they look like a finite number.
///
/// Strings follow the lenient-but-whole rules of a JavaScript
/// `!isNaN(parseFloat(v)) && isFinite(v)` check:
///
/// - surrounding whitespace is ignored, but blank strings are not numbers
/// - the whole trimmed string must be a decimal literal (`"42px"` is not)
/// - unsigned `0x`, `0o` and `0b` integer literals count
/// - anything that parses to an infinity or NaN does not count
pub trait NumericLike {
    fn is_numeric_like(&self) -> bool;
}

/// Returns `true` when `value` represents a finite number.
///
/// ```rust
/// use tokenweave::is_numeric_like;
///
/// assert!(is_numeric_like("3.14"));
/// assert!(is_numeric_like(&-0.0));
/// assert!(!is_numeric_like("abc"));
/// assert!(!is_numeric_like("  "));
/// ```
pub fn is_numeric_like<T: NumericLike + ?Sized>(value: &T) -> bool {
    value.is_numeric_like()
}

impl NumericLike for str {
    fn is_numeric_like(&self) -> bool {
        parse_numeric(self).is_some()
    }
}

/// The finite number a numeric-like string denotes.
pub(crate) fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return None;
    }
    let value = match parse_radix_literal(trimmed) {
        Some(value) => value,
        // Rust accepts "inf" and "NaN" spellings; finiteness rejects them.
        None => trimmed.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

impl NumericLike for String {
    fn is_numeric_like(&self) -> bool {
        self.as_str().is_numeric_like()
    }
}

impl NumericLike for f64 {
    fn is_numeric_like(&self) -> bool {
        self.is_finite()
    }
}

impl NumericLike for f32 {
    fn is_numeric_like(&self) -> bool {
        self.is_finite()
    }
}

macro_rules! integers_are_numeric {
    ($($ty:ty),*) => {
        $(
            impl NumericLike for $ty {
                fn is_numeric_like(&self) -> bool {
                    true
                }
            }
        )*
    };
}

integers_are_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl NumericLike for Value {
    fn is_numeric_like(&self) -> bool {
        match self {
            Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
            Value::String(s) => s.is_numeric_like(),
            _ => false,
        }
    }
}

impl NumericLike for TokenValue {
    fn is_numeric_like(&self) -> bool {
        match self {
            TokenValue::Number(n) => n.is_finite(),
            TokenValue::Str(s) => s.is_numeric_like(),
            TokenValue::Nested(_) => false,
        }
    }
}

impl<T: NumericLike + ?Sized> NumericLike for &T {
    fn is_numeric_like(&self) -> bool {
        (**self).is_numeric_like()
    }
}

impl<T: NumericLike> NumericLike for Option<T> {
    fn is_numeric_like(&self) -> bool {
        self.as_ref().is_some_and(NumericLike::is_numeric_like)
    }
}

/// JavaScript's `StrWhiteSpaceChar`: the `WhiteSpace` and `LineTerminator`
/// code points. Differs from `char::is_whitespace` on U+FEFF (included here)
/// and U+0085 (excluded here).
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return None;
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        value = value * f64::from(radix) + f64::from(c.to_digit(radix)?);
    }
    Some(value)
}
