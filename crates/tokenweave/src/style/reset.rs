//! Shared property sets spread into component root rules.

use super::node::Property;
use crate::error::TokenError;
use crate::token::TokenSet;

/// The reset every component root starts from.
///
/// Clears box model defaults and pins text color, size, line height and font
/// family to the theme's base tokens.
pub fn reset_component(tokens: &TokenSet) -> Result<Vec<Property>, TokenError> {
    let t = tokens.reader("resetComponent");
    Ok(vec![
        Property::new("boxSizing", "border-box"),
        Property::new("margin", 0),
        Property::new("padding", 0),
        Property::new("color", t.text("colorText")?),
        Property::new("fontSize", t.number("fontSize")?),
        Property::new("lineHeight", t.number("lineHeight")?),
        Property::new("listStyle", "none"),
        Property::new("fontFamily", t.text("fontFamily")?),
    ])
}
