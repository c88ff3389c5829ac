//! Stylesheet text from a style tree.
//!
//! Flattening rules:
//!
//! - A child selector containing `&` has every `&` replaced by the parent
//!   selector; any other child selector is a descendant of its parent.
//! - Comma lists on either side are expanded (parent-major order).
//! - At-rules (`@media ...`) wrap the flattened rules of their children,
//!   which keep the selector context of the at-rule's parent.
//! - Property names go from camelCase to kebab-case; numbers get a `px`
//!   suffix unless they are zero or the property is unitless.
//!
//! ```rust
//! use tokenweave::{to_css, StyleNode};
//!
//! let tree = StyleNode::root().child(
//!     StyleNode::new(".cal")
//!         .prop("minWidth", 80)
//!         .child(StyleNode::new("&-rtl").prop("direction", "rtl")),
//! );
//!
//! assert_eq!(
//!     to_css(&tree),
//!     ".cal {\n  min-width: 80px;\n}\n.cal-rtl {\n  direction: rtl;\n}\n"
//! );
//! ```

use super::node::{PropValue, Property, StyleNode};

/// Properties whose numeric values never take a unit.
const UNITLESS: &[&str] = &[
    "animationIterationCount",
    "columnCount",
    "flex",
    "flexGrow",
    "flexShrink",
    "fontWeight",
    "gridColumn",
    "gridRow",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "scale",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
];

/// Renders a style tree as stylesheet text.
///
/// The tree's own selector is treated as the outermost context; pass
/// [`StyleNode::root`] based trees to get top-level rules.
pub fn to_css(tree: &StyleNode) -> String {
    let mut out = String::new();
    let context = if tree.selector().is_empty() {
        Vec::new()
    } else {
        split_selector(tree.selector())
    };
    if !context.is_empty() {
        write_rule(&context, tree.properties(), 0, &mut out);
    }
    write_children(tree, &context, 0, &mut out);
    out
}

fn write_children(node: &StyleNode, context: &[String], depth: usize, out: &mut String) {
    for child in node.children() {
        if child.is_at_rule() {
            indent(depth, out);
            out.push_str(child.selector());
            out.push_str(" {\n");
            if !context.is_empty() {
                write_rule(context, child.properties(), depth + 1, out);
            }
            write_children(child, context, depth + 1, out);
            indent(depth, out);
            out.push_str("}\n");
        } else {
            let selectors = combine(context, child.selector());
            write_rule(&selectors, child.properties(), depth, out);
            write_children(child, &selectors, depth, out);
        }
    }
}

fn write_rule(selectors: &[String], properties: &[Property], depth: usize, out: &mut String) {
    if properties.is_empty() {
        return;
    }
    indent(depth, out);
    out.push_str(&selectors.join(", "));
    out.push_str(" {\n");
    for property in properties {
        indent(depth + 1, out);
        out.push_str(&kebab_case(&property.name));
        out.push_str(": ");
        out.push_str(&format_value(&property.name, &property.value));
        out.push_str(";\n");
    }
    indent(depth, out);
    out.push_str("}\n");
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Splits a selector list on top-level commas only; commas inside `(...)`,
/// `[...]` or quotes belong to a single selector.
fn split_selector(selector: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
        .into_iter()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Resolves a child selector against its parent context.
pub(crate) fn combine(context: &[String], selector: &str) -> Vec<String> {
    let parts = split_selector(selector);
    if context.is_empty() {
        return parts.iter().map(|p| p.replace('&', "")).collect();
    }
    let mut combined = Vec::with_capacity(context.len() * parts.len());
    for parent in context {
        for part in &parts {
            if part.contains('&') {
                combined.push(part.replace('&', parent));
            } else {
                combined.push(format!("{} {}", parent, part));
            }
        }
    }
    combined
}

/// `marginInlineStart` → `margin-inline-start`, `WebkitAppearance` →
/// `-webkit-appearance`. Custom properties pass through untouched.
pub fn kebab_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    if is_lowercase_ms_prefixed(name) {
        out.push('-');
    }
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 || is_vendor_prefixed(name) {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn is_vendor_prefixed(name: &str) -> bool {
    ["Webkit", "Moz", "Ms", "O"]
        .iter()
        .any(|prefix| name.starts_with(prefix) && name.len() > prefix.len())
}

/// Style objects spell the IE prefix in lowercase: `msTransform`.
fn is_lowercase_ms_prefixed(name: &str) -> bool {
    name.strip_prefix("ms")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

fn format_value(name: &str, value: &PropValue) -> String {
    match value {
        PropValue::Text(s) => s.clone(),
        PropValue::Number(n) if *n == 0.0 => "0".to_string(),
        PropValue::Number(n) if UNITLESS.contains(&name) => n.to_string(),
        PropValue::Number(n) => format!("{}px", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::node::MediaQuery;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("marginInlineStart"), "margin-inline-start");
        assert_eq!(kebab_case("background"), "background");
        assert_eq!(kebab_case("WebkitAppearance"), "-webkit-appearance");
        assert_eq!(kebab_case("--ant-color"), "--ant-color");
    }

    #[test]
    fn test_kebab_case_lowercase_ms_prefix() {
        assert_eq!(kebab_case("msTransform"), "-ms-transform");
        assert_eq!(kebab_case("MsTransform"), "-ms-transform");
        assert_eq!(kebab_case("msx"), "msx");
    }

    #[test]
    fn test_numeric_units() {
        assert_eq!(format_value("minWidth", &PropValue::Number(80.0)), "80px");
        assert_eq!(format_value("lineHeight", &PropValue::Number(1.5)), "1.5");
        assert_eq!(format_value("padding", &PropValue::Number(0.0)), "0");
        assert_eq!(format_value("border", &PropValue::from("0")), "0");
    }

    #[test]
    fn test_combine_ampersand_and_descendant() {
        let ctx = vec![".cal".to_string()];
        assert_eq!(combine(&ctx, "&-mini"), vec![".cal-mini"]);
        assert_eq!(combine(&ctx, ".cal-header"), vec![".cal .cal-header"]);
        assert_eq!(
            combine(&ctx, "&-selected, &-selected:hover"),
            vec![".cal-selected", ".cal-selected:hover"]
        );
    }

    #[test]
    fn test_commas_inside_parens_stay_in_one_selector() {
        let ctx = vec![".cal".to_string()];
        assert_eq!(combine(&ctx, "&:not(.a, .b)"), vec![".cal:not(.a, .b)"]);
        assert_eq!(
            combine(&ctx, "&:is(.a, .b), [data-x=\"1,2\"]"),
            vec![".cal:is(.a, .b)", ".cal [data-x=\"1,2\"]"]
        );

        let tree = StyleNode::root()
            .child(StyleNode::new(".cal").child(StyleNode::new("&:not(.a, .b)").prop("color", "red")));
        assert_eq!(to_css(&tree), ".cal:not(.a, .b) {\n  color: red;\n}\n");
    }

    #[test]
    fn test_combine_expands_parent_lists() {
        let ctx = vec![".a".to_string(), ".b".to_string()];
        assert_eq!(combine(&ctx, "th"), vec![".a th", ".b th"]);
    }

    #[test]
    fn test_empty_nodes_emit_nothing() {
        let tree = StyleNode::root().child(StyleNode::new(".a").child(StyleNode::new(".b")));
        assert_eq!(to_css(&tree), "");
    }

    #[test]
    fn test_media_keeps_outer_context() {
        let tree = StyleNode::root().child(StyleNode::new(".cal").media(
            MediaQuery::MaxWidth(480.0),
            vec![StyleNode::new("&-header").prop("display", "block")],
        ));
        assert_eq!(
            to_css(&tree),
            "@media only screen and (max-width: 480px) {\n  .cal-header {\n    display: block;\n  }\n}\n"
        );
    }

    #[test]
    fn test_non_root_tree_uses_own_selector() {
        let tree = StyleNode::new(".x").prop("color", "red");
        assert_eq!(to_css(&tree), ".x {\n  color: red;\n}\n");
    }
}
