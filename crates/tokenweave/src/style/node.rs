//! The style tree: selectors, properties and nested branches.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A property value: a bare number or a text value.
///
/// Numbers are kept unitless in the tree; the CSS emitter decides whether a
/// property takes a `px` suffix.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(f64::from(n))
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<&String> for PropValue {
    fn from(s: &String) -> Self {
        PropValue::Text(s.clone())
    }
}

/// A single `name: value` pair. Names are camelCase, as in a style object.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: PropValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A breakpoint predicate gating a responsive branch.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaQuery {
    /// Viewport width at or below the threshold.
    MaxWidth(f64),
    /// Viewport width at or above the threshold.
    MinWidth(f64),
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaQuery::MaxWidth(px) => write!(f, "@media only screen and (max-width: {}px)", px),
            MediaQuery::MinWidth(px) => write!(f, "@media only screen and (min-width: {}px)", px),
        }
    }
}

/// A node of the style tree.
///
/// Each node pairs a selector with an ordered list of properties and an ordered
/// list of child nodes. Child selectors are relative to the parent: a leading
/// or embedded `&` stands for the parent selector, anything else is a
/// descendant. Selectors starting with `@` are at-rules wrapping their
/// children.
///
/// Setting a property or adding a child whose selector already exists replaces
/// the earlier entry in place, keeping its position, which mirrors how keys
/// behave in a style object literal.
///
/// # Example
///
/// ```rust
/// use tokenweave::StyleNode;
///
/// let tree = StyleNode::new(".ant-picker-calendar")
///     .prop("background", "#ffffff")
///     .child(StyleNode::new("&-rtl").prop("direction", "rtl"));
///
/// assert_eq!(tree.children().len(), 1);
/// assert_eq!(
///     tree.find(&["&-rtl"]).unwrap().property("direction").unwrap().to_string(),
///     "rtl"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleNode {
    selector: String,
    properties: Vec<Property>,
    children: Vec<StyleNode>,
}

impl StyleNode {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The selectorless top of a stylesheet.
    pub fn root() -> Self {
        Self::default()
    }

    /// Sets a property.
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(Property::new(name, value));
        self
    }

    /// Spreads a list of properties into this node, later entries winning.
    pub fn props<I: IntoIterator<Item = Property>>(mut self, props: I) -> Self {
        for property in props {
            self.set(property);
        }
        self
    }

    fn set(&mut self, property: Property) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => existing.value = property.value,
            None => self.properties.push(property),
        }
    }

    /// Adds a child node.
    pub fn child(mut self, node: StyleNode) -> Self {
        match self
            .children
            .iter_mut()
            .find(|c| c.selector == node.selector)
        {
            Some(existing) => *existing = node,
            None => self.children.push(node),
        }
        self
    }

    /// Adds several child nodes in order.
    pub fn children_from<I: IntoIterator<Item = StyleNode>>(self, nodes: I) -> Self {
        nodes.into_iter().fold(self, StyleNode::child)
    }

    /// Adds a responsive branch gated by `query`.
    pub fn media<I: IntoIterator<Item = StyleNode>>(self, query: MediaQuery, nodes: I) -> Self {
        self.child(StyleNode::new(query.to_string()).children_from(nodes))
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn children(&self) -> &[StyleNode] {
        &self.children
    }

    /// Looks up a property value by name.
    pub fn property(&self, name: &str) -> Option<&PropValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Follows a path of child selectors down the tree.
    pub fn find(&self, path: &[&str]) -> Option<&StyleNode> {
        path.iter().try_fold(self, |node, selector| {
            node.children.iter().find(|c| c.selector == *selector)
        })
    }

    pub fn is_at_rule(&self) -> bool {
        self.selector.starts_with('@')
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.children.is_empty()
    }

    /// Counts this node and all of its descendants.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(StyleNode::node_count).sum::<usize>()
    }
}

/// Serializes as a nested map: properties first, then child selectors.
///
/// The node's own selector is not part of its serialized form; it appears as
/// the key in the parent's map.
impl Serialize for StyleNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len() + self.children.len()))?;
        for property in &self.properties {
            match &property.value {
                PropValue::Number(n) => map.serialize_entry(&property.name, n)?,
                PropValue::Text(s) => map.serialize_entry(&property.name, s)?,
            }
        }
        for child in &self.children {
            map.serialize_entry(&child.selector, child)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prop_replaces_in_place() {
        let node = StyleNode::new(".a")
            .prop("margin", 0)
            .prop("padding", 0)
            .prop("margin", "auto");

        let names: Vec<&str> = node.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["margin", "padding"]);
        assert_eq!(node.property("margin"), Some(&PropValue::from("auto")));
    }

    #[test]
    fn test_spread_then_override() {
        let reset = vec![Property::new("color", "black"), Property::new("margin", 0)];
        let node = StyleNode::new(".a").props(reset).prop("color", "red");
        assert_eq!(node.property("color"), Some(&PropValue::from("red")));
        assert_eq!(node.properties().len(), 2);
    }

    #[test]
    fn test_child_replaces_same_selector() {
        let node = StyleNode::new(".a")
            .child(StyleNode::new("&-x").prop("width", 1))
            .child(StyleNode::new("&-y"))
            .child(StyleNode::new("&-x").prop("width", 2));

        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].selector(), "&-x");
        assert_eq!(
            node.find(&["&-x"]).unwrap().property("width"),
            Some(&PropValue::Number(2.0))
        );
    }

    #[test]
    fn test_media_branch() {
        let node = StyleNode::root().media(
            MediaQuery::MaxWidth(480.0),
            vec![StyleNode::new(".a").prop("display", "block")],
        );
        let media = &node.children()[0];
        assert!(media.is_at_rule());
        assert_eq!(media.selector(), "@media only screen and (max-width: 480px)");
        assert!(node
            .find(&["@media only screen and (max-width: 480px)", ".a"])
            .is_some());
    }

    #[test]
    fn test_node_count_and_empty() {
        let node = StyleNode::root().child(StyleNode::new(".a").child(StyleNode::new(".b")));
        assert_eq!(node.node_count(), 3);
        assert!(node.find(&[".a", ".b"]).unwrap().is_empty());
        assert!(!node.is_empty());
    }

    #[test]
    fn test_serialize_as_nested_map() {
        let node = StyleNode::root().child(
            StyleNode::new(".a")
                .prop("minWidth", 80)
                .prop("display", "flex")
                .child(StyleNode::new("&:hover").prop("color", "red")),
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                ".a": {
                    "minWidth": 80.0,
                    "display": "flex",
                    "&:hover": { "color": "red" }
                }
            })
        );
    }
}
