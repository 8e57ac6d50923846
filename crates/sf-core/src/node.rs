use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One element of the level tree format.
///
/// The tag names a registered type (or a structural element such as
/// `entities`); scalar fields live in `attributes`, nested values in
/// `children`, and opaque payloads such as SNBT in `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Element name.
    pub tag: String,
    /// Scalar fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Nested elements, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// An empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    /// Builder-style child.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text payload.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Look up a scalar field.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// A scalar field that must be present.
    pub fn required_attr(&self, key: &str) -> CoreResult<&str> {
        self.attr(key)
            .ok_or_else(|| CoreError::malformed(&self.tag, format!("missing \"{key}\"")))
    }

    /// Parse a required scalar field.
    pub fn parse_attr<T: std::str::FromStr>(&self, key: &str) -> CoreResult<T> {
        let raw = self.required_attr(key)?;
        raw.parse()
            .map_err(|_| CoreError::malformed(&self.tag, format!("bad \"{key}\" value \"{raw}\"")))
    }

    /// First child with a given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Parse a tree from JSON text.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the tree as pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let node = Node::new("int_attribute")
            .with_attr("value", 5)
            .with_child(Node::new("nbt").with_text("{}"));
        assert_eq!(node.attr("value"), Some("5"));
        assert_eq!(node.parse_attr::<i32>("value").unwrap(), 5);
        assert_eq!(node.child("nbt").and_then(|n| n.text.as_deref()), Some("{}"));
        assert!(node.child("missing").is_none());
    }

    #[test]
    fn bad_fields_are_malformed() {
        let node = Node::new("int_attribute").with_attr("value", "five");
        assert!(matches!(
            node.parse_attr::<i32>("value"),
            Err(CoreError::MalformedNode { .. })
        ));
        assert!(node.required_attr("other").is_err());
    }

    #[test]
    fn json_omits_empty_parts() {
        let json = Node::new("level").to_json().unwrap();
        assert_eq!(json, "{\n  \"tag\": \"level\"\n}");
        let back = Node::from_json(&json).unwrap();
        assert_eq!(back, Node::new("level"));
    }
}
