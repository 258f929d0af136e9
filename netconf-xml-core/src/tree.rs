use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// A generic configuration tree node.
///
/// Children and attributes both keep insertion order. Device-side parsers are
/// order-sensitive for some blocks, and NETCONF marker attributes such as
/// `delete="delete"` or `inactive="inactive"` must survive round trips intact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlNode {
    /// Element tag name.
    pub tag: String,
    /// XML attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Optional text content.
    pub text: Option<String>,
}

impl XmlNode {
    /// Create a new node with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a leaf node carrying text content.
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.text = Some(text.into());
        node
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }

    /// Return the first child with the provided tag, creating it if missing.
    pub fn get_or_create_child(&mut self, tag: &str) -> &mut XmlNode {
        let idx = match self.children.iter().position(|child| child.tag == tag) {
            Some(idx) => idx,
            None => {
                self.children.push(XmlNode::new(tag));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Walk a nested child path and return terminal node text if found.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        if path.is_empty() {
            return self.text.as_deref();
        }

        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        current.text.as_deref()
    }

    /// Return the value of an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attributes.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = value;
            return;
        }
        self.attributes.push((name, value));
    }

    /// Remove an attribute by name; returns true when one was removed.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        self.attributes.len() != before
    }

    /// Depth-first search for the first descendant (or self) with the tag.
    pub fn find_descendant(&self, tag: &str) -> Option<&XmlNode> {
        if self.tag == tag {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_descendant(tag))
    }

    /// Depth-first search for the first descendant (or self) with the tag, mutably.
    pub fn find_descendant_mut(&mut self, tag: &str) -> Option<&mut XmlNode> {
        if self.tag == tag {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_descendant_mut(tag))
    }
}

impl Display for XmlNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return write!(f, "/>");
        }

        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::XmlNode;

    #[test]
    fn get_text_walks_nested_path() {
        let mut root = XmlNode::new("configuration");
        let mut filter = XmlNode::new("filter");
        filter.children.push(XmlNode::leaf("name", "f1"));
        root.children.push(filter);

        assert_eq!(root.get_text(&["filter", "name"]), Some("f1"));
    }

    #[test]
    fn set_attr_replaces_in_place_and_keeps_order() {
        let mut node = XmlNode::new("filter");
        node.set_attr("inactive", "inactive");
        node.set_attr("delete", "delete");
        node.set_attr("inactive", "inactive");

        let keys: Vec<&str> = node.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["inactive", "delete"]);
    }

    #[test]
    fn find_descendant_locates_nested_container() {
        let mut root = XmlNode::new("firewall");
        let mut family = XmlNode::new("family");
        let mut inet = XmlNode::new("inet");
        inet.children.push(XmlNode::new("filter"));
        family.children.push(inet);
        root.children.push(family);

        assert!(root.find_descendant("filter").is_some());
        assert!(root.find_descendant("term").is_none());
    }
}
