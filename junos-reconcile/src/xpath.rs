//! Generic field-to-xpath expansion: turns a resolved [`ConfigItem`] into an
//! anchor-rooted element tree. Agnostic to firewall vs. routing semantics.

use netconf_xml_core::XmlNode;

use crate::model::{ConfigItem, RenderedRequest, State};

/// Maps one logical field to its location in the device configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpathSpec {
    /// Leaf path relative to the anchor container (or to `top` when set).
    pub xpath: String,
    /// Optional container path, relative to the anchor container, overriding
    /// the default placement. Fields sharing a `top` land in the same subtree.
    pub top: Option<String>,
    /// Marks the field that determines node identity for merge/delete
    /// targeting. At most one key field per logical entity.
    pub is_key: bool,
}

impl XpathSpec {
    /// A plain field at `xpath` under the anchor container.
    pub fn new(xpath: impl Into<String>) -> Self {
        Self {
            xpath: xpath.into(),
            top: None,
            is_key: false,
        }
    }

    /// The identity key field.
    pub fn key(xpath: impl Into<String>) -> Self {
        Self {
            is_key: true,
            ..Self::new(xpath)
        }
    }

    /// A field placed under `top` instead of the anchor container.
    pub fn under(xpath: impl Into<String>, top: impl Into<String>) -> Self {
        Self {
            top: Some(top.into()),
            ..Self::new(xpath)
        }
    }
}

/// Build the request tree for one item.
///
/// Every set field in spec order becomes a leaf at
/// `anchor/(top-or-anchor)/xpath`; unset fields are omitted entirely, never
/// rendered as empty nodes. The innermost anchor container carries the
/// lifecycle markers: `delete="delete"` for absent state, and one of
/// `active="active"` / `inactive="inactive"`.
pub fn map_item_to_tree(
    specs: &[(&str, XpathSpec)],
    anchor: &str,
    item: &ConfigItem,
) -> RenderedRequest {
    let mut segments = anchor.split('/').filter(|s| !s.is_empty());
    let root_tag = segments.next().unwrap_or(anchor);
    let rest: Vec<&str> = segments.collect();

    let mut root = XmlNode::new(root_tag);

    {
        let container = ensure_path(&mut root, &rest);
        if item.state == State::Absent {
            container.set_attr("delete", "delete");
        }
        if item.active {
            container.set_attr("active", "active");
        } else {
            container.set_attr("inactive", "inactive");
        }
    }

    // Key fields first: the identity leaf must be the first child of its
    // container for the device to address the entry.
    let ordered = specs
        .iter()
        .filter(|(_, spec)| spec.is_key)
        .chain(specs.iter().filter(|(_, spec)| !spec.is_key));

    for (field, spec) in ordered {
        let Some(value) = item.fields.get(*field) else {
            continue;
        };

        let container = ensure_path(&mut root, &rest);
        let container = match &spec.top {
            Some(top) => {
                let top_segments: Vec<&str> = top.split('/').filter(|s| !s.is_empty()).collect();
                ensure_path(container, &top_segments)
            }
            None => container,
        };

        let mut leaf_path: Vec<&str> = spec.xpath.split('/').filter(|s| !s.is_empty()).collect();
        let leaf_tag = leaf_path.pop().unwrap_or(spec.xpath.as_str());
        let parent = ensure_path(container, &leaf_path);
        parent.children.push(XmlNode::leaf(leaf_tag, value.clone()));
    }

    RenderedRequest {
        anchor: anchor.to_string(),
        tree: root,
    }
}

fn ensure_path<'a>(mut node: &'a mut XmlNode, segments: &[&str]) -> &'a mut XmlNode {
    for segment in segments {
        node = node.get_or_create_child(segment);
    }
    node
}
