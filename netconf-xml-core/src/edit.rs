//! Edit-config staging: apply a rendered request subtree to a datastore tree.
//!
//! Containers without identity merge recursively and are created on demand.
//! A node carrying its configured key leaf is a list entry: it replaces the
//! key-matched entry wholesale (replace-mode apply), and a `delete="delete"`
//! marker removes the matched entry instead. An `active="active"` marker is
//! consumed during staging by clearing any stored `inactive` marker, so a
//! staged tree never diverges from a converged datastore.

use thiserror::Error;

use crate::keys::KeyConfig;
use crate::XmlNode;

/// Errors produced while staging a request subtree.
#[derive(Debug, Error)]
pub enum EditError {
    /// A keyed list was addressed by an entry missing its key leaf.
    #[error("cannot address entry <{tag}> in a keyed list without its <{key}> leaf")]
    AmbiguousEntry { tag: String, key: String },
}

/// Stage `incoming` (a request subtree, e.g. `<firewall>…`) into `target`
/// (the datastore root, e.g. `<configuration>`).
pub fn stage(target: &mut XmlNode, incoming: &XmlNode, keys: &KeyConfig) -> Result<(), EditError> {
    stage_child(target, incoming, keys)
}

fn stage_child(parent: &mut XmlNode, incoming: &XmlNode, keys: &KeyConfig) -> Result<(), EditError> {
    let key_field = keys.key_for(&incoming.tag);
    let key_value = key_field.and_then(|key| incoming.get_text(&[key]).map(ToString::to_string));
    let delete = is_delete(incoming);

    let matched = match (key_field, &key_value) {
        (Some(key), Some(value)) => parent.children.iter().position(|child| {
            child.tag == incoming.tag && child.get_text(&[key]) == Some(value.as_str())
        }),
        (Some(key), None) => {
            let keyed_siblings = parent
                .children
                .iter()
                .any(|child| child.tag == incoming.tag && child.get_text(&[key]).is_some());
            if keyed_siblings {
                return Err(EditError::AmbiguousEntry {
                    tag: incoming.tag.clone(),
                    key: key.to_string(),
                });
            }
            parent
                .children
                .iter()
                .position(|child| child.tag == incoming.tag)
        }
        (None, _) => parent
            .children
            .iter()
            .position(|child| child.tag == incoming.tag),
    };

    if delete {
        if let Some(idx) = matched {
            parent.children.remove(idx);
        }
        return Ok(());
    }

    if key_value.is_some() {
        // List entry: wholesale replace by identity.
        let replacement = strip_markers(incoming);
        match matched {
            Some(idx) => parent.children[idx] = replacement,
            None => parent.children.push(replacement),
        }
        return Ok(());
    }

    if incoming.children.is_empty() {
        // Leaf: replace text and attributes in place.
        let replacement = strip_markers(incoming);
        match matched {
            Some(idx) => parent.children[idx] = replacement,
            None => parent.children.push(replacement),
        }
        return Ok(());
    }

    // Plain container: merge recursively, creating it when missing.
    let created = matched.is_none();
    let idx = match matched {
        Some(idx) => idx,
        None => {
            parent.children.push(XmlNode::new(incoming.tag.clone()));
            parent.children.len() - 1
        }
    };
    merge_marker_attrs(&mut parent.children[idx], incoming);
    for child in &incoming.children {
        stage_child(&mut parent.children[idx], child, keys)?;
    }

    // A container created only to carry a delete that turned out to be a
    // no-op must not linger, or a converged datastore would show a diff.
    if created {
        let node = &parent.children[idx];
        if node.children.is_empty() && node.attributes.is_empty() && node.text.is_none() {
            parent.children.remove(idx);
        }
    }
    Ok(())
}

fn is_delete(node: &XmlNode) -> bool {
    node.attr("delete").is_some() || node.attr("operation") == Some("delete")
}

/// Copy attributes onto an existing container, consuming `active` markers.
fn merge_marker_attrs(existing: &mut XmlNode, incoming: &XmlNode) {
    for (key, value) in &incoming.attributes {
        if key == "active" {
            existing.remove_attr("inactive");
        } else {
            existing.set_attr(key.clone(), value.clone());
        }
    }
}

/// Deep-copy a node with transient `active` markers removed.
fn strip_markers(node: &XmlNode) -> XmlNode {
    let mut out = node.clone();
    strip_markers_in_place(&mut out);
    out
}

fn strip_markers_in_place(node: &mut XmlNode) {
    node.remove_attr("active");
    for child in &mut node.children {
        strip_markers_in_place(child);
    }
}
