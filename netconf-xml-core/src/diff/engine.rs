use std::collections::HashSet;

use crate::diff::entry::DiffEntry;
use crate::keys::KeyConfig;
use crate::XmlNode;

/// Configures tree diff behavior.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Key fields used to match repeated same-tag elements by identity.
    pub keys: KeyConfig,
}

/// Diff two trees with default (Junos name-keyed) options.
pub fn diff(left: &XmlNode, right: &XmlNode) -> Vec<DiffEntry> {
    diff_with_options(left, right, &DiffOptions::default())
}

/// Diff two trees with custom options.
pub fn diff_with_options(left: &XmlNode, right: &XmlNode, opts: &DiffOptions) -> Vec<DiffEntry> {
    let mut out = Vec::new();
    if left.tag != right.tag {
        out.push(DiffEntry::Changed {
            path: left.tag.clone(),
            from: format!("<{}>", left.tag),
            to: format!("<{}>", right.tag),
        });
        return out;
    }
    let root_path = left.tag.clone();
    diff_node(left, right, &root_path, opts, &mut out);
    out
}

fn diff_node(
    left: &XmlNode,
    right: &XmlNode,
    path: &str,
    opts: &DiffOptions,
    out: &mut Vec<DiffEntry>,
) {
    if left.attributes != right.attributes
        || normalize_text(&left.text) != normalize_text(&right.text)
    {
        out.push(DiffEntry::Changed {
            path: path.to_string(),
            from: local_signature(left),
            to: local_signature(right),
        });
    }

    let mut tags = Vec::new();
    for child in left.children.iter().chain(right.children.iter()) {
        if !tags.iter().any(|t| t == &child.tag) {
            tags.push(child.tag.clone());
        }
    }

    for tag in tags {
        let left_nodes: Vec<&XmlNode> = left.children.iter().filter(|n| n.tag == tag).collect();
        let right_nodes: Vec<&XmlNode> = right.children.iter().filter(|n| n.tag == tag).collect();

        match opts.keys.key_for(&tag) {
            Some(key) if has_keyed_entry(&left_nodes, key) || has_keyed_entry(&right_nodes, key) => {
                diff_keyed(&tag, key, &left_nodes, &right_nodes, path, opts, out);
            }
            _ => diff_positional(&tag, &left_nodes, &right_nodes, path, opts, out),
        }
    }
}

fn has_keyed_entry(nodes: &[&XmlNode], key: &str) -> bool {
    nodes.iter().any(|n| n.get_text(&[key]).is_some())
}

fn diff_positional(
    tag: &str,
    left_nodes: &[&XmlNode],
    right_nodes: &[&XmlNode],
    parent_path: &str,
    opts: &DiffOptions,
    out: &mut Vec<DiffEntry>,
) {
    let repeated = left_nodes.len().max(right_nodes.len()) > 1;
    for i in 0..left_nodes.len().max(right_nodes.len()) {
        let child_path = if repeated {
            format!("{parent_path}/{tag}[{}]", i + 1)
        } else {
            format!("{parent_path}/{tag}")
        };
        match (left_nodes.get(i), right_nodes.get(i)) {
            (Some(l), Some(r)) => diff_node(l, r, &child_path, opts, out),
            (Some(l), None) => report_one_sided(l, &child_path, opts, Side::Removed, out),
            (None, Some(r)) => report_one_sided(r, &child_path, opts, Side::Added, out),
            (None, None) => {}
        }
    }
}

fn diff_keyed(
    tag: &str,
    key: &str,
    left_nodes: &[&XmlNode],
    right_nodes: &[&XmlNode],
    parent_path: &str,
    opts: &DiffOptions,
    out: &mut Vec<DiffEntry>,
) {
    let right_keys: Vec<Option<&str>> = right_nodes.iter().map(|n| n.get_text(&[key])).collect();
    let mut used_right: HashSet<usize> = HashSet::new();

    for (left_idx, left_node) in left_nodes.iter().enumerate() {
        let left_key = left_node.get_text(&[key]);
        let child_path = entry_path(parent_path, tag, left_key, left_idx);

        let matched = left_key.and_then(|wanted| {
            right_keys
                .iter()
                .enumerate()
                .find(|(idx, k)| !used_right.contains(idx) && **k == Some(wanted))
                .map(|(idx, _)| idx)
        });

        if let Some(right_idx) = matched {
            used_right.insert(right_idx);
            diff_node(left_node, right_nodes[right_idx], &child_path, opts, out);
        } else {
            report_one_sided(left_node, &child_path, opts, Side::Removed, out);
        }
    }

    for (right_idx, right_node) in right_nodes.iter().enumerate() {
        if used_right.contains(&right_idx) {
            continue;
        }
        let child_path = entry_path(parent_path, tag, right_node.get_text(&[key]), right_idx);
        report_one_sided(right_node, &child_path, opts, Side::Added, out);
    }
}

#[derive(Clone, Copy)]
enum Side {
    Added,
    Removed,
}

/// Report a node present on one side only. Unkeyed bare containers are
/// descended so additions and removals surface at list-entry granularity
/// (`…/filter[f1]`) rather than as one opaque subtree.
fn report_one_sided(
    node: &XmlNode,
    path: &str,
    opts: &DiffOptions,
    side: Side,
    out: &mut Vec<DiffEntry>,
) {
    let is_entry = opts
        .keys
        .key_for(&node.tag)
        .is_some_and(|key| node.get_text(&[key]).is_some());
    let bare_container = node.attributes.is_empty() && node.text.is_none();

    if !is_entry && bare_container && !node.children.is_empty() {
        let mut tags = Vec::new();
        for child in &node.children {
            if !tags.iter().any(|t| t == &child.tag) {
                tags.push(child.tag.clone());
            }
        }
        for tag in tags {
            let nodes: Vec<&XmlNode> = node.children.iter().filter(|n| n.tag == tag).collect();
            let keyed = opts
                .keys
                .key_for(&tag)
                .filter(|key| has_keyed_entry(&nodes, key));
            let repeated = nodes.len() > 1;
            for (idx, child) in nodes.iter().enumerate() {
                let child_path = match keyed {
                    Some(key) => entry_path(path, &tag, child.get_text(&[key]), idx),
                    None if repeated => format!("{path}/{tag}[{}]", idx + 1),
                    None => format!("{path}/{tag}"),
                };
                report_one_sided(child, &child_path, opts, side, out);
            }
        }
        return;
    }

    out.push(match side {
        Side::Added => DiffEntry::Added {
            path: path.to_string(),
            node: node.clone(),
        },
        Side::Removed => DiffEntry::Removed {
            path: path.to_string(),
            node: node.clone(),
        },
    });
}

fn entry_path(parent_path: &str, tag: &str, key: Option<&str>, idx: usize) -> String {
    match key {
        Some(key) => format!("{parent_path}/{tag}[{key}]"),
        None => format!("{parent_path}/{tag}[{}]", idx + 1),
    }
}

fn normalize_text(input: &Option<String>) -> Option<&str> {
    input.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn local_signature(node: &XmlNode) -> String {
    format!(
        "attributes={:?}, text={:?}",
        node.attributes,
        normalize_text(&node.text)
    )
}
