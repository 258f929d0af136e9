//! Term rendering: serializes nested condition/action blocks into ordered
//! element trees under the request's repeating container.

use netconf_xml_core::XmlNode;
use thiserror::Error;

use crate::model::{FieldValue, Term};

/// Errors produced while appending term blocks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The repeating container was not found anywhere in the request tree.
    #[error("no <{0}> container found in request tree")]
    ContainerNotFound(String),
}

/// Append one `<term>` element per entry under the repeating container.
///
/// The container is located by nearest-descendant search for `container_tag`
/// (e.g. `filter`). An empty term list leaves the tree unmodified. A term with
/// neither sub-block still gets a name-only node; the device accepts it as a
/// no-effect placeholder.
pub fn append_terms(
    tree: &mut XmlNode,
    container_tag: &str,
    terms: &[Term],
) -> Result<(), RenderError> {
    if terms.is_empty() {
        return Ok(());
    }

    let container = tree
        .find_descendant_mut(container_tag)
        .ok_or_else(|| RenderError::ContainerNotFound(container_tag.to_string()))?;

    for (index, term) in terms.iter().enumerate() {
        container.children.push(term_node(term, index));
    }
    Ok(())
}

fn term_node(term: &Term, index: usize) -> XmlNode {
    let mut node = XmlNode::new("term");
    let name = term
        .name
        .clone()
        .unwrap_or_else(|| format!("term_{index}"));
    node.children.push(XmlNode::leaf("name", name));

    for (tag, block) in [("from", &term.from), ("then", &term.then)] {
        if block.is_empty() {
            continue;
        }
        let mut block_node = XmlNode::new(tag);
        for (field, value) in block {
            match value {
                FieldValue::Scalar(text) => {
                    block_node.children.push(XmlNode::leaf(field, text.clone()));
                }
                FieldValue::List(values) => {
                    for text in values {
                        block_node.children.push(XmlNode::leaf(field, text.clone()));
                    }
                }
                FieldValue::Flag => block_node.children.push(XmlNode::new(field)),
            }
        }
        node.children.push(block_node);
    }

    node
}
