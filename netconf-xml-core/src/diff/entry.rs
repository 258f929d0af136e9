use serde::Serialize;

use crate::XmlNode;

/// A single diff outcome for a node path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DiffEntry {
    /// Node only in the right (candidate) tree.
    Added { path: String, node: XmlNode },
    /// Node only in the left (running) tree.
    Removed { path: String, node: XmlNode },
    /// Node exists in both but text or attributes differ.
    Changed {
        path: String,
        from: String,
        to: String,
    },
}

impl DiffEntry {
    /// The node path this entry refers to.
    pub fn path(&self) -> &str {
        match self {
            DiffEntry::Added { path, .. }
            | DiffEntry::Removed { path, .. }
            | DiffEntry::Changed { path, .. } => path,
        }
    }
}
