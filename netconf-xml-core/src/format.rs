use crate::diff::DiffEntry;

/// Format diff entries as plain text.
pub fn format_text(entries: &[DiffEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            DiffEntry::Added { path, .. } => lines.push(format!("+ {path}")),
            DiffEntry::Removed { path, .. } => lines.push(format!("- {path}")),
            DiffEntry::Changed { path, from, to } => {
                lines.push(format!("~ {path}"));
                lines.push(format!("  from: {from}"));
                lines.push(format!("  to:   {to}"));
            }
        }
    }
    lines.join("\n")
}

/// Format diff entries as pretty-printed JSON.
pub fn format_json(entries: &[DiffEntry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::format_text;
    use crate::diff::DiffEntry;
    use crate::XmlNode;

    #[test]
    fn text_format_prefixes_entries() {
        let entries = vec![
            DiffEntry::Added {
                path: "configuration/filter[f1]".to_string(),
                node: XmlNode::new("filter"),
            },
            DiffEntry::Removed {
                path: "configuration/filter[f2]".to_string(),
                node: XmlNode::new("filter"),
            },
        ];

        let text = format_text(&entries);
        assert!(text.contains("+ configuration/filter[f1]"));
        assert!(text.contains("- configuration/filter[f2]"));
    }
}
