use std::collections::HashMap;

/// Key-field lookup used for identity matching of repeated elements.
///
/// A node whose tag resolves to a key field, and which carries that key as a
/// child leaf, is treated as a list entry: diffing matches entries by key text
/// and edit-config staging replaces or deletes the matched entry wholesale.
/// Junos configuration lists are almost universally keyed by `name`, so that
/// is the default for every tag unless overridden.
#[derive(Debug, Clone)]
pub struct KeyConfig {
    overrides: HashMap<String, String>,
    default_key: Option<String>,
}

impl KeyConfig {
    /// Key config with the Junos `name` default and no per-tag overrides.
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            default_key: Some("name".to_string()),
        }
    }

    /// Key config with no default; only overridden tags are keyed.
    pub fn without_default() -> Self {
        Self {
            overrides: HashMap::new(),
            default_key: None,
        }
    }

    /// Override the key field for one tag.
    pub fn with_override(mut self, tag: impl Into<String>, key: impl Into<String>) -> Self {
        self.overrides.insert(tag.into(), key.into());
        self
    }

    /// The key field configured for a tag, if any.
    pub fn key_for(&self, tag: &str) -> Option<&str> {
        self.overrides
            .get(tag)
            .map(String::as_str)
            .or(self.default_key.as_deref())
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self::new()
    }
}
