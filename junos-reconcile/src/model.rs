use indexmap::IndexMap;
use netconf_xml_core::XmlNode;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Desired lifecycle of a configuration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// The unit must exist on the device.
    #[default]
    Present,
    /// The unit must be removed from the device.
    Absent,
}

/// One field value inside a term block.
///
/// `Flag` is the empty marker for presence-only actions (`accept`, `discard`,
/// `log`): it renders as a childless, textless leaf. In desired-state files a
/// flag is written as `accept = true`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
    Flag,
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Many(Vec<String>),
            Flag(bool),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(value) => Ok(FieldValue::Scalar(value)),
            Raw::Many(values) => Ok(FieldValue::List(values)),
            Raw::Flag(true) => Ok(FieldValue::Flag),
            Raw::Flag(false) => Err(de::Error::custom(
                "flag fields are written as `true`; omit the field instead of setting `false`",
            )),
            Raw::Number(value) => Ok(FieldValue::Scalar(value.to_string())),
        }
    }
}

/// An ordered rule block combining a condition (`from`) and an action (`then`)
/// sub-block. Field order within each sub-block is preserved through
/// deserialization and rendering.
///
/// Unnamed terms are auto-named `term_<index>` by position, zero-based; the
/// assignment is stable for a given index.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Term {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub from: IndexMap<String, FieldValue>,
    #[serde(default)]
    pub then: IndexMap<String, FieldValue>,
}

/// A fully-resolved configuration unit, produced by the normalizer and
/// consumed once per apply cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigItem {
    /// Set fields only; unset fields are omitted from rendering entirely.
    pub fields: IndexMap<String, String>,
    pub state: State,
    pub active: bool,
    pub terms: Vec<Term>,
}

/// The materialized element tree for one [`ConfigItem`], rooted at the first
/// segment of its anchor path.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRequest {
    /// Anchor path in the device configuration tree, e.g.
    /// `firewall/family/inet/filter`.
    pub anchor: String,
    pub tree: XmlNode,
}

/// Outcome of one reconciliation invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionResult {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, Term};

    #[test]
    fn term_deserializes_scalars_lists_and_flags_in_order() {
        let term: Term = toml::from_str(
            r#"
            [from]
            source-address = ["10.0.0.1/32", "10.0.0.2/32"]
            protocol = "tcp"

            [then]
            count = "c1"
            accept = true
            "#,
        )
        .expect("term parses");

        let from_fields: Vec<&str> = term.from.keys().map(String::as_str).collect();
        assert_eq!(from_fields, vec!["source-address", "protocol"]);
        assert_eq!(
            term.from.get("source-address"),
            Some(&FieldValue::List(vec![
                "10.0.0.1/32".to_string(),
                "10.0.0.2/32".to_string()
            ]))
        );
        assert_eq!(term.then.get("accept"), Some(&FieldValue::Flag));
    }

    #[test]
    fn false_flag_is_rejected() {
        let err = toml::from_str::<Term>("[then]\naccept = false\n").expect_err("must fail");
        assert!(err.to_string().contains("flag fields"));
    }

    #[test]
    fn numeric_values_become_scalars() {
        let term: Term = toml::from_str("[from]\nport = 22\n").expect("term parses");
        assert_eq!(
            term.from.get("port"),
            Some(&FieldValue::Scalar("22".to_string()))
        );
    }
}
