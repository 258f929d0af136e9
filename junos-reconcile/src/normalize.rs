//! Parameter normalization: aggregate expansion, defaults merging, and
//! structural validation, all before any network interaction.

use indexmap::IndexMap;
use thiserror::Error;

use crate::model::{ConfigItem, State, Term};

/// Raw, possibly-partial parameters for one configuration unit.
///
/// `fields` holds scalar fields by logical name; a `None` value means the
/// caller supplied the field slot without a value and it falls back to the
/// shared defaults field-by-field.
#[derive(Debug, Clone, Default)]
pub struct UnitParams {
    pub fields: IndexMap<String, Option<String>>,
    pub state: Option<State>,
    pub active: Option<bool>,
    pub terms: Option<Vec<Term>>,
}

/// Structural validation failures, reported before any transport call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither `aggregate` nor the singular identity field was supplied.
    #[error("one of `aggregate` or `{0}` is required")]
    MissingIdentity(String),
    /// Both `aggregate` and the singular identity field were supplied.
    #[error("`aggregate` and `{0}` are mutually exclusive")]
    MutuallyExclusive(String),
    /// An aggregate entry is missing its required identity field.
    #[error("aggregate entry is missing required field `{0}`")]
    MissingRequiredField(String),
    /// One member of a required-together pair was supplied without the other.
    #[error("parameters are required together: `{present}` was given without `{missing}`")]
    MissingPairMember { present: String, missing: String },
}

/// Resolve raw parameters into one [`ConfigItem`] per logical unit.
///
/// `unit` carries the singular parameters, which double as shared defaults
/// when `aggregate` is supplied. Exactly one of the aggregate list or the
/// singular identity field must be present. Fallback is field-by-field, never
/// whole-object. `required_together` pairs are enforced only on items whose
/// resolved state is `present`.
pub fn normalize(
    unit: &UnitParams,
    aggregate: Option<&[UnitParams]>,
    identity_field: &str,
    required_together: &[(&str, &str)],
) -> Result<Vec<ConfigItem>, ValidationError> {
    let singular_identity = field_value(unit, identity_field).is_some();

    let entries: Vec<UnitParams> = match (aggregate, singular_identity) {
        (Some(_), true) => {
            return Err(ValidationError::MutuallyExclusive(
                identity_field.to_string(),
            ))
        }
        (None, false) => {
            return Err(ValidationError::MissingIdentity(identity_field.to_string()))
        }
        (Some(list), false) => list.to_vec(),
        (None, true) => vec![unit.clone()],
    };

    let is_aggregate = aggregate.is_some();
    let mut items = Vec::with_capacity(entries.len());
    for entry in &entries {
        let item = resolve(entry, unit);
        if !item.fields.contains_key(identity_field) {
            if is_aggregate {
                return Err(ValidationError::MissingRequiredField(
                    identity_field.to_string(),
                ));
            }
            return Err(ValidationError::MissingIdentity(identity_field.to_string()));
        }
        if item.state == State::Present {
            check_required_together(&item, required_together)?;
        }
        items.push(item);
    }

    Ok(items)
}

/// Pure field-by-field merge of one entry over the shared defaults.
fn resolve(entry: &UnitParams, defaults: &UnitParams) -> ConfigItem {
    let mut fields = IndexMap::new();
    for (name, default_value) in &defaults.fields {
        let value = match entry.fields.get(name) {
            Some(Some(own)) => Some(own.clone()),
            _ => default_value.clone(),
        };
        if let Some(value) = value {
            fields.insert(name.clone(), value);
        }
    }
    for (name, value) in &entry.fields {
        if fields.contains_key(name) {
            continue;
        }
        if let Some(value) = value {
            fields.insert(name.clone(), value.clone());
        }
    }

    ConfigItem {
        fields,
        state: entry.state.or(defaults.state).unwrap_or_default(),
        active: entry.active.or(defaults.active).unwrap_or(true),
        terms: entry
            .terms
            .clone()
            .or_else(|| defaults.terms.clone())
            .unwrap_or_default(),
    }
}

fn check_required_together(
    item: &ConfigItem,
    pairs: &[(&str, &str)],
) -> Result<(), ValidationError> {
    for (a, b) in pairs {
        let has_a = item.fields.contains_key(*a);
        let has_b = item.fields.contains_key(*b);
        match (has_a, has_b) {
            (true, false) => {
                return Err(ValidationError::MissingPairMember {
                    present: (*a).to_string(),
                    missing: (*b).to_string(),
                })
            }
            (false, true) => {
                return Err(ValidationError::MissingPairMember {
                    present: (*b).to_string(),
                    missing: (*a).to_string(),
                })
            }
            _ => {}
        }
    }
    Ok(())
}

fn field_value<'a>(unit: &'a UnitParams, name: &str) -> Option<&'a str> {
    unit.fields.get(name).and_then(|v| v.as_deref())
}
