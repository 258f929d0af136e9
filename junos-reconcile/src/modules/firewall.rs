//! Firewall filter management: one filter per unit, with ordered terms.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::{RenderedRequest, State, Term, TransactionResult};
use crate::modules::ModuleError;
use crate::normalize::{normalize, UnitParams};
use crate::render::append_terms;
use crate::session::Session;
use crate::transaction::{self, Mode};
use crate::xpath::{map_item_to_tree, XpathSpec};

const DEFAULT_FAMILY: &str = "inet";

/// Raw parameters for a firewall filter invocation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirewallParams {
    /// Name of the filter.
    #[serde(default)]
    pub name: Option<String>,
    /// Address family the filter applies to; defaults to `inet`.
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub terms: Option<Vec<Term>>,
    #[serde(default)]
    pub state: Option<State>,
    #[serde(default)]
    pub active: Option<bool>,
    /// List of filter definitions processed as one batched invocation.
    #[serde(default)]
    pub aggregate: Option<Vec<FirewallEntry>>,
}

/// One entry of a firewall aggregate list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirewallEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub terms: Option<Vec<Term>>,
    #[serde(default)]
    pub state: Option<State>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Build one rendered request per resolved filter.
pub fn build_requests(params: &FirewallParams) -> Result<Vec<RenderedRequest>, ModuleError> {
    let defaults = unit_params(
        params.name.clone(),
        // Module-level default: entries without a family fall back here.
        params
            .family
            .clone()
            .or_else(|| Some(DEFAULT_FAMILY.to_string())),
        params.terms.clone(),
        params.state,
        params.active,
    );
    let aggregate: Option<Vec<UnitParams>> = params.aggregate.as_ref().map(|entries| {
        entries
            .iter()
            .map(|e| {
                unit_params(
                    e.name.clone(),
                    e.family.clone(),
                    e.terms.clone(),
                    e.state,
                    e.active,
                )
            })
            .collect()
    });

    let items = normalize(&defaults, aggregate.as_deref(), "name", &[])?;

    let specs = vec![("name", XpathSpec::key("name"))];
    let mut requests = Vec::with_capacity(items.len());
    for item in items {
        let family = item
            .fields
            .get("family")
            .cloned()
            .unwrap_or_else(|| DEFAULT_FAMILY.to_string());
        let anchor = format!("firewall/family/{family}/filter");
        let mut request = map_item_to_tree(&specs, &anchor, &item);
        append_terms(&mut request.tree, "filter", &item.terms)?;
        requests.push(request);
    }
    Ok(requests)
}

/// Reconcile firewall filters against a device session.
pub fn run(
    session: &mut dyn Session,
    params: &FirewallParams,
    mode: Mode,
) -> Result<TransactionResult, ModuleError> {
    let requests = build_requests(params)?;
    Ok(transaction::run(session, &requests, mode)?)
}

fn unit_params(
    name: Option<String>,
    family: Option<String>,
    terms: Option<Vec<Term>>,
    state: Option<State>,
    active: Option<bool>,
) -> UnitParams {
    let mut fields = IndexMap::new();
    fields.insert("name".to_string(), name);
    fields.insert("family".to_string(), family);
    UnitParams {
        fields,
        state,
        active,
        terms,
    }
}
