//! Policy-based routing: static routes inside a forwarding routing instance.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::{RenderedRequest, State, TransactionResult};
use crate::modules::ModuleError;
use crate::normalize::{normalize, UnitParams};
use crate::session::Session;
use crate::transaction::{self, Mode};
use crate::xpath::{map_item_to_tree, XpathSpec};

const ANCHOR: &str = "routing-instances/instance";
const ROUTE_TOP: &str = "routing-options/static/route";

/// Raw parameters for a policy-based-routing invocation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PbrParams {
    /// Name of the routing instance.
    #[serde(default)]
    pub name: Option<String>,
    /// Network address with prefix of the static route.
    #[serde(default, alias = "prefix")]
    pub address: Option<String>,
    /// Next hop IP of the static route.
    #[serde(default)]
    pub next_hop: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<State>,
    #[serde(default)]
    pub active: Option<bool>,
    /// List of static route definitions processed as one batched invocation.
    #[serde(default)]
    pub aggregate: Option<Vec<PbrEntry>>,
}

/// One entry of a pbr aggregate list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PbrEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "prefix")]
    pub address: Option<String>,
    #[serde(default)]
    pub next_hop: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<State>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Build one rendered request per resolved route.
pub fn build_requests(params: &PbrParams) -> Result<Vec<RenderedRequest>, ModuleError> {
    let defaults = unit_params(
        params.name.clone(),
        params.address.clone(),
        params.next_hop.clone(),
        params.description.clone(),
        params.state,
        params.active,
    );
    let aggregate: Option<Vec<UnitParams>> = params.aggregate.as_ref().map(|entries| {
        entries
            .iter()
            .map(|e| {
                unit_params(
                    e.name.clone(),
                    e.address.clone(),
                    e.next_hop.clone(),
                    e.description.clone(),
                    e.state,
                    e.active,
                )
            })
            .collect()
    });

    let mut items = normalize(
        &defaults,
        aggregate.as_deref(),
        "address",
        &[("address", "next_hop")],
    )?;

    let specs = vec![
        ("name", XpathSpec::key("name")),
        ("description", XpathSpec::new("description")),
        ("type", XpathSpec::new("instance-type")),
        ("address", XpathSpec::under("name", ROUTE_TOP)),
        ("next_hop", XpathSpec::under("next-hop", ROUTE_TOP)),
    ];

    let mut requests = Vec::with_capacity(items.len());
    for item in &mut items {
        // Policy-based routing always uses a forwarding instance.
        item.fields
            .insert("type".to_string(), "forwarding".to_string());
        requests.push(map_item_to_tree(&specs, ANCHOR, item));
    }
    Ok(requests)
}

/// Reconcile policy-based routes against a device session.
pub fn run(
    session: &mut dyn Session,
    params: &PbrParams,
    mode: Mode,
) -> Result<TransactionResult, ModuleError> {
    let requests = build_requests(params)?;
    Ok(transaction::run(session, &requests, mode)?)
}

fn unit_params(
    name: Option<String>,
    address: Option<String>,
    next_hop: Option<String>,
    description: Option<String>,
    state: Option<State>,
    active: Option<bool>,
) -> UnitParams {
    let mut fields = IndexMap::new();
    fields.insert("name".to_string(), name);
    fields.insert("address".to_string(), address);
    fields.insert("next_hop".to_string(), next_hop);
    fields.insert("description".to_string(), description);
    UnitParams {
        fields,
        state,
        active,
        terms: None,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_requests, PbrParams};
    use crate::modules::ModuleError;
    use crate::normalize::ValidationError;

    fn base_params() -> PbrParams {
        PbrParams {
            name: Some("pbr1".to_string()),
            address: Some("0.0.0.0/0".to_string()),
            next_hop: Some("192.168.199.3".to_string()),
            ..PbrParams::default()
        }
    }

    #[test]
    fn route_renders_under_instance_and_route_top() {
        let requests = build_requests(&base_params()).expect("build");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].anchor, "routing-instances/instance");

        let instance = requests[0].tree.get_child("instance").expect("instance");
        assert_eq!(instance.get_text(&["name"]), Some("pbr1"));
        assert_eq!(instance.get_text(&["instance-type"]), Some("forwarding"));
        assert_eq!(
            instance.get_text(&["routing-options", "static", "route", "name"]),
            Some("0.0.0.0/0")
        );
        assert_eq!(
            instance.get_text(&["routing-options", "static", "route", "next-hop"]),
            Some("192.168.199.3")
        );
    }

    #[test]
    fn address_without_next_hop_is_rejected() {
        let params = PbrParams {
            next_hop: None,
            ..base_params()
        };

        let err = build_requests(&params).expect_err("must fail");
        assert!(matches!(
            err,
            ModuleError::Validation(ValidationError::MissingPairMember { .. })
        ));
    }

    #[test]
    fn absent_route_marks_instance_for_delete() {
        let params = PbrParams {
            state: Some(crate::model::State::Absent),
            next_hop: None,
            ..base_params()
        };

        let requests = build_requests(&params).expect("absent skips pair check");
        let instance = requests[0].tree.get_child("instance").expect("instance");
        assert_eq!(instance.attr("delete"), Some("delete"));
    }
}
