use indexmap::IndexMap;
use junos_reconcile::candidate::CandidateSession;
use junos_reconcile::model::{FieldValue, State, Term};
use junos_reconcile::modules::firewall::{self, FirewallEntry, FirewallParams};
use junos_reconcile::modules::pbr::{self, PbrParams};
use junos_reconcile::modules::ModuleError;
use junos_reconcile::session::{Session, SessionError};
use junos_reconcile::transaction::{Mode, TransactionError};
use netconf_xml_core::{parse, XmlNode};
use pretty_assertions::assert_eq;

fn empty_datastore() -> XmlNode {
    parse(b"<configuration/>").expect("datastore parse")
}

fn discard_filter(name: &str) -> FirewallParams {
    let mut then = IndexMap::new();
    then.insert("discard".to_string(), FieldValue::Flag);
    FirewallParams {
        name: Some(name.to_string()),
        terms: Some(vec![Term {
            then,
            ..Term::default()
        }]),
        ..FirewallParams::default()
    }
}

/// Session wrapper recording every call for protocol assertions.
struct Recording<S> {
    inner: S,
    calls: Vec<&'static str>,
}

impl<S: Session> Recording<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| **c == name).count()
    }
}

impl<S: Session> Session for Recording<S> {
    fn lock(&mut self) -> Result<(), SessionError> {
        self.calls.push("lock");
        self.inner.lock()
    }

    fn unlock(&mut self) -> Result<(), SessionError> {
        self.calls.push("unlock");
        self.inner.unlock()
    }

    fn replace(&mut self, anchor: &str, tree: &XmlNode) -> Result<Option<String>, SessionError> {
        self.calls.push("replace");
        self.inner.replace(anchor, tree)
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        self.calls.push("commit");
        self.inner.commit()
    }

    fn discard(&mut self) -> Result<(), SessionError> {
        self.calls.push("discard");
        self.inner.discard()
    }
}

#[test]
fn discard_filter_applies_once_then_converges() {
    let mut session = CandidateSession::new(empty_datastore());
    let params = discard_filter("f1");

    let first = firewall::run(&mut session, &params, Mode::Apply).expect("first apply");
    assert!(first.changed);
    assert!(first.diff.expect("diff present").contains("filter[f1]"));

    let filter = session
        .running()
        .find_descendant("filter")
        .expect("filter committed");
    assert_eq!(filter.get_text(&["name"]), Some("f1"));
    let discard = filter
        .get_child("term")
        .and_then(|t| t.get_child("then"))
        .and_then(|t| t.get_child("discard"))
        .expect("empty discard leaf");
    assert!(discard.children.is_empty());
    assert!(discard.text.is_none());
    assert_eq!(
        filter.get_text(&["term", "name"]),
        Some("term_0"),
        "unnamed terms are auto-named positionally"
    );

    let second = firewall::run(&mut session, &params, Mode::Apply).expect("second apply");
    assert!(!second.changed);
    assert_eq!(second.diff, None);
}

#[test]
fn multi_valued_condition_renders_sibling_leaves_in_order() {
    let mut session = CandidateSession::new(empty_datastore());
    let mut from = IndexMap::new();
    from.insert(
        "source-address".to_string(),
        FieldValue::List(vec!["10.0.0.1/32".to_string(), "10.0.0.2/32".to_string()]),
    );
    let params = FirewallParams {
        name: Some("f1".to_string()),
        terms: Some(vec![Term {
            from,
            ..Term::default()
        }]),
        ..FirewallParams::default()
    };

    firewall::run(&mut session, &params, Mode::Apply).expect("apply");

    let from_node = session
        .running()
        .find_descendant("from")
        .expect("from container");
    let values: Vec<&str> = from_node
        .get_children("source-address")
        .iter()
        .filter_map(|n| n.text.as_deref())
        .collect();
    assert_eq!(values, vec!["10.0.0.1/32", "10.0.0.2/32"]);
}

#[test]
fn check_mode_discards_and_never_commits() {
    let mut session = Recording::new(CandidateSession::new(empty_datastore()));
    let params = discard_filter("f1");

    let result = firewall::run(&mut session, &params, Mode::Check).expect("check run");
    assert!(result.changed);
    assert!(result.diff.expect("diff present").contains("filter[f1]"));

    assert_eq!(session.count("discard"), 1);
    assert_eq!(session.count("commit"), 0);
    assert!(
        session.inner.running().find_descendant("filter").is_none(),
        "check mode must not persist"
    );
}

#[test]
fn mutually_exclusive_params_fail_before_any_transport_call() {
    let mut session = Recording::new(CandidateSession::new(empty_datastore()));
    let params = FirewallParams {
        name: Some("f1".to_string()),
        aggregate: Some(vec![FirewallEntry {
            name: Some("f2".to_string()),
            ..FirewallEntry::default()
        }]),
        ..FirewallParams::default()
    };

    let err = firewall::run(&mut session, &params, Mode::Apply).expect_err("must fail");
    assert!(matches!(err, ModuleError::Validation(_)));
    assert!(session.calls.is_empty(), "no transport call may be made");
}

/// Session whose second replace fails, for mid-batch abort assertions.
struct FailsSecondReplace {
    calls: Vec<&'static str>,
    replaces: usize,
}

impl Session for FailsSecondReplace {
    fn lock(&mut self) -> Result<(), SessionError> {
        self.calls.push("lock");
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), SessionError> {
        self.calls.push("unlock");
        Ok(())
    }

    fn replace(&mut self, _anchor: &str, _tree: &XmlNode) -> Result<Option<String>, SessionError> {
        self.calls.push("replace");
        self.replaces += 1;
        if self.replaces == 2 {
            return Err(SessionError::Rejected("syntax error".to_string()));
        }
        Ok(Some("+ pending".to_string()))
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        self.calls.push("commit");
        Ok(())
    }

    fn discard(&mut self) -> Result<(), SessionError> {
        self.calls.push("discard");
        Ok(())
    }
}

#[test]
fn rejected_second_request_aborts_batch_and_unlocks_once() {
    let mut session = FailsSecondReplace {
        calls: Vec::new(),
        replaces: 0,
    };
    let params = FirewallParams {
        aggregate: Some(vec![
            FirewallEntry {
                name: Some("f1".to_string()),
                ..FirewallEntry::default()
            },
            FirewallEntry {
                name: Some("f2".to_string()),
                ..FirewallEntry::default()
            },
            FirewallEntry {
                name: Some("f3".to_string()),
                ..FirewallEntry::default()
            },
        ]),
        ..FirewallParams::default()
    };

    let err = firewall::run(&mut session, &params, Mode::Apply).expect_err("must fail");
    assert!(matches!(
        err,
        ModuleError::Transaction(TransactionError::ApplyRejected(ref detail))
            if detail.contains("syntax error")
    ));
    assert_eq!(session.calls, vec!["lock", "replace", "replace", "unlock"]);
}

#[test]
fn absent_state_deletes_filter_and_converges() {
    let mut session = CandidateSession::new(empty_datastore());
    firewall::run(&mut session, &discard_filter("f1"), Mode::Apply).expect("create");
    assert!(session.running().find_descendant("filter").is_some());

    let absent = FirewallParams {
        state: Some(State::Absent),
        ..discard_filter("f1")
    };
    let removed = firewall::run(&mut session, &absent, Mode::Apply).expect("delete");
    assert!(removed.changed);
    assert!(session.running().find_descendant("filter").is_none());

    let again = firewall::run(&mut session, &absent, Mode::Apply).expect("re-delete");
    assert!(!again.changed, "deleting an absent filter must converge");
}

#[test]
fn pbr_route_lands_in_forwarding_instance() {
    let mut session = CandidateSession::new(empty_datastore());
    let params = PbrParams {
        name: Some("pbr1".to_string()),
        address: Some("0.0.0.0/0".to_string()),
        next_hop: Some("192.168.199.3".to_string()),
        ..PbrParams::default()
    };

    let result = pbr::run(&mut session, &params, Mode::Apply).expect("apply");
    assert!(result.changed);

    let instance = session
        .running()
        .find_descendant("instance")
        .expect("instance committed");
    assert_eq!(instance.get_text(&["name"]), Some("pbr1"));
    assert_eq!(instance.get_text(&["instance-type"]), Some("forwarding"));
    assert_eq!(
        instance.get_text(&["routing-options", "static", "route", "next-hop"]),
        Some("192.168.199.3")
    );

    let second = pbr::run(&mut session, &params, Mode::Apply).expect("second apply");
    assert!(!second.changed);
}

#[test]
fn deactivated_filter_carries_inactive_marker_into_datastore() {
    let mut session = CandidateSession::new(empty_datastore());
    let params = FirewallParams {
        active: Some(false),
        ..discard_filter("f1")
    };

    firewall::run(&mut session, &params, Mode::Apply).expect("apply");
    let filter = session
        .running()
        .find_descendant("filter")
        .expect("filter");
    assert_eq!(filter.attr("inactive"), Some("inactive"));

    // Reactivating clears the marker and reports a change.
    let reactivate = firewall::run(&mut session, &discard_filter("f1"), Mode::Apply)
        .expect("reactivate");
    assert!(reactivate.changed);
    let filter = session
        .running()
        .find_descendant("filter")
        .expect("filter");
    assert_eq!(filter.attr("inactive"), None);
}
