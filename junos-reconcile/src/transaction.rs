//! The transactional apply protocol: lock, replace, decide, commit or
//! discard, unlock. The lock is released on every exit path.

use thiserror::Error;

use crate::model::{RenderedRequest, TransactionResult};
use crate::session::Session;

/// Whether a pending diff is committed or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dry run: report the diff, then discard the staged change.
    Check,
    /// Commit the staged change durably.
    Apply,
}

/// Fatal transaction failures. None of these are retried by the engine;
/// device detail text is carried through unmodified.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The configuration lock is held by another session.
    #[error("configuration lock contention: {0}")]
    LockContention(String),
    /// The device refused a request tree; remaining requests were skipped.
    #[error("apply rejected: {0}")]
    ApplyRejected(String),
    /// Commit-time validation failed on the device.
    #[error("commit rejected: {0}")]
    CommitRejected(String),
    /// Unlock or discard failed at the transport level.
    #[error("session failure: {0}")]
    Transport(String),
}

/// Apply rendered requests within one locked session.
///
/// Requests are submitted sequentially; the last non-empty diff decides the
/// outcome. No diff means the device already converged and `changed=false` is
/// returned without a commit or discard. A commit failure is surfaced after
/// the lock has been released.
pub fn run(
    session: &mut dyn Session,
    requests: &[RenderedRequest],
    mode: Mode,
) -> Result<TransactionResult, TransactionError> {
    session
        .lock()
        .map_err(|err| TransactionError::LockContention(err.to_string()))?;

    let outcome = run_locked(session, requests, mode);
    let unlock = session.unlock();

    let result = outcome?;
    unlock.map_err(|err| TransactionError::Transport(err.to_string()))?;
    Ok(result)
}

fn run_locked(
    session: &mut dyn Session,
    requests: &[RenderedRequest],
    mode: Mode,
) -> Result<TransactionResult, TransactionError> {
    let mut diff = None;
    for request in requests {
        let pending = session
            .replace(&request.anchor, &request.tree)
            .map_err(|err| TransactionError::ApplyRejected(err.to_string()))?;
        if let Some(pending) = pending {
            if !pending.is_empty() {
                diff = Some(pending);
            }
        }
    }

    let Some(diff) = diff else {
        return Ok(TransactionResult {
            changed: false,
            diff: None,
        });
    };

    match mode {
        Mode::Check => session
            .discard()
            .map_err(|err| TransactionError::Transport(err.to_string()))?,
        Mode::Apply => session
            .commit()
            .map_err(|err| TransactionError::CommitRejected(err.to_string()))?,
    }

    Ok(TransactionResult {
        changed: true,
        diff: Some(diff),
    })
}

#[cfg(test)]
mod tests {
    use super::{run, Mode, TransactionError};
    use crate::model::RenderedRequest;
    use crate::session::{Session, SessionError};
    use netconf_xml_core::XmlNode;

    /// Scripted session recording every call for protocol assertions.
    #[derive(Default)]
    struct ScriptedSession {
        calls: Vec<String>,
        replace_results: Vec<Result<Option<String>, SessionError>>,
        fail_lock: bool,
        fail_commit: bool,
    }

    impl Session for ScriptedSession {
        fn lock(&mut self) -> Result<(), SessionError> {
            self.calls.push("lock".to_string());
            if self.fail_lock {
                return Err(SessionError::Locked("held by admin".to_string()));
            }
            Ok(())
        }

        fn unlock(&mut self) -> Result<(), SessionError> {
            self.calls.push("unlock".to_string());
            Ok(())
        }

        fn replace(
            &mut self,
            _anchor: &str,
            _tree: &XmlNode,
        ) -> Result<Option<String>, SessionError> {
            self.calls.push("replace".to_string());
            if self.replace_results.is_empty() {
                return Ok(None);
            }
            self.replace_results.remove(0)
        }

        fn commit(&mut self) -> Result<(), SessionError> {
            self.calls.push("commit".to_string());
            if self.fail_commit {
                return Err(SessionError::CommitFailed(
                    "referential constraint".to_string(),
                ));
            }
            Ok(())
        }

        fn discard(&mut self) -> Result<(), SessionError> {
            self.calls.push("discard".to_string());
            Ok(())
        }
    }

    fn request(anchor: &str) -> RenderedRequest {
        RenderedRequest {
            anchor: anchor.to_string(),
            tree: XmlNode::new("firewall"),
        }
    }

    #[test]
    fn converged_device_reports_unchanged_without_commit_or_discard() {
        let mut session = ScriptedSession {
            replace_results: vec![Ok(None)],
            ..ScriptedSession::default()
        };

        let result = run(&mut session, &[request("firewall")], Mode::Apply).expect("run");
        assert!(!result.changed);
        assert_eq!(result.diff, None);
        assert_eq!(session.calls, vec!["lock", "replace", "unlock"]);
    }

    #[test]
    fn check_mode_discards_and_still_reports_diff() {
        let mut session = ScriptedSession {
            replace_results: vec![Ok(Some("+ filter f1".to_string()))],
            ..ScriptedSession::default()
        };

        let result = run(&mut session, &[request("firewall")], Mode::Check).expect("run");
        assert!(result.changed);
        assert_eq!(result.diff.as_deref(), Some("+ filter f1"));
        assert_eq!(session.calls, vec!["lock", "replace", "discard", "unlock"]);
    }

    #[test]
    fn apply_mode_commits_pending_diff() {
        let mut session = ScriptedSession {
            replace_results: vec![Ok(Some("+ filter f1".to_string()))],
            ..ScriptedSession::default()
        };

        let result = run(&mut session, &[request("firewall")], Mode::Apply).expect("run");
        assert!(result.changed);
        assert_eq!(session.calls, vec!["lock", "replace", "commit", "unlock"]);
    }

    #[test]
    fn lock_contention_is_fatal_and_unretried() {
        let mut session = ScriptedSession {
            fail_lock: true,
            ..ScriptedSession::default()
        };

        let err = run(&mut session, &[request("firewall")], Mode::Apply).expect_err("must fail");
        assert!(matches!(err, TransactionError::LockContention(_)));
        assert_eq!(session.calls, vec!["lock"]);
    }

    #[test]
    fn rejected_request_aborts_batch_and_releases_lock_once() {
        let mut session = ScriptedSession {
            replace_results: vec![
                Ok(Some("+ filter f1".to_string())),
                Err(SessionError::Rejected("unknown element <bogus>".to_string())),
                Ok(Some("+ filter f3".to_string())),
            ],
            ..ScriptedSession::default()
        };
        let requests = vec![request("a"), request("b"), request("c")];

        let err = run(&mut session, &requests, Mode::Apply).expect_err("must fail");
        assert!(matches!(err, TransactionError::ApplyRejected(ref detail)
            if detail.contains("unknown element <bogus>")));
        assert_eq!(session.calls, vec!["lock", "replace", "replace", "unlock"]);
        assert_eq!(
            session.calls.iter().filter(|c| *c == "unlock").count(),
            1
        );
    }

    #[test]
    fn commit_failure_surfaces_after_lock_release() {
        let mut session = ScriptedSession {
            replace_results: vec![Ok(Some("+ filter f1".to_string()))],
            fail_commit: true,
            ..ScriptedSession::default()
        };

        let err = run(&mut session, &[request("firewall")], Mode::Apply).expect_err("must fail");
        assert!(matches!(err, TransactionError::CommitRejected(_)));
        assert_eq!(session.calls, vec!["lock", "replace", "commit", "unlock"]);
    }

    #[test]
    fn last_non_empty_diff_wins() {
        let mut session = ScriptedSession {
            replace_results: vec![
                Ok(Some("first".to_string())),
                Ok(None),
                Ok(Some("second".to_string())),
            ],
            ..ScriptedSession::default()
        };
        let requests = vec![request("a"), request("b"), request("c")];

        let result = run(&mut session, &requests, Mode::Apply).expect("run");
        assert_eq!(result.diff.as_deref(), Some("second"));
    }
}
