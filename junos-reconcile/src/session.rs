//! The device session boundary. Transport and session establishment are
//! external collaborators; the engine only consumes this trait.

use netconf_xml_core::XmlNode;
use thiserror::Error;

/// Errors surfaced by a session transport, carrying device detail text.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration database is locked by another session.
    #[error("configuration database locked: {0}")]
    Locked(String),
    /// The device refused a staged configuration request.
    #[error("device rejected configuration: {0}")]
    Rejected(String),
    /// Commit-time validation failed on the device.
    #[error("commit failed: {0}")]
    CommitFailed(String),
    /// Any other transport-level failure.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// One exclusive configuration session against a device.
///
/// `replace` must be atomic per call: the request tree is either fully staged
/// into the candidate configuration or rejected. `unlock` must be safe to call
/// after a partially-failed `lock`.
pub trait Session {
    /// Acquire the exclusive configuration lock.
    fn lock(&mut self) -> Result<(), SessionError>;

    /// Release the configuration lock.
    fn unlock(&mut self) -> Result<(), SessionError>;

    /// Stage a request tree as a replace operation against its anchor path.
    /// Returns the pending configuration diff, or `None` when the candidate
    /// still matches the running configuration.
    fn replace(&mut self, anchor: &str, tree: &XmlNode) -> Result<Option<String>, SessionError>;

    /// Durably persist the staged change.
    fn commit(&mut self) -> Result<(), SessionError>;

    /// Revert the staged, uncommitted change.
    fn discard(&mut self) -> Result<(), SessionError>;
}
