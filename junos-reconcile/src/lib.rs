//! Declarative configuration reconciliation for Juniper network devices.
//!
//! Given a desired-state description and a device's current configuration,
//! this engine computes a minimal diff, renders it as a protocol-correct
//! NETCONF edit-config fragment, applies it under an exclusive lock, and
//! commits or rolls back atomically.
//!
//! # Architecture
//!
//! The engine is a pipeline of small, generic stages:
//!
//! - [`normalize`] — merge per-item parameters with shared defaults, expand
//!   aggregate lists into independent unit requests, and validate structure
//!   before any network interaction
//! - [`xpath`] — expand logical fields into an anchor-rooted element tree via
//!   per-field xpath specs, with identity-key and lifecycle-marker handling
//! - [`render`] — serialize ordered term blocks (conditions and actions) into
//!   element trees under the repeating container
//! - [`transaction`] — lock, apply, diff-decide, commit-or-discard, unlock;
//!   the lock is released on every exit path
//!
//! Boundary collaborators:
//!
//! - [`session`] — the device session trait the transaction manager drives;
//!   transport and session establishment live outside this crate
//! - [`candidate`] — an in-memory candidate/running datastore session used by
//!   tests and file-backed reconciliation
//! - [`payload`] — NETCONF edit-config wire serialization
//!
//! The [`modules`] layer contains the declarative call sites (firewall
//! filters, policy-based routing); each is a parameter schema, an anchor
//! path, and an xpath map over the same engine.
//!
//! Re-running an invocation against a converged device reports
//! `changed=false`: the diff-based decision step is what guarantees
//! idempotence.
//!
//! # Built on netconf-xml-core
//!
//! Tree construction, key-aware diffing, and edit-config staging come from
//! `netconf-xml-core`; everything Junos-shaped lives here.

pub mod candidate;
pub mod model;
pub mod modules;
pub mod normalize;
pub mod payload;
pub mod render;
pub mod report;
pub mod session;
pub mod transaction;
pub mod xpath;

pub use model::{ConfigItem, FieldValue, RenderedRequest, State, Term, TransactionResult};
pub use normalize::{normalize, UnitParams, ValidationError};
pub use session::{Session, SessionError};
pub use transaction::{Mode, TransactionError};
