//! Declarative module call sites. Each module is a thin layer over the
//! engine: a parameter schema, an anchor path, and an xpath map.

pub mod firewall;
pub mod pbr;

use thiserror::Error;

use crate::normalize::ValidationError;
use crate::render::RenderError;
use crate::transaction::TransactionError;

/// Errors surfaced by a module invocation.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
