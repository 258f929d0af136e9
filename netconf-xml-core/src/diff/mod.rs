//! Key-aware tree diffing for configuration trees.

mod engine;
mod entry;

pub use engine::{diff, diff_with_options, DiffOptions};
pub use entry::DiffEntry;
