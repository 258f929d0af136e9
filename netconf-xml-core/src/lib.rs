//! Ordered XML configuration trees with key-aware diffing and edit-config
//! staging, used by higher-level reconciliation tools.

pub mod diff;
pub mod edit;
pub mod format;
pub mod keys;
pub mod parser;
pub mod tree;
pub mod writer;

pub use diff::{diff, diff_with_options, DiffEntry, DiffOptions};
pub use edit::{stage, EditError};
pub use format::{format_json, format_text};
pub use keys::KeyConfig;
pub use parser::{parse, parse_file, ParseError};
pub use tree::XmlNode;
pub use writer::{write, write_file, WriteError};
