//! Column-name encoding for generated analysis scripts.
//!
//! User column names may contain spaces, punctuation or non-ASCII text, none
//! of which survive being spliced into a generated script. `colenc` swaps
//! them for synthetic identifiers (`Column_0_Encoded`, ...) on the way in and
//! restores them on the way out.
//!
//! # Example
//!
//! ```
//! use colenc::{ColumnType, Registry};
//!
//! let mut registry = Registry::new();
//! registry.set_names([("body weight", ColumnType::Scale)]);
//!
//! let script = registry.encode_script_text("mean(body weight) * 2");
//! assert!(!script.contains("body weight"));
//! assert_eq!(registry.decode_script_text(&script), "mean(body weight) * 2");
//! ```

mod core;
pub mod encoders;
pub mod options;
pub mod prelude;
mod registry;
pub mod rewrite;

pub use crate::core::column_type::ColumnType;
pub use crate::core::config::{AffixConfig, ConfigError, EncoderConfig, ScriptSettings, Settings};
pub use crate::core::name_table::{
    DEFAULT_PREFIX, DEFAULT_SUFFIX, NameTable, NameTableBuilder, sort_longest_first,
};
pub use encoders::{
    DocumentMode, EncodeError, ScriptEncoding, encode_script_text,
    encode_script_text_with_prefixes, replace_all, replace_all_strict, replace_in_document,
};
pub use options::{TypedNames, collect_names_from_meta};
pub use registry::{EncoderId, EncoderRole, Registry};
pub use rewrite::{remove_column_names_from_script, replace_column_names_in_script};

#[cfg(test)]
mod tests;
