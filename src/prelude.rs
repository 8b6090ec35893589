//! Convenient re-exports for common usage.
//!
//! # Example
//!
//! ```
//! use colenc::prelude::*;
//!
//! let mut registry = Registry::with_config(&EncoderConfig::load_default().unwrap()).unwrap();
//! registry.set_names([("age", ColumnType::Scale)]);
//! assert!(registry.encode("age").is_ok());
//! ```

pub use crate::{
    AffixConfig,
    // Core types
    ColumnType,
    // Config
    ConfigError,
    EncodeError,
    EncoderConfig,
    EncoderId,
    EncoderRole,
    NameTable,
    NameTableBuilder,
    Registry,
    ScriptEncoding,
    // Script rewriting
    remove_column_names_from_script,
    replace_column_names_in_script,
};
