//! Column names inside analysis options documents.
//!
//! An options document carries a parallel `.meta` tree that says which parts
//! hold column names (`"shouldEncode": true`) and which hold script source
//! (`"rCode": true`). Encoding first annotates variables options with their
//! column types, then walks the options alongside the metadata.

pub mod intent;
pub mod types;

pub use intent::{EncodeContext, META_KEY, NodeIntent, Parallel, walk_options};
pub use types::{TYPES_SUFFIX, TypedNames, annotate_types};

use crate::core::column_type::ColumnType;
use crate::core::name_table::NameTable;
use crate::registry::Registry;
use serde_json::Value;
use std::collections::BTreeMap;

/// Metadata member listing extra names a table must be able to encode.
pub const ENCODE_THIS_KEY: &str = "encodeThis";

/// Annotates and encodes every column name in `options` in place.
///
/// Types are resolved against the primary table's dataset types. Returns the
/// type qualified names that were produced, so callers can make sure they
/// are encodable.
pub fn encode_column_names_in_options(
    registry: &mut Registry,
    options: &mut Value,
    preloading_data: bool,
) -> TypedNames {
    let dataset_types = registry
        .primary()
        .map(|table| table.dataset_types().clone())
        .unwrap_or_default();

    let mut found = TypedNames::new();
    annotate_types(options, preloading_data, &dataset_types, &mut found);

    let meta = options.get(META_KEY).cloned().unwrap_or(Value::Null);
    let (map, names) = registry.encoding_view();
    walk_options(options, &meta, &EncodeContext { map, names });

    tracing::debug!(
        typed = found.len(),
        preloading_data,
        "encoded column names in options"
    );

    found
}

/// Collects every `encodeThis` entry of a metadata tree.
///
/// The entry may be one name or a list of names. Collected names have no
/// declared type.
pub fn collect_names_from_meta(meta: &Value, names: &mut BTreeMap<String, ColumnType>) {
    match meta {
        Value::Array(elements) => {
            for element in elements {
                collect_names_from_meta(element, names);
            }
        }
        Value::Object(members) => match members.get(ENCODE_THIS_KEY) {
            Some(Value::String(name)) => {
                names.insert(name.clone(), ColumnType::Unknown);
            }
            Some(Value::Array(list)) => {
                for name in list.iter().filter_map(Value::as_str) {
                    names.insert(name.to_string(), ColumnType::Unknown);
                }
            }
            Some(_) => {}
            None => {
                for member in members.values() {
                    collect_names_from_meta(member, names);
                }
            }
        },
        _ => {}
    }
}

impl NameTable {
    /// Fills the table with the `encodeThis` names of an options document.
    pub fn set_names_from_options_meta(&mut self, options: &Value) {
        let mut names = BTreeMap::new();
        if let Some(meta) = options.get(META_KEY) {
            collect_names_from_meta(meta, &mut names);
        }
        self.set_names(names);
    }
}
