use crate::encoders::substitute::{replace_all, replace_all_strict};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// How a document walk substitutes names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentMode {
    /// Also rewrite object member names
    pub rename_keys: bool,
    /// Only replace strings that equal a name as a whole
    pub strict: bool,
}

impl DocumentMode {
    pub fn new(rename_keys: bool, strict: bool) -> Self {
        DocumentMode { rename_keys, strict }
    }
}

/// Applies name substitution to every string leaf of a JSON document.
///
/// Arrays and objects are walked recursively; numbers, booleans and nulls are
/// left alone. With `rename_keys` the member names of every object are
/// substituted as well, keeping each member at its position.
pub fn replace_in_document(
    doc: &mut Value,
    map: &HashMap<String, String>,
    names: &[String],
    mode: DocumentMode,
) {
    let substitute = |text: &str| {
        if mode.strict {
            replace_all_strict(text, map)
        } else {
            replace_all(text, map, names)
        }
    };

    walk(doc, &substitute, mode.rename_keys);
}

fn walk<F>(doc: &mut Value, substitute: &F, rename_keys: bool)
where
    F: Fn(&str) -> String,
{
    match doc {
        Value::Array(elements) => {
            for element in elements.iter_mut() {
                walk(element, substitute, rename_keys);
            }
        }
        Value::Object(members) => {
            for value in members.values_mut() {
                walk(value, substitute, rename_keys);
            }
            if rename_keys {
                rename_members(members, substitute);
            }
        }
        Value::String(text) => {
            *text = substitute(text);
        }
        _ => {}
    }
}

fn rename_members<F>(members: &mut Map<String, Value>, substitute: &F)
where
    F: Fn(&str) -> String,
{
    let renamed: Vec<(String, String)> = members
        .keys()
        .map(|key| (key.clone(), substitute(key)))
        .filter(|(old, new)| old != new)
        .collect();

    if renamed.is_empty() {
        return;
    }

    let old = std::mem::take(members);
    for (key, value) in old {
        let key = renamed
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| to.clone())
            .unwrap_or(key);
        members.insert(key, value);
    }
}
