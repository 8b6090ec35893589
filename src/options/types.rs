use crate::core::column_type::ColumnType;
use crate::options::intent::META_KEY;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Type qualified names found while annotating, e.g. `("age.scale", Scale)`.
pub type TypedNames = BTreeSet<(String, ColumnType)>;

/// Suffix of the member that keeps a variables option's declared types.
pub const TYPES_SUFFIX: &str = ".types";

/// Walks `options` and rewrites every variables option.
///
/// A variables option is an object with both a `value` and a `types` member.
/// Its declared types are copied to a sibling `<name>.types` member. With
/// `preloading_data` the column names in `value` are qualified with their
/// type (`age` becomes `age.scale`), falling back to `dataset_types` when no
/// type was declared; otherwise the option collapses to its `value`.
pub fn annotate_types(
    options: &mut Value,
    preloading_data: bool,
    dataset_types: &BTreeMap<String, ColumnType>,
    found: &mut TypedNames,
) {
    match options {
        Value::Array(elements) => {
            for element in elements.iter_mut() {
                annotate_types(element, preloading_data, dataset_types, found);
            }
        }
        Value::Object(members) => {
            let names: Vec<String> = members.keys().cloned().collect();
            for name in names {
                if name == META_KEY {
                    continue;
                }
                if is_variables_option(members.get(&name)) {
                    if preloading_data {
                        qualify_option(members, &name, dataset_types, found);
                    } else {
                        collapse_option(members, &name);
                    }
                } else if let Some(child) = members.get_mut(&name) {
                    annotate_types(child, preloading_data, dataset_types, found);
                }
            }
        }
        _ => {}
    }
}

fn is_variables_option(node: Option<&Value>) -> bool {
    matches!(node, Some(Value::Object(m)) if m.contains_key("value") && m.contains_key("types"))
}

fn option_key(node: &Map<String, Value>) -> &str {
    node.get("optionKey").and_then(Value::as_str).unwrap_or("")
}

/// An option with an `optionKey` and extra members survives as an object.
fn keeps_shape(node: &Map<String, Value>) -> bool {
    !option_key(node).is_empty() && node.len() > 3
}

fn collapse_option(members: &mut Map<String, Value>, name: &str) {
    let Some(Value::Object(node)) = members.get(name) else {
        return;
    };
    let types = node.get("types").cloned().unwrap_or(Value::Null);
    let replacement = (!keeps_shape(node)).then(|| node.get("value").cloned().unwrap_or(Value::Null));

    members.insert(format!("{name}{TYPES_SUFFIX}"), types);
    if let Some(value) = replacement {
        members.insert(name.to_string(), value);
    }
}

fn qualify_option(
    members: &mut Map<String, Value>,
    name: &str,
    dataset_types: &BTreeMap<String, ColumnType>,
    found: &mut TypedNames,
) {
    let Some(Value::Object(node)) = members.get(name) else {
        return;
    };

    let key = option_key(node).to_string();
    let keep_shape = keeps_shape(node);
    let declared_types = node.get("types").cloned().unwrap_or(Value::Null);

    let mut single_value = false;
    let values = match node.get("value") {
        Some(Value::String(s)) => {
            single_value = true;
            vec![Value::String(s.clone())]
        }
        Some(Value::Array(a)) => a.clone(),
        _ => Vec::new(),
    };
    let types = match &declared_types {
        Value::String(s) => vec![Value::String(s.clone())],
        Value::Array(a) => a.clone(),
        _ => Vec::new(),
    };

    let kept = keep_shape.then(|| node.clone());
    let mut list: Vec<Value> = Vec::new();

    for (i, original) in values.into_iter().enumerate() {
        let declared = types.get(i).unwrap_or(&Value::Null);
        let keyed = !key.is_empty() && !keep_shape;

        let column = if keyed {
            original.get(&key).cloned()
        } else {
            None
        }
        .unwrap_or_else(|| original.clone());

        let qualified = match &column {
            Value::String(column) => {
                Value::String(qualify(column, type_at(declared, 0), dataset_types, found))
            }
            Value::Array(interaction) => Value::Array(
                interaction
                    .iter()
                    .enumerate()
                    .map(|(nr, part)| {
                        let declared = match declared {
                            Value::String(_) => type_at(declared, 0),
                            _ => type_at(declared, nr),
                        };
                        let part = part.as_str().unwrap_or("");
                        Value::String(qualify(part, declared, dataset_types, found))
                    })
                    .collect(),
            ),
            _ => {
                list.push(original);
                continue;
            }
        };

        if keyed && original.get(&key).is_some() {
            let mut original = original;
            original[key.as_str()] = qualified;
            list.push(original);
        } else {
            list.push(qualified);
        }
    }

    let replacement = match kept {
        Some(mut node) => {
            node.insert(key, Value::Array(list));
            Value::Object(node)
        }
        _ if single_value => list.into_iter().next().unwrap_or(Value::Null),
        _ => Value::Array(list),
    };

    members.insert(format!("{name}{TYPES_SUFFIX}"), declared_types);
    members.insert(name.to_string(), replacement);
}

/// Declared type at `index` of a types member that is a string or a list.
fn type_at(declared: &Value, index: usize) -> Option<&str> {
    match declared {
        Value::String(s) => Some(s.as_str()),
        Value::Array(a) => a.get(index).and_then(Value::as_str),
        _ => None,
    }
}

fn qualify(
    column: &str,
    declared: Option<&str>,
    dataset_types: &BTreeMap<String, ColumnType>,
    found: &mut TypedNames,
) -> String {
    if column.is_empty() {
        return String::new();
    }

    let mut ty = declared
        .and_then(|t| t.parse::<ColumnType>().ok())
        .unwrap_or_default();
    if !ty.is_known() {
        ty = dataset_types.get(column).copied().unwrap_or_default();
    }
    if !ty.is_known() {
        return column.to_string();
    }

    let qualified = ty.qualify(column);
    found.insert((qualified.clone(), ty));
    qualified
}
