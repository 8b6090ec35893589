use crate::encoders::document::{DocumentMode, replace_in_document};
use crate::encoders::substitute::{encode_script_text, replace_all};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Member holding an options document's metadata tree.
pub const META_KEY: &str = ".meta";

/// Shape of metadata that is walked alongside the options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parallel<'m> {
    /// Element `i` of the options is described by element `i` of the metadata
    Elements(&'m [Value]),
    /// Members are described by same-named metadata members; applied to
    /// every element when the options node is an array
    Members(&'m Map<String, Value>),
}

/// What a metadata node asks the walk to do with its options subtree.
///
/// `EncodeAll` and `ScriptText` keep the metadata members so that nested
/// metadata still takes precedence for members it describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeIntent<'m> {
    /// The subtree is made of column names (`"shouldEncode": true`)
    EncodeAll(&'m Map<String, Value>),
    /// String leaves are script source (`"rCode": true`)
    ScriptText(&'m Map<String, Value>),
    /// Keep descending with the matching metadata
    RecurseParallel(Parallel<'m>),
    /// No metadata: leave the subtree alone
    None,
}

impl<'m> NodeIntent<'m> {
    /// Classifies a metadata node.
    ///
    /// A node flagged both `rCode` and `shouldEncode` is treated as script
    /// text.
    pub fn classify(meta: &'m Value) -> Self {
        match meta {
            Value::Array(elements) => NodeIntent::RecurseParallel(Parallel::Elements(elements)),
            Value::Object(members) if flag(members, "rCode") => NodeIntent::ScriptText(members),
            Value::Object(members) if flag(members, "shouldEncode") => {
                NodeIntent::EncodeAll(members)
            }
            Value::Object(members) => NodeIntent::RecurseParallel(Parallel::Members(members)),
            _ => NodeIntent::None,
        }
    }

    /// Metadata describing individual members, if any.
    fn members(&self) -> Option<&'m Map<String, Value>> {
        match *self {
            NodeIntent::EncodeAll(members)
            | NodeIntent::ScriptText(members)
            | NodeIntent::RecurseParallel(Parallel::Members(members)) => Some(members),
            _ => None,
        }
    }
}

fn flag(members: &Map<String, Value>, key: &str) -> bool {
    members.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// The maps a walk encodes with.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    pub map: &'a HashMap<String, String>,
    pub names: &'a [String],
}

impl EncodeContext<'_> {
    fn script(&self, text: &str) -> String {
        encode_script_text(text, self.map, self.names, "").0
    }

    fn all(&self, text: &str) -> String {
        replace_all(text, self.map, self.names)
    }

    fn strict(&self, node: &mut Value) {
        replace_in_document(node, self.map, self.names, DocumentMode::new(false, true));
    }
}

/// Encodes column names in `options` as directed by the parallel `meta` tree.
pub fn walk_options(options: &mut Value, meta: &Value, ctx: &EncodeContext<'_>) {
    walk(options, &NodeIntent::classify(meta), ctx);
}

fn walk(node: &mut Value, intent: &NodeIntent<'_>, ctx: &EncodeContext<'_>) {
    match (node, intent) {
        (_, NodeIntent::None) => {}

        (Value::Object(members), _) => walk_members(members, intent, ctx),

        (node @ Value::Array(_), NodeIntent::EncodeAll(_)) => ctx.strict(node),
        (Value::Array(elements), NodeIntent::RecurseParallel(Parallel::Elements(metas))) => {
            for (element, meta) in elements.iter_mut().zip(metas.iter()) {
                walk(element, &NodeIntent::classify(meta), ctx);
            }
        }
        (Value::Array(elements), NodeIntent::ScriptText(_)) => {
            for element in elements.iter_mut() {
                if let Value::String(text) = element {
                    *text = ctx.script(text);
                }
            }
        }
        (Value::Array(elements), NodeIntent::RecurseParallel(Parallel::Members(_))) => {
            for element in elements.iter_mut() {
                walk(element, intent, ctx);
            }
        }

        (Value::String(text), NodeIntent::ScriptText(_)) => *text = ctx.script(text),
        (Value::String(text), NodeIntent::EncodeAll(_)) => *text = ctx.all(text),

        _ => {}
    }
}

fn walk_members(members: &mut Map<String, Value>, intent: &NodeIntent<'_>, ctx: &EncodeContext<'_>) {
    let described = intent.members();

    for (name, value) in members.iter_mut() {
        if name == META_KEY {
            continue;
        }

        if let Some(child) = described.and_then(|m| m.get(name)) {
            walk(value, &NodeIntent::classify(child), ctx);
            continue;
        }

        match intent {
            NodeIntent::ScriptText(_) => {
                if let Value::String(text) = value {
                    *text = ctx.script(text);
                }
            }
            NodeIntent::EncodeAll(_) => ctx.strict(value),
            _ => {}
        }
    }
}
