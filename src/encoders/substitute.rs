use crate::encoders::scanner::{QuoteState, is_free_occurrence};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Replaces every occurrence of any name in `names` with its mapped value.
///
/// The scan runs left to right with a resuming cursor. At each step the name
/// whose next occurrence starts earliest wins, ties going to the earlier
/// entry in `names`. Because `names` is sorted longest first, `abc` beats `ab`
/// when both start at the same offset. After a replacement the cursor resumes
/// behind the inserted text, so replacements are never themselves rewritten.
///
/// Names without an entry in `map` are ignored. No boundary or quote checks
/// are applied; see [`encode_script_text`] for that.
pub fn replace_all(text: &str, map: &HashMap<String, String>, names: &[String]) -> String {
    let mut text = text.to_string();
    let mut cursor = 0;

    loop {
        let mut first: Option<(usize, &str, &str)> = None;

        for name in names {
            if name.is_empty() {
                continue;
            }
            let Some(replacement) = map.get(name) else {
                continue;
            };
            if let Some(offset) = text[cursor..].find(name.as_str()) {
                let pos = cursor + offset;
                if first.is_none_or(|(best, _, _)| pos < best) {
                    first = Some((pos, name, replacement));
                }
            }
        }

        let Some((pos, name, replacement)) = first else {
            break;
        };

        text.replace_range(pos..pos + name.len(), replacement);
        cursor = pos + replacement.len();
    }

    text
}

/// Replaces `text` only if it equals a key of `map` as a whole.
pub fn replace_all_strict(text: &str, map: &HashMap<String, String>) -> String {
    map.get(text).cloned().unwrap_or_else(|| text.to_string())
}

/// Result of encoding a script under one or more prefix scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptEncoding {
    /// The substituted script
    pub text: String,
    /// Names actually substituted, per prefix scope (`""` for unprefixed)
    pub found: BTreeMap<String, BTreeSet<String>>,
}

impl ScriptEncoding {
    /// All names found under any prefix.
    pub fn all_found(&self) -> BTreeSet<String> {
        self.found.values().flatten().cloned().collect()
    }
}

/// Substitutes free occurrences of column names inside script source.
///
/// Like [`replace_all`], but an occurrence is only replaced when it lies
/// outside string literals and is a free identifier as decided by
/// [`is_free_occurrence`]. With a non-empty `mandatory_prefix` only
/// occurrences carrying that prefix are replaced; the prefix itself stays in
/// the text. Returns the new text and the set of names that were replaced.
pub fn encode_script_text(
    text: &str,
    map: &HashMap<String, String>,
    names: &[String],
    mandatory_prefix: &str,
) -> (String, BTreeSet<String>) {
    let mut text = text.to_string();
    let mut found = BTreeSet::new();
    let mut quotes = QuoteState::default();
    let mut cursor = 0;

    while let Some(c) = text[cursor..].chars().next() {
        if !quotes.in_string() {
            let hit = names.iter().find_map(|name| {
                if name.is_empty() || !text[cursor..].starts_with(name.as_str()) {
                    return None;
                }
                if !is_free_occurrence(&text, cursor, name.len(), mandatory_prefix) {
                    return None;
                }
                map.get(name).map(|replacement| (name, replacement))
            });

            if let Some((name, replacement)) = hit {
                text.replace_range(cursor..cursor + name.len(), replacement);
                cursor += replacement.len();
                found.insert(name.clone());
                continue;
            }
        }

        quotes.advance(c);
        cursor += c.len_utf8();
    }

    (text, found)
}

/// Runs [`encode_script_text`] once per prefix scope.
///
/// The empty prefix always goes first, followed by the candidates from
/// shortest to longest. Each pass works on the output of the previous one, and
/// the names replaced in each pass are reported under that prefix.
pub fn encode_script_text_with_prefixes<S: AsRef<str>>(
    text: &str,
    map: &HashMap<String, String>,
    names: &[String],
    prefix_candidates: &[S],
) -> ScriptEncoding {
    let mut prefixes: Vec<&str> = prefix_candidates
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.is_empty())
        .collect();
    prefixes.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    prefixes.dedup();
    prefixes.insert(0, "");

    let mut result = ScriptEncoding {
        text: text.to_string(),
        found: BTreeMap::new(),
    };

    for prefix in prefixes {
        let (text, found) = encode_script_text(&result.text, map, names, prefix);
        result.text = text;
        result.found.insert(prefix.to_string(), found);
    }

    result
}
