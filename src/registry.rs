//! The set of active name tables and their merged views.
//!
//! A [`Registry`] holds one primary table, created on first use, plus any
//! number of auxiliary tables for scoped renaming jobs. Lookups and
//! substitutions go through merged views of all tables. Each view carries its
//! own dirty flag, set whenever a table may have changed, and is rebuilt on
//! the next read.
//!
//! Rebuild-on-read mutates the registry, so every read that may rebuild takes
//! `&mut self`. A registry is meant to be owned by a single thread (or a
//! single request); share one across threads only behind an exclusive lock.

use crate::core::column_type::ColumnType;
use crate::core::config::{AffixConfig, ConfigError, EncoderConfig};
use crate::core::name_table::{NameTable, sort_longest_first};
use crate::encoders::document::{DocumentMode, replace_in_document};
use crate::encoders::errors::EncodeError;
use crate::encoders::html::escape_html;
use crate::encoders::substitute::{
    ScriptEncoding, encode_script_text, encode_script_text_with_prefixes, replace_all,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Handle of an auxiliary table inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EncoderId(u64);

/// Which table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderRole {
    Primary,
    Auxiliary(EncoderId),
}

#[derive(Debug, Clone)]
struct Cached<T> {
    dirty: bool,
    value: T,
}

impl<T: Default> Cached<T> {
    fn new() -> Self {
        Cached {
            dirty: true,
            value: T::default(),
        }
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn clear(&mut self) {
        self.value = T::default();
        self.dirty = true;
    }

    fn get_or_rebuild(&mut self, rebuild: impl FnOnce() -> T) -> &T {
        if self.dirty {
            self.value = rebuild();
            self.dirty = false;
        }
        &self.value
    }
}

#[derive(Debug, Clone)]
struct AggregateViews {
    encoding: Cached<HashMap<String, String>>,
    decoding: Cached<HashMap<String, String>>,
    decoding_html: Cached<HashMap<String, String>>,
    types: Cached<HashMap<String, ColumnType>>,
    original_names: Cached<Vec<String>>,
    encoded_names: Cached<Vec<String>>,
}

impl AggregateViews {
    fn new() -> Self {
        AggregateViews {
            encoding: Cached::new(),
            decoding: Cached::new(),
            decoding_html: Cached::new(),
            types: Cached::new(),
            original_names: Cached::new(),
            encoded_names: Cached::new(),
        }
    }

    fn invalidate_all(&mut self) {
        self.encoding.invalidate();
        self.decoding.invalidate();
        self.decoding_html.invalidate();
        self.types.invalidate();
        self.original_names.invalidate();
        self.encoded_names.invalidate();
    }

    fn clear_all(&mut self) {
        self.encoding.clear();
        self.decoding.clear();
        self.decoding_html.clear();
        self.types.clear();
        self.original_names.clear();
        self.encoded_names.clear();
    }

    fn any_dirty(&self) -> bool {
        self.encoding.dirty
            || self.decoding.dirty
            || self.decoding_html.dirty
            || self.types.dirty
            || self.original_names.dirty
            || self.encoded_names.dirty
    }
}

/// Primary first, then auxiliaries in creation order.
fn tables<'a>(
    primary: Option<&'a NameTable>,
    auxiliaries: &'a BTreeMap<EncoderId, NameTable>,
) -> impl Iterator<Item = &'a NameTable> {
    primary.into_iter().chain(auxiliaries.values())
}

/// Merges maps so that the first table defining a key wins.
fn merge_maps<'a, V, F, M>(
    primary: Option<&'a NameTable>,
    auxiliaries: &'a BTreeMap<EncoderId, NameTable>,
    select: F,
    map_value: M,
) -> HashMap<String, V>
where
    F: Fn(&'a NameTable) -> &'a HashMap<String, V>,
    M: Fn(&V) -> V,
    V: 'a,
{
    let mut merged = HashMap::new();
    for table in tables(primary, auxiliaries) {
        for (key, value) in select(table) {
            merged
                .entry(key.clone())
                .or_insert_with(|| map_value(value));
        }
    }
    merged
}

fn merge_names<'a, F>(
    primary: Option<&'a NameTable>,
    auxiliaries: &'a BTreeMap<EncoderId, NameTable>,
    select: F,
) -> Vec<String>
where
    F: Fn(&'a NameTable) -> &'a [String],
{
    let mut names: Vec<String> = tables(primary, auxiliaries)
        .flat_map(|table| select(table).iter().cloned())
        .collect();
    sort_longest_first(&mut names);
    names
}

/// Active name tables plus their lazily merged views.
///
/// # Example
///
/// ```
/// use colenc::{ColumnType, Registry};
///
/// let mut registry = Registry::new();
/// registry.set_names([("body weight", ColumnType::Scale)]);
///
/// let script = registry.encode_script_text("mean(body weight) * 2");
/// assert!(!script.contains("body weight"));
/// assert_eq!(registry.decode_script_text(&script), "mean(body weight) * 2");
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    affixes: AffixConfig,
    primary: Option<NameTable>,
    auxiliaries: BTreeMap<EncoderId, NameTable>,
    next_id: u64,
    views: AggregateViews,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry using the default identifier affixes.
    pub fn new() -> Self {
        Self::unchecked(AffixConfig::default())
    }

    /// Creates a registry whose tables use the configured encoder affixes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the `[encoder]` affixes would not
    /// produce single identifiers.
    pub fn with_config(config: &EncoderConfig) -> Result<Self, ConfigError> {
        Self::with_affixes(config.encoder.clone())
            .map_err(|e| ConfigError::Invalid(format!("[encoder] {}", e)))
    }

    /// Creates a registry whose tables use `affixes`, after checking them the
    /// same way [`NameTableBuilder`](crate::NameTableBuilder) does.
    pub fn with_affixes(affixes: AffixConfig) -> Result<Self, String> {
        affixes.build_table()?;
        Ok(Self::unchecked(affixes))
    }

    fn unchecked(affixes: AffixConfig) -> Self {
        Registry {
            affixes,
            primary: None,
            auxiliaries: BTreeMap::new(),
            next_id: 0,
            views: AggregateViews::new(),
        }
    }

    fn new_table(&self) -> NameTable {
        NameTable::new(self.affixes.prefix.as_str(), self.affixes.suffix.as_str())
    }

    /// Marks every merged view as stale.
    pub fn invalidate_all(&mut self) {
        self.views.invalidate_all();
    }

    /// Whether any merged view will be rebuilt on its next read.
    pub fn is_dirty(&self) -> bool {
        self.views.any_dirty()
    }

    pub fn primary(&self) -> Option<&NameTable> {
        self.primary.as_ref()
    }

    /// The primary table, created empty on first access.
    ///
    /// Handing out a mutable table invalidates all merged views.
    pub fn primary_mut(&mut self) -> &mut NameTable {
        self.views.invalidate_all();
        let affixes = &self.affixes;
        self.primary
            .get_or_insert_with(|| NameTable::new(affixes.prefix.as_str(), affixes.suffix.as_str()))
    }

    /// Replaces the primary table's names.
    pub fn set_names<I, S>(&mut self, names_with_types: I)
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        self.primary_mut().set_names(names_with_types);
    }

    /// Registers an auxiliary table and returns its handle.
    pub fn add_auxiliary(&mut self, table: NameTable) -> EncoderId {
        let id = EncoderId(self.next_id);
        self.next_id += 1;
        self.auxiliaries.insert(id, table);
        self.views.invalidate_all();
        tracing::debug!(?id, "added auxiliary encoder");
        id
    }

    /// Registers an empty auxiliary table using the registry's affixes.
    pub fn create_auxiliary(&mut self) -> EncoderId {
        let table = self.new_table();
        self.add_auxiliary(table)
    }

    pub fn auxiliary(&self, id: EncoderId) -> Option<&NameTable> {
        self.auxiliaries.get(&id)
    }

    /// Mutable access to an auxiliary table; invalidates all merged views.
    pub fn auxiliary_mut(&mut self, id: EncoderId) -> Option<&mut NameTable> {
        self.views.invalidate_all();
        self.auxiliaries.get_mut(&id)
    }

    /// Removes one auxiliary table, leaving everything else in place.
    pub fn remove_auxiliary(&mut self, id: EncoderId) -> Option<NameTable> {
        let removed = self.auxiliaries.remove(&id);
        if removed.is_some() {
            self.views.invalidate_all();
        }
        removed
    }

    /// Runs `f` with an auxiliary table registered, removing it afterwards.
    ///
    /// The table is returned along with the closure's result.
    pub fn scoped<R>(
        &mut self,
        table: NameTable,
        f: impl FnOnce(&mut Registry, EncoderId) -> R,
    ) -> (R, Option<NameTable>) {
        let id = self.add_auxiliary(table);
        let result = f(self, id);
        (result, self.remove_auxiliary(id))
    }

    /// Destroys the primary table and, with it, every auxiliary table.
    ///
    /// Returns how many auxiliary tables were destroyed. All merged views are
    /// emptied. Auxiliaries are owned by the registry, so the cascade always
    /// removes them; [`EncodeError::InconsistentRegistry`] is a post-condition
    /// check (asserted in debug builds) and is not expected in practice.
    pub fn destroy_primary(&mut self) -> Result<usize, EncodeError> {
        self.primary = None;

        let ids: Vec<EncoderId> = self.auxiliaries.keys().copied().collect();
        let destroyed = ids
            .into_iter()
            .filter_map(|id| self.remove_auxiliary(id))
            .count();

        self.views.clear_all();

        // Unreachable while auxiliaries are owned here; kept as a post-condition
        let remaining = self.auxiliaries.len();
        debug_assert_eq!(remaining, 0, "auxiliary encoders survived primary destruction");
        if remaining > 0 {
            tracing::warn!(remaining, "auxiliary encoders survived primary destruction");
            return Err(EncodeError::InconsistentRegistry { remaining });
        }

        tracing::debug!(destroyed, "destroyed primary encoder");
        Ok(destroyed)
    }

    /// Destroys the table with the given role.
    pub fn destroy(&mut self, role: EncoderRole) -> Result<usize, EncodeError> {
        match role {
            EncoderRole::Primary => self.destroy_primary(),
            EncoderRole::Auxiliary(id) => Ok(self.remove_auxiliary(id).map_or(0, |_| 1)),
        }
    }

    /// Number of tables currently alive, primary included.
    pub fn live_encoders(&self) -> usize {
        usize::from(self.primary.is_some()) + self.auxiliaries.len()
    }

    /// Original names of the primary table, longest first.
    pub fn column_names(&self) -> Vec<String> {
        self.primary
            .as_ref()
            .map(|t| t.original_names().to_vec())
            .unwrap_or_default()
    }

    /// Synthetic identifiers of the primary table, longest first.
    pub fn column_names_encoded(&self) -> Vec<String> {
        self.primary
            .as_ref()
            .map(|t| t.encoded_names().to_vec())
            .unwrap_or_default()
    }

    /// Merged original-name to identifier map.
    pub fn encoding_map(&mut self) -> &HashMap<String, String> {
        let (primary, auxiliaries) = (self.primary.as_ref(), &self.auxiliaries);
        self.views.encoding.get_or_rebuild(|| {
            tracing::debug!("rebuilding merged encoding map");
            merge_maps(primary, auxiliaries, |t| t.encoding_map(), String::clone)
        })
    }

    /// Merged identifier to original-name map.
    pub fn decoding_map(&mut self) -> &HashMap<String, String> {
        let (primary, auxiliaries) = (self.primary.as_ref(), &self.auxiliaries);
        self.views
            .decoding
            .get_or_rebuild(|| merge_maps(primary, auxiliaries, |t| t.decoding_map(), String::clone))
    }

    /// Merged decoding map whose values are HTML-escaped.
    pub fn decoding_map_html_safe(&mut self) -> &HashMap<String, String> {
        let (primary, auxiliaries) = (self.primary.as_ref(), &self.auxiliaries);
        self.views.decoding_html.get_or_rebuild(|| {
            merge_maps(primary, auxiliaries, |t| t.decoding_map(), |v: &String| {
                escape_html(v)
            })
        })
    }

    /// Merged identifier to declared-type map.
    pub fn decoding_types(&mut self) -> &HashMap<String, ColumnType> {
        let (primary, auxiliaries) = (self.primary.as_ref(), &self.auxiliaries);
        self.views
            .types
            .get_or_rebuild(|| merge_maps(primary, auxiliaries, |t| t.decoding_types(), |v: &ColumnType| *v))
    }

    /// All original names across tables, longest first.
    pub fn original_names(&mut self) -> &[String] {
        let (primary, auxiliaries) = (self.primary.as_ref(), &self.auxiliaries);
        self.views
            .original_names
            .get_or_rebuild(|| merge_names(primary, auxiliaries, |t| t.original_names()))
    }

    /// All synthetic identifiers across tables, longest first.
    pub fn encoded_names(&mut self) -> &[String] {
        let (primary, auxiliaries) = (self.primary.as_ref(), &self.auxiliaries);
        self.views
            .encoded_names
            .get_or_rebuild(|| merge_names(primary, auxiliaries, |t| t.encoded_names()))
    }

    /// Refreshes and borrows the encoding map with its name list.
    pub(crate) fn encoding_view(&mut self) -> (&HashMap<String, String>, &[String]) {
        self.encoding_map();
        self.original_names();
        (&self.views.encoding.value, &self.views.original_names.value)
    }

    fn decoding_view(&mut self, html_safe: bool) -> (&HashMap<String, String>, &[String]) {
        if html_safe {
            self.decoding_map_html_safe();
        } else {
            self.decoding_map();
        }
        self.encoded_names();
        let map = if html_safe {
            &self.views.decoding_html.value
        } else {
            &self.views.decoding.value
        };
        (map, &self.views.encoded_names.value)
    }

    /// Identifier for a column name. Empty input yields empty output.
    pub fn encode(&mut self, name: &str) -> Result<String, EncodeError> {
        if name.is_empty() {
            return Ok(String::new());
        }
        let (map, names) = self.encoding_view();
        map.get(name)
            .cloned()
            .ok_or_else(|| EncodeError::not_a_column_name(name, names))
    }

    /// Original name for an identifier. Empty input yields empty output.
    pub fn decode(&mut self, encoded: &str) -> Result<String, EncodeError> {
        if encoded.is_empty() {
            return Ok(String::new());
        }
        self.decoding_map()
            .get(encoded)
            .cloned()
            .ok_or_else(|| EncodeError::not_an_encoded_name(encoded))
    }

    /// Declared type behind an identifier; `Unknown` if there is none.
    pub fn type_of(&mut self, encoded: &str) -> ColumnType {
        if encoded.is_empty() {
            return ColumnType::Unknown;
        }
        self.decoding_types()
            .get(encoded)
            .copied()
            .unwrap_or_default()
    }

    /// Replaces names anywhere in `text`, without boundary or quote checks.
    pub fn encode_all(&mut self, text: &str) -> String {
        let (map, names) = self.encoding_view();
        replace_all(text, map, names)
    }

    /// Encodes free column names in script source.
    pub fn encode_script_text(&mut self, text: &str) -> String {
        self.encode_script_text_scoped(text, "").0
    }

    /// Encodes only names carrying `mandatory_prefix` (all free names if empty).
    ///
    /// Also returns the set of names that were replaced.
    pub fn encode_script_text_scoped(
        &mut self,
        text: &str,
        mandatory_prefix: &str,
    ) -> (String, BTreeSet<String>) {
        let (map, names) = self.encoding_view();
        encode_script_text(text, map, names, mandatory_prefix)
    }

    /// Encodes script source once per prefix scope, empty prefix first.
    pub fn encode_script_text_with_prefixes<S: AsRef<str>>(
        &mut self,
        text: &str,
        prefix_candidates: &[S],
    ) -> ScriptEncoding {
        let (map, names) = self.encoding_view();
        encode_script_text_with_prefixes(text, map, names, prefix_candidates)
    }

    /// Turns identifiers in script text back into original names.
    pub fn decode_script_text(&mut self, text: &str) -> String {
        let (map, names) = self.decoding_view(false);
        replace_all(text, map, names)
    }

    /// Encodes every string leaf (and optionally member name) of a document.
    pub fn encode_document(&mut self, doc: &mut Value, rename_keys: bool, strict: bool) {
        let (map, names) = self.encoding_view();
        replace_in_document(doc, map, names, DocumentMode::new(rename_keys, strict));
    }

    /// Decodes every string leaf (and optionally member name) of a document.
    pub fn decode_document(&mut self, doc: &mut Value, rename_keys: bool) {
        let (map, names) = self.decoding_view(false);
        replace_in_document(doc, map, names, DocumentMode::new(rename_keys, false));
    }

    /// Decodes a document for display, HTML-escaping the decoded names.
    ///
    /// Member names are decoded too.
    pub fn decode_document_html_safe(&mut self, doc: &mut Value) {
        let (map, names) = self.decoding_view(true);
        replace_in_document(doc, map, names, DocumentMode::new(true, false));
    }

    /// Annotates and encodes column names in an analysis options document.
    ///
    /// See [`crate::options::encode_column_names_in_options`].
    pub fn encode_column_names_in_options(
        &mut self,
        options: &mut Value,
        preloading_data: bool,
    ) -> BTreeSet<(String, ColumnType)> {
        crate::options::encode_column_names_in_options(self, options, preloading_data)
    }
}
