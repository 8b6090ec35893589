use crate::core::column_type::ColumnType;
use crate::encoders::errors::EncodeError;
use std::collections::{BTreeMap, HashMap};

/// Default prefix for synthetic identifiers.
pub const DEFAULT_PREFIX: &str = "Column_";
/// Default suffix for synthetic identifiers.
pub const DEFAULT_SUFFIX: &str = "_Encoded";

/// A bidirectional table between user column names and synthetic identifiers.
///
/// Identifiers are generated as `prefix + counter + suffix`, so with a prefix
/// and suffix that are valid in the target script language every identifier
/// is safe to splice into generated code, whatever the user named the column.
///
/// Columns with a known [`ColumnType`] are registered once per concrete type
/// (`age.scale`, `age.ordinal`, `age.nominal`), and the bare name points at
/// the identifier of its declared type.
///
/// # Example
///
/// ```
/// use colenc::{ColumnType, NameTable};
///
/// let mut table = NameTable::builder()
///     .prefix("Col_")
///     .suffix("_X")
///     .build()
///     .unwrap();
/// table.set_names([("age", ColumnType::Scale)]);
///
/// let id = table.encode("age").unwrap();
/// assert_eq!(id, table.encode("age.scale").unwrap());
/// assert_eq!(table.decode(&id).unwrap(), "age");
/// assert_eq!(table.type_of(&id), ColumnType::Scale);
/// ```
#[derive(Debug, Clone)]
pub struct NameTable {
    prefix: String,
    suffix: String,
    encoding_map: HashMap<String, String>,
    decoding_map: HashMap<String, String>,
    decoding_types: HashMap<String, ColumnType>,
    original_names: Vec<String>,
    encoded_names: Vec<String>,
    dataset_types: BTreeMap<String, ColumnType>,
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_SUFFIX)
    }
}

impl NameTable {
    /// Creates an empty table without checking the affixes.
    ///
    /// Outside the crate tables come from [`NameTable::builder`], which
    /// rejects affixes that would not form a single identifier.
    pub(crate) fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        NameTable {
            prefix: prefix.into(),
            suffix: suffix.into(),
            encoding_map: HashMap::new(),
            decoding_map: HashMap::new(),
            decoding_types: HashMap::new(),
            original_names: Vec::new(),
            encoded_names: Vec::new(),
            dataset_types: BTreeMap::new(),
        }
    }

    /// Creates a new NameTableBuilder.
    pub fn builder() -> NameTableBuilder {
        NameTableBuilder::new()
    }

    /// Builds a throwaway table for rewriting scripts.
    ///
    /// Every old name encodes to a fresh identifier, and that identifier
    /// decodes to the *new* name. Encoding a script and then decoding it with
    /// this table therefore renames the columns in one pass, without a rename
    /// of `a` to `b` being caught by a later rename of `b` to `c`.
    pub(crate) fn replacer<I, K, V>(
        changes: I,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let changes: BTreeMap<String, String> = changes
            .into_iter()
            .map(|(old, new)| (old.into(), new.into()))
            .collect();

        let mut table = NameTable::new(prefix, suffix);
        table.set_names(changes.keys().map(|old| (old.clone(), ColumnType::Unknown)));

        for original in table.decoding_map.values_mut() {
            if let Some(new) = changes.get(original.as_str()) {
                *original = new.clone();
            }
        }

        table
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Replaces the whole table with a fresh name set.
    ///
    /// Previous contents are dropped, not merged, and the identifier counter
    /// restarts at zero. Names are processed in sorted order so the same input
    /// always yields the same identifiers.
    pub fn set_names<I, S>(&mut self, names_with_types: I)
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        self.encoding_map.clear();
        self.decoding_map.clear();
        self.decoding_types.clear();
        self.original_names.clear();
        self.encoded_names.clear();

        self.dataset_types = names_with_types
            .into_iter()
            .map(|(name, ty)| (name.into(), ty))
            .collect();

        let mut counter: usize = 0;
        let mut next_identifier = || {
            let id = format!("{}{}{}", self.prefix, counter, self.suffix);
            counter += 1;
            id
        };

        for (name, declared) in &self.dataset_types {
            self.original_names.push(name.clone());

            if !declared.is_known() {
                let encoded = next_identifier();
                self.encoding_map.insert(name.clone(), encoded.clone());
                self.decoding_map.insert(encoded.clone(), name.clone());
                self.encoded_names.push(encoded);
                continue;
            }

            for ty in ColumnType::CONCRETE {
                let qualified = ty.qualify(name);
                let encoded = next_identifier();

                self.original_names.push(qualified.clone());
                self.encoding_map.insert(qualified, encoded.clone());
                // Decoding always lands on the bare name in the data
                self.decoding_map.insert(encoded.clone(), name.clone());
                self.decoding_types.insert(encoded.clone(), ty);
                self.encoded_names.push(encoded.clone());

                if ty == *declared {
                    self.encoding_map.insert(name.clone(), encoded);
                }
            }
        }

        sort_longest_first(&mut self.original_names);
        sort_longest_first(&mut self.encoded_names);

        tracing::debug!(
            columns = self.dataset_types.len(),
            identifiers = self.encoded_names.len(),
            "rebuilt name table"
        );
    }

    /// Looks up the identifier for a name in this table only.
    pub fn encode(&self, name: &str) -> Result<String, EncodeError> {
        if name.is_empty() {
            return Ok(String::new());
        }
        self.encoding_map
            .get(name)
            .cloned()
            .ok_or_else(|| EncodeError::not_a_column_name(name, &self.original_names))
    }

    /// Looks up the original name for an identifier in this table only.
    pub fn decode(&self, encoded: &str) -> Result<String, EncodeError> {
        if encoded.is_empty() {
            return Ok(String::new());
        }
        self.decoding_map
            .get(encoded)
            .cloned()
            .ok_or_else(|| EncodeError::not_an_encoded_name(encoded))
    }

    /// Declared type behind an identifier, `Unknown` when there is none.
    pub fn type_of(&self, encoded: &str) -> ColumnType {
        self.decoding_types
            .get(encoded)
            .copied()
            .unwrap_or_default()
    }

    pub fn should_encode(&self, name: &str) -> bool {
        self.encoding_map.contains_key(name)
    }

    pub fn should_decode(&self, encoded: &str) -> bool {
        self.decoding_map.contains_key(encoded)
    }

    /// Declared type of a bare dataset column as supplied to [`set_names`](Self::set_names).
    pub fn dataset_type(&self, name: &str) -> Option<ColumnType> {
        self.dataset_types.get(name).copied()
    }

    pub fn dataset_types(&self) -> &BTreeMap<String, ColumnType> {
        &self.dataset_types
    }

    pub fn encoding_map(&self) -> &HashMap<String, String> {
        &self.encoding_map
    }

    pub fn decoding_map(&self) -> &HashMap<String, String> {
        &self.decoding_map
    }

    pub fn decoding_types(&self) -> &HashMap<String, ColumnType> {
        &self.decoding_types
    }

    /// Original names, longest first.
    pub fn original_names(&self) -> &[String] {
        &self.original_names
    }

    /// Synthetic identifiers, longest first.
    pub fn encoded_names(&self) -> &[String] {
        &self.encoded_names
    }

    pub fn is_empty(&self) -> bool {
        self.encoding_map.is_empty()
    }
}

/// Sorts names so longer ones come first.
///
/// Replacement tries candidates in this order, so a short name never bites a
/// chunk out of a longer name that contains it.
pub fn sort_longest_first(names: &mut Vec<String>) {
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();
}

/// Builder for a [`NameTable`] with custom identifier affixes.
#[derive(Debug, Default)]
pub struct NameTableBuilder {
    prefix: Option<String>,
    suffix: Option<String>,
}

impl NameTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier prefix. Default is `Column_`.
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the identifier suffix. Default is `_Encoded`.
    pub fn suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Builds the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is empty or does not start with a
    /// letter, or if either affix contains characters outside
    /// `[A-Za-z0-9_.]`. Such identifiers would not be single names in the
    /// generated script.
    pub fn build(self) -> Result<NameTable, String> {
        let prefix = self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let suffix = self.suffix.unwrap_or_else(|| DEFAULT_SUFFIX.to_string());

        if !prefix.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(format!(
                "Identifier prefix must start with a letter, got '{}'",
                prefix
            ));
        }

        for affix in [&prefix, &suffix] {
            if let Some(bad) = affix.chars().find(|c| !crate::encoders::scanner::is_name_char(*c)) {
                return Err(format!(
                    "Identifier affix '{}' contains invalid character '{}'",
                    affix, bad
                ));
            }
        }

        Ok(NameTable::new(prefix, suffix))
    }
}
