//! Renaming and removing columns inside stored scripts.
//!
//! Both operations build a throwaway replacer [`NameTable`]: old names are
//! first encoded to fresh identifiers, and those identifiers are then decoded
//! to their replacements. The table lives for a single call and never touches
//! a [`Registry`](crate::Registry).

use crate::core::config::{AffixConfig, EncoderConfig};
use crate::core::name_table::NameTable;
use crate::encoders::substitute::{encode_script_text, replace_all};

/// Renames columns in script source.
///
/// Only free occurrences outside string literals are renamed. Renames are
/// applied simultaneously, so swapping two columns works.
///
/// # Example
/// ```
/// use colenc::{AffixConfig, rewrite::replace_column_names_in_script};
///
/// let script = replace_column_names_in_script(
///     "lm(a ~ b)",
///     [("a", "b"), ("b", "a")],
///     &AffixConfig::default(),
/// );
/// assert_eq!(script, "lm(b ~ a)");
/// ```
pub fn replace_column_names_in_script<I, K, V>(
    script: &str,
    changes: I,
    affixes: &AffixConfig,
) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let table = NameTable::replacer(changes, affixes.prefix.as_str(), affixes.suffix.as_str());
    if table.is_empty() {
        return script.to_string();
    }

    let (encoded, found) =
        encode_script_text(script, table.encoding_map(), table.original_names(), "");
    tracing::debug!(renamed = found.len(), "rewrote column names in script");

    replace_all(&encoded, table.decoding_map(), table.encoded_names())
}

/// Replaces every free occurrence of the given columns with the configured
/// removal call, e.g. `stop('column age was removed from this script')`.
pub fn remove_column_names_from_script<I, S>(script: &str, removed: I, config: &EncoderConfig) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let changes: Vec<(String, String)> = removed
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            (name.to_string(), config.script.removed_column(name))
        })
        .collect();

    replace_column_names_in_script(script, changes, &config.replacer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn replacer() -> AffixConfig {
        EncoderConfig::default().replacer
    }

    #[test]
    fn test_rename_single_column() {
        let script = replace_column_names_in_script(
            "mean(weight) + weight2 + \"weight\"",
            [("weight", "mass")],
            &replacer(),
        );
        assert_eq!(script, "mean(mass) + weight2 + \"weight\"");
    }

    #[test]
    fn test_rename_chain_is_not_transitive() {
        let changes: BTreeMap<&str, &str> = [("a", "b"), ("b", "c")].into_iter().collect();
        let script = replace_column_names_in_script("a + b", changes, &replacer());
        assert_eq!(script, "b + c");
    }

    #[test]
    fn test_rename_longest_name_first() {
        let script = replace_column_names_in_script(
            "age + age group",
            [("age", "years"), ("age group", "cohort")],
            &replacer(),
        );
        assert_eq!(script, "years + cohort");
    }

    #[test]
    fn test_rename_without_changes_is_identity() {
        let changes: Vec<(String, String)> = Vec::new();
        assert_eq!(
            replace_column_names_in_script("x + y", changes, &replacer()),
            "x + y"
        );
    }

    #[test]
    fn test_remove_columns() {
        let config = EncoderConfig::default();
        let script = remove_column_names_from_script("x <- age * 2", ["age"], &config);
        assert_eq!(
            script,
            "x <- stop('column age was removed from this script') * 2"
        );
    }

    #[test]
    fn test_remove_with_custom_template() {
        let mut config = EncoderConfig::default();
        config.script.removed_column_template = "NA /* {name} */".to_string();
        let script = remove_column_names_from_script("sum(a, b)", vec!["b".to_string()], &config);
        assert_eq!(script, "sum(a, NA /* b */)");
    }
}
