use crate::core::name_table::{DEFAULT_PREFIX, DEFAULT_SUFFIX, NameTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const REPLACER_SUFFIX: &str = "_For_Replacement";

/// Affixes used to generate synthetic identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffixConfig {
    pub prefix: String,
    pub suffix: String,
}

impl Default for AffixConfig {
    fn default() -> Self {
        AffixConfig {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl AffixConfig {
    fn replacer_default() -> Self {
        AffixConfig {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: REPLACER_SUFFIX.to_string(),
        }
    }

    /// Builds an empty table with these affixes, validating them.
    pub fn build_table(&self) -> Result<NameTable, String> {
        NameTable::builder()
            .prefix(self.prefix.as_str())
            .suffix(self.suffix.as_str())
            .build()
    }
}

/// Settings for script text rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSettings {
    /// Candidate mandatory prefixes, e.g. `data.`
    #[serde(default)]
    pub allowed_prefixes: Vec<String>,
    /// Replacement for removed columns; `{name}` is substituted
    #[serde(default = "default_removed_template")]
    pub removed_column_template: String,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        ScriptSettings {
            allowed_prefixes: Vec::new(),
            removed_column_template: default_removed_template(),
        }
    }
}

impl ScriptSettings {
    /// Renders the removal call for a column.
    pub fn removed_column(&self, name: &str) -> String {
        self.removed_column_template.replace("{name}", name)
    }
}

fn default_removed_template() -> String {
    "stop('column {name} was removed from this script')".to_string()
}

/// Global settings for colenc.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Default names mapping used when no `--names` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names_file: Option<String>,
}

impl Settings {
    /// The names file with `~` expanded.
    pub fn names_path(&self) -> Option<PathBuf> {
        self.names_file
            .as_ref()
            .map(|path| PathBuf::from(shellexpand::tilde(path).as_ref()))
    }
}

/// Encoder configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Affixes of the primary and auxiliary tables
    #[serde(default)]
    pub encoder: AffixConfig,
    /// Affixes of the script rewrite table
    #[serde(default = "AffixConfig::replacer_default")]
    pub replacer: AffixConfig,
    #[serde(default)]
    pub script: ScriptSettings,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            encoder: AffixConfig::default(),
            replacer: AffixConfig::replacer_default(),
            script: ScriptSettings::default(),
            settings: Settings::default(),
        }
    }
}

/// Errors loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "error: cannot read config {:?}: {}", path, source)
            }
            ConfigError::Parse(e) => write!(f, "error: invalid config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "error: invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl EncoderConfig {
    /// Parses a configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EncoderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the built-in configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_toml(include_str!("../../colenc.toml"))
    }

    /// Loads a configuration file on its own.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&read_file(path)?)
    }

    /// Loads configuration with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in configuration (from library)
    /// 2. `~/.config/colenc/colenc.toml` (user overrides)
    /// 3. `./colenc.toml` (project-local overrides)
    ///
    /// Later files override earlier ones field by field. A file that fails to
    /// load is reported and skipped.
    pub fn load_with_overrides() -> Result<Self, ConfigError> {
        Self::load_layered(&Self::override_paths())
    }

    /// The user and project-local override files, in priority order.
    pub fn override_paths() -> Vec<PathBuf> {
        let mut layers = vec![];

        if let Some(config_dir) = dirs::config_dir() {
            layers.push(config_dir.join("colenc").join("colenc.toml"));
        }
        layers.push(PathBuf::from("colenc.toml"));
        layers
    }

    /// Loads the built-in configuration, then overlays each existing file.
    pub fn load_layered(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged: toml::Table = toml::from_str(include_str!("../../colenc.toml"))?;

        for path in paths {
            if !path.exists() {
                continue;
            }
            match read_file(path).and_then(|s| toml::from_str::<toml::Table>(&s).map_err(Into::into)) {
                Ok(overlay) => {
                    tracing::debug!(?path, "applying config overrides");
                    merge_tables(&mut merged, overlay);
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                }
            }
        }

        let config: EncoderConfig = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both affix pairs produce valid identifiers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.encoder
            .build_table()
            .map_err(|e| ConfigError::Invalid(format!("[encoder] {}", e)))?;
        self.replacer
            .build_table()
            .map_err(|e| ConfigError::Invalid(format!("[replacer] {}", e)))?;
        if self.encoder == self.replacer {
            return Err(ConfigError::Invalid(
                "[replacer] affixes must differ from [encoder] affixes".to_string(),
            ));
        }
        Ok(())
    }

    /// Serializes the effective configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Deep-merges `overlay` into `base`; tables merge, everything else replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
