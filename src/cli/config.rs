use colenc::{ColumnType, EncoderConfig, Registry};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Loads the effective configuration, with `--config` layered on top.
pub fn load_config(extra: Option<&Path>) -> Result<EncoderConfig, Box<dyn std::error::Error>> {
    let config = match extra {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Config file '{}' does not exist", path.display()).into());
            }
            let mut layers = EncoderConfig::override_paths();
            layers.push(path.to_path_buf());
            EncoderConfig::load_layered(&layers)?
        }
        None => EncoderConfig::load_with_overrides()?,
    };
    Ok(config)
}

/// Reads the whole input file, or stdin when no file is given.
pub fn read_input(file: Option<&PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(path) = file {
        return fs::read_to_string(path)
            .map_err(|e| format!("Cannot read '{}': {}", path.display(), e).into());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Writes to the output file, or stdout when no file is given.
pub fn write_output(output: Option<&PathBuf>, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => fs::write(path, text)?,
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

/// Reads a JSON object whose values are strings.
pub fn read_string_map(path: &Path) -> Result<BTreeMap<String, String>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Invalid JSON object in '{}': {}", path.display(), e).into())
}

/// Loads the column names, from `--names` or the configured names file.
pub fn load_names(
    names: Option<&PathBuf>,
    config: &EncoderConfig,
) -> Result<BTreeMap<String, ColumnType>, Box<dyn std::error::Error>> {
    let path = names
        .cloned()
        .or_else(|| config.settings.names_path())
        .ok_or("No names file: pass --names or set names_file in [settings]")?;

    let raw = read_string_map(&path)?;
    let mut names = BTreeMap::new();
    for (name, ty) in raw {
        let ty = ty
            .parse::<ColumnType>()
            .map_err(|e| format!("Column '{}': {}", name, e))?;
        names.insert(name, ty);
    }

    tracing::info!(columns = names.len(), path = %path.display(), "loaded column names");
    Ok(names)
}

/// Builds a registry whose primary table holds the loaded names.
pub fn create_registry(
    names: Option<&PathBuf>,
    config: &EncoderConfig,
) -> Result<Registry, Box<dyn std::error::Error>> {
    let names = load_names(names, config)?;
    let mut registry = Registry::with_config(config)?;
    registry.set_names(names);
    Ok(registry)
}
