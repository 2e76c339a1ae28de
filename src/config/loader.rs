//! Configuration file loading and override resolution.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use super::keys::SettingKey;
use super::store::ConfigStore;
use crate::error::StoreError;

/// Prefix for environment variables that override settings.
pub const ENV_PREFIX: &str = "MEDIA_";

/// Loads the configuration document from disk.
///
/// A missing file yields an empty document so a fresh install can be configured.
pub fn load_document(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, starting from defaults");
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| StoreError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let document: BTreeMap<String, Value> =
        serde_yaml::from_str(&content).map_err(|e| StoreError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(document)
}

/// Parses a raw override into a JSON value.
///
/// Scalars and JSON literals keep their type (`true`, `4`, `["a"]`); anything else
/// is taken as a plain string.
pub fn parse_override_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parses a `key=value` command-line override.
pub fn parse_flag_override(raw: &str) -> Result<(SettingKey, Value), StoreError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| StoreError::InvalidOverride(raw.to_string()))?;
    let key: SettingKey = key
        .trim()
        .parse()
        .map_err(|_| StoreError::InvalidOverride(raw.to_string()))?;
    Ok((key, parse_override_value(value)))
}

/// Collects overrides from an environment snapshot.
pub fn env_overrides<I>(vars: I) -> Vec<(SettingKey, Value)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: BTreeMap<String, String> = vars
        .into_iter()
        .filter(|(name, _)| name.starts_with(ENV_PREFIX))
        .collect();

    SettingKey::ALL
        .iter()
        .filter_map(|key| {
            vars.get(&key.env_var())
                .map(|raw| (*key, parse_override_value(raw)))
        })
        .collect()
}

/// Options controlling how the store is opened.
#[derive(Debug, Default, Clone)]
pub struct LoadOptions {
    /// `key=value` overrides from the command line.
    pub flag_overrides: Vec<String>,
    /// Tolerate a read-only configuration file.
    pub allow_read_only: bool,
}

/// Opens the store: reads the document, its side files, and all override sources.
///
/// Command-line overrides take precedence over environment variables.
pub fn open_store(path: &Path, options: &LoadOptions) -> Result<ConfigStore, StoreError> {
    let document = load_document(path)?;
    let mut store = ConfigStore::new(path)
        .with_document(document)
        .with_read_only_tolerance(options.allow_read_only);

    let dir = store.config_dir().to_path_buf();
    for key in SettingKey::ALL {
        let Some(file_name) = key.asset_file_name() else {
            continue;
        };
        let asset_path = dir.join(file_name);
        if asset_path.is_file() {
            let content =
                std::fs::read_to_string(&asset_path).map_err(|e| StoreError::ReadFailed {
                    path: asset_path.clone(),
                    source: e,
                })?;
            store.insert_loaded_asset(*key, content);
        }
    }

    for (key, value) in env_overrides(std::env::vars()) {
        tracing::info!(key = %key, "Setting overridden by environment");
        store = store.with_override(key, value);
    }

    for raw in &options.flag_overrides {
        let (key, value) = parse_flag_override(raw)?;
        tracing::info!(key = %key, "Setting overridden by command line");
        store = store.with_override(key, value);
    }

    Ok(store)
}
