//! In-memory configuration document with override resolution and durable commit.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::defaults::default_value;
use super::keys::SettingKey;
use super::model::{PackageSource, SettingValue, StashBox, StashPath};
use crate::error::StoreError;

/// The single mutable source of truth for settings.
///
/// Lookups resolve in order: override, stored value, built-in default.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    document: BTreeMap<String, Value>,
    assets: BTreeMap<SettingKey, String>,
    dirty_assets: BTreeSet<SettingKey>,
    overrides: HashMap<SettingKey, Value>,
    allow_read_only: bool,
}

impl ConfigStore {
    /// Creates an empty store that will be committed to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: BTreeMap::new(),
            assets: BTreeMap::new(),
            dirty_assets: BTreeSet::new(),
            overrides: HashMap::new(),
            allow_read_only: false,
        }
    }

    /// Replaces the persisted document, typically right after loading it.
    pub fn with_document(mut self, document: BTreeMap<String, Value>) -> Self {
        self.document = document;
        self
    }

    /// Adds an externally supplied value that mutation may not change.
    pub fn with_override(mut self, key: SettingKey, value: Value) -> Self {
        self.overrides.insert(key, value);
        self
    }

    /// Accept failed commits and report the attempted change instead.
    pub fn with_read_only_tolerance(mut self, allow: bool) -> Self {
        self.allow_read_only = allow;
        self
    }

    pub(crate) fn insert_loaded_asset(&mut self, key: SettingKey, content: String) {
        self.assets.insert(key, content);
    }

    /// Path of the persisted document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the document and its side files.
    pub fn config_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn allow_read_only(&self) -> bool {
        self.allow_read_only
    }

    /// Returns true if the key is controlled by an external override source.
    pub fn has_override(&self, key: SettingKey) -> bool {
        self.overrides.contains_key(&key)
    }

    /// Returns the overridden keys, sorted by identifier.
    pub fn override_keys(&self) -> Vec<SettingKey> {
        let mut keys: Vec<_> = self.overrides.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Returns the raw persisted document.
    pub fn document(&self) -> &BTreeMap<String, Value> {
        &self.document
    }

    /// Resolves a key without falling back to the built-in default.
    fn explicit(&self, key: SettingKey) -> Option<Cow<'_, Value>> {
        if let Some(value) = self.overrides.get(&key) {
            return Some(Cow::Borrowed(value));
        }
        if key.asset_file_name().is_some() {
            return self
                .assets
                .get(&key)
                .map(|content| Cow::Owned(Value::String(content.clone())));
        }
        self.document.get(key.as_str()).map(Cow::Borrowed)
    }

    fn typed<T>(&self, key: SettingKey, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        if let Some(value) = self.explicit(key) {
            if let Some(converted) = convert(&value) {
                return Some(converted);
            }
            warn!(key = %key, value = %value, "Stored value has unexpected type, using default");
        }
        default_value(key).as_ref().and_then(convert)
    }

    pub fn get_string(&self, key: SettingKey) -> String {
        self.typed(key, coerce_string).unwrap_or_default()
    }

    pub fn get_bool(&self, key: SettingKey) -> bool {
        self.typed(key, coerce_bool).unwrap_or(false)
    }

    pub fn get_int(&self, key: SettingKey) -> i64 {
        self.typed(key, coerce_int).unwrap_or(0)
    }

    pub fn get_float(&self, key: SettingKey) -> f64 {
        self.typed(key, coerce_float).unwrap_or(0.0)
    }

    pub fn get_string_list(&self, key: SettingKey) -> Vec<String> {
        self.typed(key, coerce_string_list).unwrap_or_default()
    }

    /// Returns a structured value, or `Value::Null` when unset.
    pub fn get_json(&self, key: SettingKey) -> Value {
        self.typed(key, |v| Some(v.clone())).unwrap_or(Value::Null)
    }

    /// Decodes a structured value into `T`, falling back to `T::default()`.
    pub fn get_structured<T: DeserializeOwned + Default>(&self, key: SettingKey) -> T {
        self.typed(key, |v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    pub fn get_stash_paths(&self) -> Vec<StashPath> {
        self.get_structured(SettingKey::Stash)
    }

    pub fn get_stash_boxes(&self) -> Vec<StashBox> {
        self.get_structured(SettingKey::StashBoxes)
    }

    pub fn get_package_sources(&self, key: SettingKey) -> Vec<PackageSource> {
        self.get_structured(key)
    }

    /// Returns the value a typed setter would compare against.
    pub fn current(&self, key: SettingKey, like: &SettingValue) -> SettingValue {
        match like {
            SettingValue::Bool(_) => SettingValue::Bool(self.get_bool(key)),
            SettingValue::Int(_) => SettingValue::Int(self.get_int(key)),
            SettingValue::Float(_) => SettingValue::Float(self.get_float(key)),
            SettingValue::Str(_) => SettingValue::Str(self.get_string(key)),
            SettingValue::List(_) => SettingValue::List(self.get_string_list(key)),
            SettingValue::Stashes(_) => SettingValue::Stashes(self.get_stash_paths()),
            SettingValue::StashBoxes(_) => SettingValue::StashBoxes(self.get_stash_boxes()),
            SettingValue::PackageSources(_) => {
                SettingValue::PackageSources(self.get_package_sources(key))
            }
            SettingValue::Json(_) => SettingValue::Json(self.get_json(key)),
        }
    }

    /// Writes a value into the in-memory document.
    ///
    /// Nothing reaches durable storage until [`ConfigStore::commit`].
    pub fn set(&mut self, key: SettingKey, value: &SettingValue) -> Result<(), StoreError> {
        if key.asset_file_name().is_some() {
            let content = match value {
                SettingValue::Str(s) => s.clone(),
                other => serde_json::to_string(other)
                    .map_err(|e| StoreError::SerializeFailed(e.to_string()))?,
            };
            self.assets.insert(key, content);
            self.dirty_assets.insert(key);
            return Ok(());
        }

        let json =
            serde_json::to_value(value).map_err(|e| StoreError::SerializeFailed(e.to_string()))?;
        debug!(key = %key, "Setting configuration value");
        self.document.insert(key.as_str().to_string(), json);
        Ok(())
    }

    /// Serializes the whole document to durable storage.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(&self.document)
            .map_err(|e| StoreError::SerializeFailed(e.to_string()))?;
        atomic_write(&self.path, yaml.as_bytes())?;

        let dir = self.config_dir().to_path_buf();
        let pending: Vec<SettingKey> = std::mem::take(&mut self.dirty_assets).into_iter().collect();
        for (i, key) in pending.iter().enumerate() {
            let (Some(file_name), Some(content)) = (key.asset_file_name(), self.assets.get(key))
            else {
                continue;
            };
            if let Err(e) = atomic_write(&dir.join(file_name), content.as_bytes()) {
                // keep unwritten assets dirty for the next commit
                self.dirty_assets.extend(pending[i..].iter().copied());
                return Err(e);
            }
        }

        debug!(path = %self.path.display(), "Configuration committed");
        Ok(())
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items.iter().map(coerce_string).collect(),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        Value::Null => Some(Vec::new()),
        _ => None,
    }
}

/// Writes content to a temporary sibling, syncs it, then renames over `path`.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let write_err = |source: std::io::Error| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("config.yml");
    let temp_path = parent.join(format!(".{}.tmp", file_name));

    let mut file = File::create(&temp_path).map_err(write_err)?;
    if let Err(e) = file.write_all(content).and_then(|()| file.sync_all()) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        write_err(e)
    })
}
