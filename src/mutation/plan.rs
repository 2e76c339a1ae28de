//! Staged changes validated against the store before anything is applied.

use std::path::PathBuf;

use tracing::debug;

use crate::config::{ConfigStore, SettingKey, SettingValue};
use crate::error::MutationError;
use crate::refresh::RefreshFlags;

use super::ChangeSet;

/// Changes one mutation intends to make, checked against a resolved view.
///
/// The resolved value of a key is the value staged earlier in the same call if
/// there is one, otherwise the value the store currently reports. The store is
/// only read here; [`Plan::into_parts`] hands the staged values and the
/// directories they need to the caller for application.
pub struct Plan<'a> {
    store: &'a ConfigStore,
    changes: ChangeSet,
    flags: RefreshFlags,
    directories: Vec<PathBuf>,
}

impl<'a> Plan<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self {
            store,
            changes: ChangeSet::new(),
            flags: RefreshFlags::default(),
            directories: Vec::new(),
        }
    }

    pub fn store(&self) -> &'a ConfigStore {
        self.store
    }

    /// Resolves a key to its pending value, falling back to the stored one.
    pub fn resolved(&self, key: SettingKey, like: &SettingValue) -> SettingValue {
        match self.changes.get(key) {
            Some(pending) => pending.clone(),
            None => self.store.current(key, like),
        }
    }

    pub fn resolved_bool(&self, key: SettingKey) -> bool {
        match self.changes.get(key) {
            Some(SettingValue::Bool(b)) => *b,
            _ => self.store.get_bool(key),
        }
    }

    pub fn resolved_string(&self, key: SettingKey) -> String {
        match self.changes.get(key) {
            Some(SettingValue::Str(s)) => s.clone(),
            _ => self.store.get_string(key),
        }
    }

    /// Returns true if writing `value` would change the resolved value.
    ///
    /// A change to an overridden key is rejected; writing the value the
    /// override already supplies is a no-op and passes.
    pub fn is_change(&self, key: SettingKey, value: &SettingValue) -> Result<bool, MutationError> {
        if self.resolved(key, value) == *value {
            return Ok(false);
        }
        self.ensure_mutable(key)?;
        Ok(true)
    }

    /// Fails if `key` is controlled by an external override source.
    pub fn ensure_mutable(&self, key: SettingKey) -> Result<(), MutationError> {
        if self.store.has_override(key) {
            return Err(MutationError::OverriddenConfig { key });
        }
        Ok(())
    }

    /// Records a value without comparison or validation.
    pub fn record(&mut self, key: SettingKey, value: SettingValue) {
        debug!(key = %key, "Staging configuration change");
        self.changes.record(key, value);
    }

    /// Stages an optional value that needs no validation.
    ///
    /// Returns true if the value was staged.
    pub fn set<T>(&mut self, key: SettingKey, value: Option<T>) -> Result<bool, MutationError>
    where
        T: Into<SettingValue>,
    {
        self.set_checked(key, value, |_| Ok::<(), MutationError>(()))
    }

    /// Stages an optional value after it passes `validate`.
    ///
    /// Absent values and values equal to the resolved one are skipped, and the
    /// validator only runs for real changes.
    pub fn set_checked<T, E, F>(
        &mut self,
        key: SettingKey,
        value: Option<T>,
        validate: F,
    ) -> Result<bool, MutationError>
    where
        T: Into<SettingValue>,
        E: Into<MutationError>,
        F: FnOnce(&SettingValue) -> Result<(), E>,
    {
        let Some(value) = value else {
            return Ok(false);
        };
        let value = value.into();
        if !self.is_change(key, &value)? {
            return Ok(false);
        }

        validate(&value).map_err(Into::into)?;
        self.record(key, value);
        Ok(true)
    }

    /// Flags subsystems to refresh once the plan is committed.
    pub fn refresh(&mut self, update: impl FnOnce(&mut RefreshFlags)) {
        update(&mut self.flags);
    }

    /// Stages a directory path setting, creating the directory only on apply.
    ///
    /// An optional directory may be cleared with an empty value.
    pub fn set_directory(
        &mut self,
        key: SettingKey,
        value: Option<String>,
        optional: bool,
    ) -> Result<bool, MutationError> {
        if !self.set(key, value)? {
            return Ok(false);
        }

        let path = self.resolved_string(key);
        if !(optional && path.is_empty()) {
            self.directories.push(PathBuf::from(path));
        }
        Ok(true)
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn into_parts(self) -> (ChangeSet, RefreshFlags, Vec<PathBuf>) {
        (self.changes, self.flags, self.directories)
    }
}

/// Borrows the string inside a staged value; other variants read as empty.
pub(crate) fn as_str(value: &SettingValue) -> &str {
    match value {
        SettingValue::Str(s) => s,
        _ => "",
    }
}

/// Borrows the list inside a staged value; other variants read as empty.
pub(crate) fn as_list(value: &SettingValue) -> &[String] {
    match value {
        SettingValue::List(items) => items,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;

    #[test]
    fn unchanged_value_is_skipped() {
        let store = ConfigStore::new("/tmp/unused/config.yml");
        let mut plan = Plan::new(&store);

        assert!(!plan.set(SettingKey::ParallelTasks, Some(1i64)).unwrap());
        assert!(plan.set(SettingKey::ParallelTasks, Some(3i64)).unwrap());
        assert!(!plan.set::<bool>(SettingKey::PreviewAudio, None).unwrap());
        assert_eq!(plan.changes().len(), 1);
    }

    #[test]
    fn overridden_key_rejects_changes_only() {
        let store = ConfigStore::new("/tmp/unused/config.yml")
            .with_override(SettingKey::Generated, json!("/locked"));
        let mut plan = Plan::new(&store);

        assert!(!plan.set(SettingKey::Generated, Some("/locked")).unwrap());
        let err = plan.set(SettingKey::Generated, Some("/other")).unwrap_err();
        assert!(matches!(
            err,
            MutationError::OverriddenConfig {
                key: SettingKey::Generated
            }
        ));
    }

    #[test]
    fn validator_runs_only_for_changes() {
        let store = ConfigStore::new("/tmp/unused/config.yml");
        let mut plan = Plan::new(&store);

        let rejected = plan.set_checked(SettingKey::LogLevel, Some("Loud"), |_| {
            Err(ValidationError::PolicyViolation("no".into()))
        });
        assert!(rejected.is_err());
        assert!(plan.changes().is_empty());

        let unchanged = plan.set_checked(SettingKey::LogLevel, Some("Info"), |_| {
            Err(ValidationError::PolicyViolation("never called".into()))
        });
        assert!(!unchanged.unwrap());
    }

    #[test]
    fn directories_are_staged_not_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.yml"));
        let mut plan = Plan::new(&store);
        let generated = dir.path().join("generated");

        let staged = plan
            .set_directory(
                SettingKey::Generated,
                Some(generated.display().to_string()),
                false,
            )
            .unwrap();
        assert!(staged);
        assert!(plan.set_directory(SettingKey::Cache, Some(String::new()), true).unwrap());

        assert_eq!(plan.directories(), &[generated.clone()]);
        assert!(!generated.exists());
    }

    #[test]
    fn resolved_prefers_pending_value() {
        let store = ConfigStore::new("/tmp/unused/config.yml");
        let mut plan = Plan::new(&store);
        assert!(!plan.resolved_bool(SettingKey::CalculateMd5));

        plan.set(SettingKey::CalculateMd5, Some(true)).unwrap();
        assert!(plan.resolved_bool(SettingKey::CalculateMd5));
        assert!(!store.get_bool(SettingKey::CalculateMd5));
    }
}
