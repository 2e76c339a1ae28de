//! Default options pre-filled into task dialogs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ConfigService, ConfigStore, SettingKey, SettingValue};
use crate::error::{MutationError, MutationFailure, ValidationError};

use super::plan::Plan;

/// Partial update of the task defaults group.
///
/// Task option blobs are stored as given; their schema belongs to the task runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsInput {
    pub identify: Option<Value>,
    pub scan: Option<Value>,
    pub auto_tag: Option<Value>,
    pub generate: Option<Value>,
    pub delete_file: Option<bool>,
    pub delete_generated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultsView {
    pub identify: Value,
    pub scan: Value,
    pub auto_tag: Value,
    pub generate: Value,
    pub delete_file: bool,
    pub delete_generated: bool,
}

impl DefaultsView {
    pub fn from_store(store: &ConfigStore) -> Self {
        Self {
            identify: store.get_json(SettingKey::DefaultIdentifySettings),
            scan: store.get_json(SettingKey::DefaultScanSettings),
            auto_tag: store.get_json(SettingKey::DefaultAutoTagSettings),
            generate: store.get_json(SettingKey::DefaultGenerateSettings),
            delete_file: store.get_bool(SettingKey::DeleteFileDefault),
            delete_generated: store.get_bool(SettingKey::DeleteGeneratedDefault),
        }
    }
}

impl ConfigService {
    /// Applies a partial update of the task defaults.
    pub async fn configure_defaults(
        &self,
        input: DefaultsInput,
    ) -> Result<DefaultsView, MutationFailure<DefaultsView>> {
        self.mutate(
            "defaults",
            |plan| plan_defaults(plan, input),
            DefaultsView::from_store,
        )
        .await
    }

    pub async fn defaults_view(&self) -> DefaultsView {
        DefaultsView::from_store(&*self.read().await)
    }
}

fn plan_defaults(plan: &mut Plan<'_>, input: DefaultsInput) -> Result<(), MutationError> {
    for (key, options) in [
        (SettingKey::DefaultIdentifySettings, input.identify),
        (SettingKey::DefaultScanSettings, input.scan),
        (SettingKey::DefaultAutoTagSettings, input.auto_tag),
        (SettingKey::DefaultGenerateSettings, input.generate),
    ] {
        plan.set_checked(key, options, |v| require_object(key, v))?;
    }

    plan.set(SettingKey::DeleteFileDefault, input.delete_file)?;
    plan.set(SettingKey::DeleteGeneratedDefault, input.delete_generated)?;

    Ok(())
}

fn require_object(key: SettingKey, value: &SettingValue) -> Result<(), ValidationError> {
    match value {
        SettingValue::Json(Value::Object(_)) => Ok(()),
        other => Err(ValidationError::InvalidValue {
            key,
            value: serde_json::to_string(other).unwrap_or_default(),
            suggestion: Some("task options must be a mapping".to_string()),
        }),
    }
}
