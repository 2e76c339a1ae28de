//! Per-plugin configuration blobs.

use serde_json::{Map, Value};

use crate::config::{ConfigService, ConfigStore, SettingKey};
use crate::error::{MutationError, MutationFailure, ValidationError};

use super::plan::Plan;

fn plugin_settings(store: &ConfigStore) -> Map<String, Value> {
    match store.get_json(SettingKey::PluginSettings) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn plugin_view(store: &ConfigStore, plugin_id: &str) -> Map<String, Value> {
    match plugin_settings(store).remove(plugin_id) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

impl ConfigService {
    /// Replaces the configuration blob of one plugin, leaving other plugins untouched.
    pub async fn configure_plugin(
        &self,
        plugin_id: &str,
        input: Map<String, Value>,
    ) -> Result<Map<String, Value>, MutationFailure<Map<String, Value>>> {
        self.mutate(
            "plugin",
            |plan| plan_plugin(plan, plugin_id, input),
            |store| plugin_view(store, plugin_id),
        )
        .await
    }

    pub async fn plugin_configuration(&self, plugin_id: &str) -> Map<String, Value> {
        plugin_view(&*self.read().await, plugin_id)
    }
}

fn plan_plugin(
    plan: &mut Plan<'_>,
    plugin_id: &str,
    input: Map<String, Value>,
) -> Result<(), MutationError> {
    if plugin_id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            key: SettingKey::PluginSettings,
            value: plugin_id.to_string(),
            suggestion: Some("plugin id must not be empty".to_string()),
        }
        .into());
    }

    let mut settings = plugin_settings(plan.store());
    settings.insert(plugin_id.to_string(), Value::Object(input));
    plan.set(SettingKey::PluginSettings, Some(Value::Object(settings)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::test_support::service_in;
    use serde_json::json;
    use tempfile::TempDir;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    #[tokio::test]
    async fn plugin_blobs_are_independent() {
        let dir = TempDir::new().unwrap();
        let (service, _hooks) = service_in(&dir, |store| store);

        service
            .configure_plugin("tagger", object(json!({"threshold": 0.5})))
            .await
            .unwrap();
        let view = service
            .configure_plugin("renamer", object(json!({"pattern": "{title}"})))
            .await
            .unwrap();

        assert_eq!(Value::Object(view), json!({"pattern": "{title}"}));
        assert_eq!(
            Value::Object(service.plugin_configuration("tagger").await),
            json!({"threshold": 0.5})
        );

        let replaced = service
            .configure_plugin("tagger", object(json!({"enabled": false})))
            .await
            .unwrap();
        assert_eq!(Value::Object(replaced), json!({"enabled": false}));
        assert_eq!(
            Value::Object(service.plugin_configuration("renamer").await),
            json!({"pattern": "{title}"})
        );
    }

    #[tokio::test]
    async fn empty_plugin_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (service, _hooks) = service_in(&dir, |store| store);

        let failure = service
            .configure_plugin(" ", Map::new())
            .await
            .unwrap_err();
        assert!(failure.view.is_empty());
        assert!(matches!(failure.error, MutationError::Validation(_)));
    }
}
