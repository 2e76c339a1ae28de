//! Free-form web UI configuration blob.

use serde_json::{Map, Value};

use crate::config::{ConfigService, ConfigStore, SettingKey};
use crate::error::{MutationError, MutationFailure, ValidationError};

use super::plan::Plan;

/// Recursively merges `src` into `dest`.
///
/// Keys present in `src` overwrite those in `dest`, except that two mappings
/// under the same key are merged. Keys only in `dest` are kept.
pub fn merge_maps(dest: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, value) in src {
        match value {
            Value::Object(incoming) => match dest.get_mut(&key) {
                Some(Value::Object(existing)) => merge_maps(existing, incoming),
                _ => {
                    dest.insert(key, Value::Object(incoming));
                }
            },
            other => {
                dest.insert(key, other);
            }
        }
    }
}

/// Sets `value` at a dotted path, creating intermediate mappings.
fn set_nested(
    root: &mut Map<String, Value>,
    path: &str,
    value: Value,
) -> Result<(), ValidationError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ValidationError::InvalidValue {
            key: SettingKey::Ui,
            value: path.to_string(),
            suggestion: Some("expected a dotted path such as 'scene.autoplay'".to_string()),
        });
    }

    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return Ok(()),
    };
    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return Ok(()),
        };
    }
    current.insert(last.to_string(), value);
    Ok(())
}

fn ui_map(store: &ConfigStore) -> Map<String, Value> {
    match store.get_json(SettingKey::Ui) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl ConfigService {
    /// Replaces the UI blob with `input` and/or merges `partial` into it.
    ///
    /// With both given, the partial is merged into the replacement.
    pub async fn configure_ui(
        &self,
        input: Option<Map<String, Value>>,
        partial: Option<Map<String, Value>>,
    ) -> Result<Map<String, Value>, MutationFailure<Map<String, Value>>> {
        self.mutate("ui", |plan| plan_ui(plan, input, partial), ui_map)
            .await
    }

    /// Sets a single UI value addressed by a dotted path.
    pub async fn configure_ui_setting(
        &self,
        key: &str,
        value: Value,
    ) -> Result<Map<String, Value>, MutationFailure<Map<String, Value>>> {
        self.mutate(
            "ui",
            |plan| {
                let mut ui = ui_map(plan.store());
                set_nested(&mut ui, key, value)?;
                plan_ui(plan, Some(ui), None)
            },
            ui_map,
        )
        .await
    }

    pub async fn ui_configuration(&self) -> Map<String, Value> {
        ui_map(&*self.read().await)
    }
}

fn plan_ui(
    plan: &mut Plan<'_>,
    input: Option<Map<String, Value>>,
    partial: Option<Map<String, Value>>,
) -> Result<(), MutationError> {
    if input.is_none() && partial.is_none() {
        return Ok(());
    }

    let mut ui = input.unwrap_or_else(|| ui_map(plan.store()));
    if let Some(partial) = partial {
        merge_maps(&mut ui, partial);
    }
    plan.set(SettingKey::Ui, Some(Value::Object(ui)))?;
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

    #[test]
    fn merge_recurses_into_nested_maps() {
        let mut existing = object(json!({"a": {"y": 2}, "b": 3}));
        merge_maps(&mut existing, object(json!({"a": {"x": 1}})));
        assert_eq!(Value::Object(existing), json!({"a": {"x": 1, "y": 2}, "b": 3}));
    }

    #[test]
    fn merge_replaces_scalars_and_mismatched_types() {
        let mut existing = object(json!({"a": 1, "b": {"c": true}, "d": [1]}));
        merge_maps(&mut existing, object(json!({"a": {"n": 1}, "b": 5, "d": [2, 3]})));
        assert_eq!(
            Value::Object(existing),
            json!({"a": {"n": 1}, "b": 5, "d": [2, 3]})
        );
    }

    #[test]
    fn nested_set_creates_intermediate_maps() {
        let mut root = object(json!({"scene": 1}));
        set_nested(&mut root, "scene.player.autoplay", json!(true)).unwrap();
        set_nested(&mut root, "theme", json!("dark")).unwrap();
        assert_eq!(
            Value::Object(root),
            json!({"scene": {"player": {"autoplay": true}}, "theme": "dark"})
        );
        assert!(set_nested(&mut Map::new(), "a..b", json!(1)).is_err());
    }

    #[tokio::test]
    async fn partial_merges_into_stored_blob() {
        let dir = TempDir::new().unwrap();
        let (service, _hooks) = service_in(&dir, |store| store);

        service
            .configure_ui(Some(object(json!({"a": {"y": 2}, "b": 3}))), None)
            .await
            .unwrap();
        let merged = service
            .configure_ui(None, Some(object(json!({"a": {"x": 1}}))))
            .await
            .unwrap();

        assert_eq!(Value::Object(merged), json!({"a": {"x": 1, "y": 2}, "b": 3}));
    }

    #[tokio::test]
    async fn single_setting_updates_one_path() {
        let dir = TempDir::new().unwrap();
        let (service, _hooks) = service_in(&dir, |store| store);

        service
            .configure_ui(Some(object(json!({"keep": "me"}))), None)
            .await
            .unwrap();
        let ui = service
            .configure_ui_setting("scene.autoplay", json!(false))
            .await
            .unwrap();
        assert_eq!(
            Value::Object(ui),
            json!({"keep": "me", "scene": {"autoplay": false}})
        );

        let failure = service
            .configure_ui_setting("", json!(1))
            .await
            .unwrap_err();
        assert_eq!(failure.view["keep"], json!("me"));
    }
}
