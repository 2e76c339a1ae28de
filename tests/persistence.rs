mod common;

use std::collections::BTreeMap;
use std::fs;

use media_config::config::loader::{env_overrides, open_store, LoadOptions};
use media_config::config::model::StashPath;
use media_config::config::{ConfigStore, SettingKey};
use media_config::error::MutationError;
use media_config::mutation::{GeneralInput, InterfaceInput};
use media_config::validation::validate_document;
use serde_json::Value;
use tempfile::TempDir;

use common::{config_path, service};

#[tokio::test]
async fn committed_document_reloads_with_side_files() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let library = dir.path().join("library");
    fs::create_dir(&library)?;
    let (service, _hooks) = service(ConfigStore::new(config_path(&dir)));

    service
        .configure_general(GeneralInput {
            stashes: Some(vec![StashPath {
                path: library.clone(),
                exclude_video: false,
                exclude_image: true,
            }]),
            database_path: Some(dir.path().join("media.sqlite").display().to_string()),
            excludes: Some(vec![r"sample\.mkv$".to_string()]),
            ..Default::default()
        })
        .await?;
    service
        .configure_interface(InterfaceInput {
            javascript: Some("console.log('ready');".to_string()),
            javascript_enabled: Some(true),
            ..Default::default()
        })
        .await?;

    let yaml = fs::read_to_string(config_path(&dir))?;
    let document: BTreeMap<String, Value> = serde_yaml::from_str(&yaml)?;
    assert_eq!(document["stash"][0]["excludeimage"], Value::Bool(true));
    assert!(!document.contains_key("javascript"));
    assert!(!dir.path().join(".config.yml.tmp").exists());

    let reopened = open_store(&config_path(&dir), &LoadOptions::default())?;
    assert_eq!(reopened.get_stash_paths()[0].path, library);
    assert_eq!(reopened.get_string_list(SettingKey::Exclude), vec![r"sample\.mkv$"]);
    assert_eq!(
        reopened.get_string(SettingKey::Javascript),
        "console.log('ready');"
    );
    assert!(validate_document(&reopened).is_valid());
    Ok(())
}

#[tokio::test]
async fn known_library_paths_are_trusted_after_removal() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let library = dir.path().join("library");
    fs::create_dir(&library)?;
    let (service, _hooks) = service(ConfigStore::new(config_path(&dir)));

    let stash = |path: &std::path::Path| StashPath {
        path: path.to_path_buf(),
        exclude_video: false,
        exclude_image: false,
    };

    service
        .configure_general(GeneralInput {
            stashes: Some(vec![stash(&library)]),
            ..Default::default()
        })
        .await?;
    fs::remove_dir(&library)?;

    let missing = dir.path().join("missing");
    let failure = service
        .configure_general(GeneralInput {
            stashes: Some(vec![stash(&library), stash(&missing)]),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(failure.error, MutationError::Validation(_)));
    assert_eq!(failure.view.stashes, vec![stash(&library)]);

    let view = service
        .configure_general(GeneralInput {
            stashes: Some(vec![stash(&library)]),
            parallel_tasks: Some(2),
            ..Default::default()
        })
        .await?;
    assert_eq!(view.parallel_tasks, 2);
    Ok(())
}

#[test]
fn environment_overrides_map_dotted_keys() {
    let vars = vec![
        ("MEDIA_DLNA_PORT".to_string(), "9000".to_string()),
        ("MEDIA_FFMPEG_HARDWARE_ACCELERATION".to_string(), "true".to_string()),
        ("PATH".to_string(), "/usr/bin".to_string()),
    ];

    let overrides = env_overrides(vars);
    let keys: Vec<SettingKey> = overrides.iter().map(|(key, _)| *key).collect();
    assert!(keys.contains(&SettingKey::DlnaPort));
    assert!(keys.contains(&SettingKey::TranscodeHardwareAcceleration));
    assert_eq!(keys.len(), 2);
}
