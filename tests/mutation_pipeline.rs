mod common;

use std::fs;

use media_config::config::loader::{open_store, LoadOptions};
use media_config::config::model::HashAlgorithm;
use media_config::config::{ConfigStore, SettingKey, SettingValue};
use media_config::error::{MutationError, ValidationError};
use media_config::mutation::{ChangeSet, GeneralInput};
use media_config::validation::validate_document;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use common::{config_path, service};

#[tokio::test]
async fn overridden_key_is_rejected_and_left_unchanged() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let options = LoadOptions {
        flag_overrides: vec!["generated=/srv/locked".to_string()],
        allow_read_only: false,
    };
    let (service, hooks) = service(open_store(&config_path(&dir), &options)?);

    let failure = service
        .configure_general(GeneralInput {
            parallel_tasks: Some(4),
            generated_path: Some(dir.path().join("elsewhere").display().to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        MutationError::OverriddenConfig {
            key: SettingKey::Generated
        }
    ));
    assert_eq!(
        failure.error.to_string(),
        "cannot set overridden value: generated"
    );
    assert_eq!(failure.view.generated_path, "/srv/locked");
    assert_eq!(failure.view.parallel_tasks, 1);
    assert!(!config_path(&dir).exists());
    assert!(hooks.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_exclusion_pattern_applies_nothing() -> anyhow::Result<()> {
    for (excludes, image_excludes) in [
        (Some(vec![r"\.part$".to_string(), "(unclosed".to_string()]), None),
        (None, Some(vec!["[z-a]".to_string()])),
    ] {
        let dir = TempDir::new()?;
        let (service, hooks) = service(ConfigStore::new(config_path(&dir)));

        let failure = service
            .configure_general(GeneralInput {
                parallel_tasks: Some(6),
                preview_audio: Some(false),
                excludes,
                image_excludes,
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            failure.error,
            MutationError::Validation(ValidationError::InvalidPattern { .. })
        ));
        assert_eq!(failure.view.parallel_tasks, 1);
        assert!(failure.view.preview_audio);
        assert!(!config_path(&dir).exists());
        assert!(hooks.calls().is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn md5_naming_requires_md5_calculation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (service, _hooks) = service(ConfigStore::new(config_path(&dir)));

    let failure = service
        .configure_general(GeneralInput {
            video_file_naming_algorithm: Some(HashAlgorithm::Md5),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        failure.error.to_string(),
        "calculateMD5 must be true if using MD5"
    );
    assert_eq!(failure.view.video_file_naming_algorithm, "OSHASH");

    let view = service
        .configure_general(GeneralInput {
            calculate_md5: Some(true),
            video_file_naming_algorithm: Some(HashAlgorithm::Md5),
            ..Default::default()
        })
        .await?;
    assert!(view.calculate_md5);
    assert_eq!(view.video_file_naming_algorithm, "MD5");
    Ok(())
}

#[tokio::test]
async fn md5_calculation_cannot_be_disabled_under_md5_naming() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (service, _hooks) = service(ConfigStore::new(config_path(&dir)));

    service
        .configure_general(GeneralInput {
            calculate_md5: Some(true),
            video_file_naming_algorithm: Some(HashAlgorithm::Md5),
            ..Default::default()
        })
        .await?;

    for algorithm in [None, Some(HashAlgorithm::Md5)] {
        let failure = tokio_test::assert_err!(
            service
                .configure_general(GeneralInput {
                    calculate_md5: Some(false),
                    video_file_naming_algorithm: algorithm,
                    ..Default::default()
                })
                .await
        );
        assert_eq!(
            failure.error.to_string(),
            "calculateMD5 must be true if using MD5"
        );
        assert!(failure.view.calculate_md5);
    }

    let view = service
        .configure_general(GeneralInput {
            calculate_md5: Some(false),
            video_file_naming_algorithm: Some(HashAlgorithm::Oshash),
            ..Default::default()
        })
        .await?;
    assert!(!view.calculate_md5);
    assert_eq!(view.video_file_naming_algorithm, "OSHASH");
    assert!(validate_document(&*service.read().await).is_valid());
    Ok(())
}

#[tokio::test]
async fn tolerated_commit_failure_returns_planned_changes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let blocker = dir.path().join("read-only");
    fs::write(&blocker, "not a directory")?;
    let store = ConfigStore::new(blocker.join("config.yml")).with_read_only_tolerance(true);
    let (service, hooks) = service(store);

    let failure = service
        .configure_general(GeneralInput {
            parallel_tasks: Some(8),
            preview_audio: Some(false),
            preview_preset: None,
            log_level: Some("Info".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    let mut expected = ChangeSet::new();
    expected.record(SettingKey::ParallelTasks, SettingValue::Int(8));
    expected.record(SettingKey::PreviewAudio, SettingValue::Bool(false));

    assert_eq!(failure.error.change_set(), Some(&expected));
    let rendered: Value = serde_json::from_str(&failure.error.to_string())?;
    assert_eq!(rendered, json!({"parallel_tasks": 8, "preview_audio": false}));
    assert_eq!(failure.view.parallel_tasks, 8);
    assert!(hooks.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn untolerated_commit_failure_is_a_hard_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let blocker = dir.path().join("read-only");
    fs::write(&blocker, "not a directory")?;
    let (service, hooks) = service(ConfigStore::new(blocker.join("config.yml")));

    let failure = tokio_test::assert_err!(
        service
            .configure_general(GeneralInput {
                parallel_tasks: Some(2),
                ..Default::default()
            })
            .await
    );

    assert!(matches!(failure.error, MutationError::Persistence(_)));
    assert!(failure.error.change_set().is_none());
    assert!(hooks.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn transcoder_change_refreshes_stream_manager() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (service, hooks) = service(ConfigStore::new(config_path(&dir)));

    service
        .configure_general(GeneralInput {
            ffprobe_path: Some("/opt/ffmpeg/bin/ffprobe".to_string()),
            ..Default::default()
        })
        .await?;

    assert_eq!(hooks.calls(), vec!["config", "transcoder", "stream_manager"]);
    Ok(())
}

#[tokio::test]
async fn ui_partial_merges_recursively() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (service, _hooks) = service(ConfigStore::new(config_path(&dir)));

    let existing: Map<String, Value> = serde_json::from_value(json!({"a": {"y": 2}, "b": 3}))?;
    let partial: Map<String, Value> = serde_json::from_value(json!({"a": {"x": 1}}))?;
    service.configure_ui(Some(existing), None).await?;
    let merged = service.configure_ui(None, Some(partial)).await?;

    assert_eq!(Value::Object(merged), json!({"a": {"x": 1, "y": 2}, "b": 3}));
    Ok(())
}

#[tokio::test]
async fn api_key_without_username_is_empty() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (service, _hooks) = service(ConfigStore::new(config_path(&dir)));

    let key = tokio_test::assert_ok!(service.generate_api_key(false).await);
    assert_eq!(key, "");
    assert_eq!(service.general_view().await.api_key, "");
    Ok(())
}

#[tokio::test]
async fn concurrent_mutations_are_serialized() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let (service, _hooks) = service(ConfigStore::new(config_path(&dir)));

    let (general, dlna) = tokio::join!(
        service.configure_general(GeneralInput {
            parallel_tasks: Some(3),
            ..Default::default()
        }),
        service.configure_dlna(media_config::mutation::DlnaInput {
            port: Some(8200),
            ..Default::default()
        }),
    );
    general?;
    dlna?;

    let reopened = open_store(&config_path(&dir), &LoadOptions::default())?;
    assert_eq!(reopened.get_int(SettingKey::ParallelTasks), 3);
    assert_eq!(reopened.get_int(SettingKey::DlnaPort), 8200);
    Ok(())
}
