//! File repository integration tests

use blockkit_controls::PersistedBlockSettings;
use blockkit_settings::{FileSettingsRepository, PersistenceError, SettingsRepository};
use serde_json::json;
use tempfile::TempDir;

fn hero_settings() -> PersistedBlockSettings {
    serde_json::from_value(json!({
        "title": "Hero",
        "category": "layout",
        "controls": {
            "heading": { "label": "Heading", "type": "text", "default": "Welcome" },
            "columns": { "label": "Columns", "type": "range", "default": 3, "min": 1, "max": 6 }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let repo = FileSettingsRepository::new(dir.path().join("blocks"));

    assert!(repo.load("hero").await.unwrap().is_none());

    let settings = hero_settings();
    repo.save("hero", &settings).await.unwrap();
    assert!(dir.path().join("blocks").join("hero.json").exists());

    let loaded = repo.load("hero").await.unwrap().unwrap();
    assert_eq!(loaded, settings);

    // Control order survives the file.
    let keys: Vec<_> = loaded.controls.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["heading", "columns"]);
}

#[tokio::test]
async fn test_file_is_wrapped_in_envelope() {
    let dir = TempDir::new().unwrap();
    let repo = FileSettingsRepository::new(dir.path());
    repo.save("hero", &hero_settings()).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("hero.json")).unwrap())
            .unwrap();
    assert_eq!(raw["version"], json!("1.0"));
    assert!(raw["modified"].is_string());
    assert_eq!(raw["settings"]["title"], json!("Hero"));
}

#[tokio::test]
async fn test_list_blocks() {
    let dir = TempDir::new().unwrap();
    let repo = FileSettingsRepository::new(dir.path());
    assert!(repo.list().await.unwrap().is_empty());

    repo.save("zeta", &hero_settings()).await.unwrap();
    repo.save("alpha", &hero_settings()).await.unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(repo.list().await.unwrap(), vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn test_rejects_path_like_block_ids() {
    let dir = TempDir::new().unwrap();
    let repo = FileSettingsRepository::new(dir.path());
    let err = repo.save("../escape", &hero_settings()).await.unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidBlockId(_)));
}

#[tokio::test]
async fn test_unsupported_version_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("old.json"),
        r#"{ "version": "2.0", "modified": "2024-01-01T00:00:00Z", "settings": {} }"#,
    )
    .unwrap();

    let repo = FileSettingsRepository::new(dir.path());
    let err = repo.load("old").await.unwrap_err();
    assert!(matches!(err, PersistenceError::UnsupportedVersion(_)));
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let repo = FileSettingsRepository::new(dir.path());
    assert!(matches!(
        repo.load("broken").await,
        Err(PersistenceError::JsonError(_))
    ));
}
