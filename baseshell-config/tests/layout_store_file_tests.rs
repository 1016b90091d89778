//! File-backed layout persistence.

use baseshell_config::{ConfigError, JsonFileStore, LayoutConfig, LayoutStore, ShellConfig};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn layout_round_trips_through_configured_store_file() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.yaml");
    let config = ShellConfig {
        store_file: Some(dir.path().join("state").join("baseshell.config")),
        ..ShellConfig::default()
    };
    config.save_to(&settings_path).unwrap();

    let loaded = ShellConfig::load_from(&settings_path).unwrap();
    let store = LayoutStore::new(Arc::new(JsonFileStore::open(loaded.store_path()).await));

    // Fresh file: both keys are missing
    assert!(matches!(store.load().await, Err(ConfigError::Missing(_))));

    let layout = LayoutConfig {
        horizontal: [25.0, 65.0, 10.0],
        vertical: [45.0, 55.0],
    };
    store.save(&layout).await.unwrap();

    let reopened = LayoutStore::new(Arc::new(JsonFileStore::open(loaded.store_path()).await));
    assert_eq!(reopened.load().await.unwrap(), layout);
}

#[tokio::test]
async fn hand_edited_drift_is_renormalized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseshell.config");
    std::fs::write(
        &path,
        r#"{"layout.horizontal": [10.2, 80.4, 10.1], "layout.vertical": [40, 60]}"#,
    )
    .unwrap();

    let store = LayoutStore::new(Arc::new(JsonFileStore::open(&path).await));
    let layout = store.load().await.unwrap();
    let sum: f32 = layout.horizontal.iter().sum();
    assert!((sum - 100.0).abs() < 1e-3);
}

#[tokio::test]
async fn record_outside_tolerance_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseshell.config");
    std::fs::write(
        &path,
        r#"{"layout.horizontal": [10, 70, 10], "layout.vertical": [40, 60]}"#,
    )
    .unwrap();

    let store = LayoutStore::new(Arc::new(JsonFileStore::open(&path).await));
    assert!(matches!(
        store.load().await,
        Err(ConfigError::Validation(_))
    ));
}
