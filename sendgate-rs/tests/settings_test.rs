//! Integration tests for user settings

use sendgate_rs::settings::{AccountStatus, ApplicationMode, SettingsManager};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    SettingsManager::new(pool.clone()).init_db().await.unwrap();
    pool
}

#[tokio::test]
async fn test_settings_persist_across_manager_instances() {
    let pool = setup_test_db().await;

    SettingsManager::new(pool.clone())
        .set_account_status("user-1", "paused")
        .await
        .unwrap();

    let reread = SettingsManager::new(pool)
        .get_settings("user-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.account_status, AccountStatus::Paused);
}

#[tokio::test]
async fn test_unknown_user_resolves_to_defaults() {
    let pool = setup_test_db().await;
    let manager = SettingsManager::new(pool);

    let settings = manager.resolve_or_default("nobody").await.unwrap();
    assert_eq!(settings.application_mode, ApplicationMode::Manual);
    assert_eq!(settings.account_status, AccountStatus::Active);
    assert!(settings.is_active());
}

#[tokio::test]
async fn test_mode_and_status_update_independently() {
    let pool = setup_test_db().await;
    let manager = SettingsManager::new(pool);

    manager.set_application_mode("user-1", "AUTO").await.unwrap();
    manager.set_account_status("user-1", "paused").await.unwrap();

    let settings = manager.get_settings("user-1").await.unwrap().unwrap();
    assert_eq!(settings.application_mode, ApplicationMode::Auto);
    assert_eq!(settings.account_status, AccountStatus::Paused);

    manager.set_application_mode("user-1", "MANUAL").await.unwrap();

    let settings = manager.get_settings("user-1").await.unwrap().unwrap();
    assert_eq!(settings.application_mode, ApplicationMode::Manual);
    assert_eq!(settings.account_status, AccountStatus::Paused);
}

#[tokio::test]
async fn test_invalid_values_rejected_without_mutation() {
    let pool = setup_test_db().await;
    let manager = SettingsManager::new(pool);

    for bad in ["deleted", "ACTIVE", "Paused", ""] {
        assert!(manager.set_account_status("user-1", bad).await.is_err());
    }
    for bad in ["manual", "Auto", "off", ""] {
        assert!(manager.set_application_mode("user-1", bad).await.is_err());
    }

    // Nothing was written
    assert!(manager.get_settings("user-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_updated_at_advances_on_change() {
    let pool = setup_test_db().await;
    let manager = SettingsManager::new(pool);

    let first = manager.set_account_status("user-1", "paused").await.unwrap();
    let second = manager.set_account_status("user-1", "active").await.unwrap();

    assert_eq!(first.created_at, second.created_at);
    assert!(second.updated_at >= first.updated_at);
}
