use dizai_core::model::{AppSettingsDraft, FontSize, Theme};
use storage::repository::{AppSettingsRepository, ProgressRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_progress_round_trips_and_overwrites() {
    let repo = connect("memdb_progress").await;
    assert_eq!(repo.load_max_unlocked_level().await.unwrap(), None);

    repo.save_max_unlocked_level(2).await.unwrap();
    repo.save_max_unlocked_level(4).await.unwrap();
    assert_eq!(repo.load_max_unlocked_level().await.unwrap(), Some(4));
}

#[tokio::test]
async fn sqlite_settings_round_trip() {
    let repo = connect("memdb_settings").await;
    assert!(repo.get_settings().await.unwrap().is_none());

    let mut draft = AppSettingsDraft::new();
    draft.theme = Theme::Contrast;
    draft.font_size = FontSize::Large;
    draft.speech_rate = 1.5;
    let settings = draft.validate().unwrap();

    repo.save_settings(&settings).await.unwrap();
    let fetched = repo.get_settings().await.unwrap().expect("settings stored");
    assert_eq!(fetched, settings);
}

#[tokio::test]
async fn sqlite_partial_settings_blob_uses_defaults() {
    let repo = connect("memdb_partial_settings").await;
    sqlx::query("INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, '')")
        .bind("dizai_settings")
        .bind(r#"{"theme":"dark"}"#)
        .execute(repo.pool())
        .await
        .unwrap();

    let fetched = repo.get_settings().await.unwrap().expect("settings stored");
    assert_eq!(fetched.theme(), Theme::Dark);
    assert!((fetched.volume() - 1.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn sqlite_garbage_progress_is_a_serialization_error() {
    let repo = connect("memdb_garbage_progress").await;
    sqlx::query("INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, '')")
        .bind("dizai_level_progress")
        .bind("três")
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.load_max_unlocked_level().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
    repo.save_max_unlocked_level(1).await.unwrap();
    assert_eq!(repo.load_max_unlocked_level().await.unwrap(), Some(1));
}
