use async_trait::async_trait;
use dizai_core::model::AppSettings;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the highest unlocked level is stored.
pub const PROGRESS_KEY: &str = "dizai_level_progress";
/// Key under which the settings JSON blob is stored.
pub const SETTINGS_KEY: &str = "dizai_settings";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence of the learner's highest unlocked level.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the stored value, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be read or parsed.
    async fn load_max_unlocked_level(&self) -> Result<Option<u32>, StorageError>;

    /// Overwrite the stored value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn save_max_unlocked_level(&self, level: u32) -> Result<(), StorageError>;
}

#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// Fetch persisted settings, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be read or fails validation.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// Persist settings, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<Option<u32>>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_max_unlocked_level(&self) -> Result<Option<u32>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_max_unlocked_level(&self, level: u32) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(level);
        Ok(())
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub app_settings: Arc<dyn AppSettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let app_settings: Arc<dyn AppSettingsRepository> = Arc::new(repo);
        Self {
            progress,
            app_settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dizai_core::model::{AppSettingsDraft, Theme};

    #[tokio::test]
    async fn progress_starts_empty_and_round_trips() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.load_max_unlocked_level().await.unwrap(), None);

        repo.save_max_unlocked_level(3).await.unwrap();
        assert_eq!(repo.load_max_unlocked_level().await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let storage = Storage::in_memory();
        let mut draft = AppSettingsDraft::new();
        draft.theme = Theme::Dark;
        let settings = draft.validate().unwrap();

        storage.app_settings.save_settings(&settings).await.unwrap();
        let fetched = storage.app_settings.get_settings().await.unwrap();
        assert_eq!(fetched, Some(settings));
    }
}
