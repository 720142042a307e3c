use std::sync::Arc;

use dizai_core::model::{AppSettings, AppSettingsDraft};
use storage::repository::AppSettingsRepository;

use crate::error::AppSettingsServiceError;

#[derive(Clone)]
pub struct AppSettingsService {
    repo: Arc<dyn AppSettingsRepository>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings, falling back to defaults when nothing is
    /// stored or the stored blob is unreadable.
    pub async fn load(&self) -> AppSettings {
        match self.repo.get_settings().await {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load settings; using defaults");
                AppSettings::default()
            }
        }
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if validation fails or persistence fails.
    pub async fn save(
        &self,
        draft: AppSettingsDraft,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = draft.validate()?;
        self.repo.save_settings(&settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dizai_core::model::{AppSettingsError, Theme};
    use storage::repository::{InMemoryRepository, StorageError};

    struct Broken;

    #[async_trait]
    impl AppSettingsRepository for Broken {
        async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
            Err(StorageError::Serialization("bad json".into()))
        }

        async fn save_settings(&self, _settings: &AppSettings) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn load_defaults_when_empty() {
        let service = AppSettingsService::new(Arc::new(InMemoryRepository::new()));
        assert_eq!(service.load().await, AppSettings::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let service = AppSettingsService::new(Arc::new(InMemoryRepository::new()));
        let mut draft = AppSettingsDraft::new();
        draft.theme = Theme::Dark;
        draft.volume = 0.0;
        let saved = service.save(draft).await.unwrap();
        assert!(saved.is_muted());
        assert_eq!(service.load().await, saved);
    }

    #[tokio::test]
    async fn invalid_draft_is_not_persisted() {
        let repo = InMemoryRepository::new();
        let service = AppSettingsService::new(Arc::new(repo.clone()));
        let mut draft = AppSettingsDraft::new();
        draft.speech_rate = 3.0;
        let err = service.save(draft).await.unwrap_err();
        assert!(matches!(
            err,
            AppSettingsServiceError::Validation(AppSettingsError::InvalidSpeechRate(_))
        ));
        assert_eq!(repo.get_settings().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unreadable_settings_fall_back_to_defaults() {
        let service = AppSettingsService::new(Arc::new(Broken));
        assert_eq!(service.load().await, AppSettings::default());
        assert!(matches!(
            service.save(AppSettingsDraft::new()).await,
            Err(AppSettingsServiceError::Storage(_))
        ));
    }
}
