use async_trait::async_trait;

use crate::repository::{AppSettingsRepository, SETTINGS_KEY, StorageError};
use dizai_core::model::{AppSettings, AppSettingsDraft};

use super::SqliteRepository;
use super::kv::{get_value, put_value};

#[async_trait]
impl AppSettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let Some(raw) = get_value(&self.pool, SETTINGS_KEY).await? else {
            return Ok(None);
        };

        let draft: AppSettingsDraft = serde_json::from_str(&raw)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        draft
            .validate()
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let raw = serde_json::to_string(settings)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        put_value(&self.pool, SETTINGS_KEY, &raw).await
    }
}
