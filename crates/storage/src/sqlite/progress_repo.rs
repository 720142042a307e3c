use async_trait::async_trait;

use crate::repository::{PROGRESS_KEY, ProgressRepository, StorageError};

use super::SqliteRepository;
use super::kv::{get_value, put_value};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_max_unlocked_level(&self) -> Result<Option<u32>, StorageError> {
        let Some(raw) = get_value(&self.pool, PROGRESS_KEY).await? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|err| StorageError::Serialization(format!("{PROGRESS_KEY}={raw:?}: {err}")))
    }

    async fn save_max_unlocked_level(&self, level: u32) -> Result<(), StorageError> {
        put_value(&self.pool, PROGRESS_KEY, &level.to_string()).await
    }
}
