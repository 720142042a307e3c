#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    AppSettingsRepository, InMemoryRepository, ProgressRepository, Storage, StorageError,
};
