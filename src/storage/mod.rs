use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{
    ErrorLogEntry, PageRequest, RecordPatch, RecordState, ShortcutRecord, ShortcutStats, SortKey,
    UsageEvent,
};

pub struct StorageFactory;

impl StorageFactory {
    /// Connect to the configured database and run migrations.
    ///
    /// The backend is inferred from `database_url`.
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let storage = SeaOrmStorage::new(config).await?;
        Ok(Arc::new(storage))
    }
}
