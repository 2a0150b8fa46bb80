//! Persistent error log, the last-resort sink for internal failures.

use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    EntityTrait, QueryOrder, QuerySelect,
};
use tracing::error;

use super::SeaOrmStorage;
use super::converters::model_to_error_log;
use crate::context::CallContext;
use crate::errors::{Result, ShortcutError};
use crate::storage::models::ErrorLogEntry;

use migration::entities::error_log;

impl SeaOrmStorage {
    /// Store `err` in `error_logs`. Failures here are only traced.
    pub async fn log_error(&self, ctx: &CallContext, err: &ShortcutError) {
        let entry = error_log::ActiveModel {
            id: NotSet,
            message: Set(err.format_simple()),
            logged_at: Set(Utc::now()),
        };

        let result = ctx
            .run("log_error", async {
                error_log::Entity::insert(entry)
                    .exec_without_returning(&self.db)
                    .await?;
                Ok(())
            })
            .await;

        if let Err(e) = result {
            error!("无法写入错误日志: {} (original error: {})", e, err);
        }
    }

    pub async fn recent_errors(&self, ctx: &CallContext, limit: u64) -> Result<Vec<ErrorLogEntry>> {
        ctx.run("recent_errors", async {
            let models = error_log::Entity::find()
                .order_by_desc(error_log::Column::LoggedAt)
                .order_by_desc(error_log::Column::Id)
                .limit(limit)
                .all(&self.db)
                .await?;
            Ok(models.into_iter().map(model_to_error_log).collect())
        })
        .await
    }
}
