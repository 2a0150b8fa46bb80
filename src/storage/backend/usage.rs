//! Usage tracking: the `usage_count` column and the `usage_events` log.

use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, sea_query::Expr,
};
use tracing::debug;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::model_to_usage_event;
use super::error_map::{map_write_error, parse_id};
use crate::context::CallContext;
use crate::errors::{Result, ShortcutError};
use crate::storage::models::UsageEvent;

use migration::entities::{shortcut, usage_event};

/// `usage_count = usage_count + 1` on the active row.
pub(super) async fn increment_usage_on<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<()> {
    let result = shortcut::Entity::update_many()
        .col_expr(
            shortcut::Column::UsageCount,
            Expr::col(shortcut::Column::UsageCount).add(1i64),
        )
        .filter(shortcut::Column::Id.eq(id))
        .filter(shortcut::Column::DeletedAt.is_null())
        .exec(conn)
        .await
        .map_err(|e| {
            map_write_error(e, "increment_usage", || {
                ShortcutError::database_operation("unexpected unique violation on usage increment")
            })
        })?;

    if result.rows_affected == 0 {
        return Err(ShortcutError::id_not_found(format!(
            "no active record with id {}",
            id
        )));
    }
    Ok(())
}

pub(super) async fn log_usage_on<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<()> {
    let event = usage_event::ActiveModel {
        id: NotSet,
        shortcut_id: Set(id),
        occurred_at: Set(Utc::now()),
    };

    usage_event::Entity::insert(event)
        .exec_without_returning(conn)
        .await
        .map_err(|e| {
            map_write_error(e, "log_usage", || {
                ShortcutError::database_operation("unexpected unique violation on usage log")
            })
        })?;
    Ok(())
}

/// Increment first, then log. Callers own the transaction.
pub(super) async fn record_usage_on<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<()> {
    increment_usage_on(conn, id).await?;
    log_usage_on(conn, id).await
}

impl SeaOrmStorage {
    pub async fn increment_usage(&self, ctx: &CallContext, id: &str) -> Result<()> {
        let uuid = parse_id(id)?;
        ctx.run("increment_usage", increment_usage_on(&self.db, uuid))
            .await
    }

    /// Append one usage event. A missing record surfaces as `IdNotFound`
    /// through the foreign key.
    pub async fn log_usage(&self, ctx: &CallContext, id: &str) -> Result<()> {
        let uuid = parse_id(id)?;
        ctx.run("log_usage", log_usage_on(&self.db, uuid)).await
    }

    /// Increment and log in one transaction; either both land or neither.
    pub async fn record_usage(&self, ctx: &CallContext, id: &str) -> Result<()> {
        let uuid = parse_id(id)?;
        ctx.run("record_usage", async {
            let txn = self.db.begin().await.map_err(|e| {
                ShortcutError::database_operation(format!("开始事务失败: {}", e))
            })?;

            record_usage_on(&txn, uuid).await?;

            txn.commit().await.map_err(|e| {
                ShortcutError::database_operation(format!("提交事务失败: {}", e))
            })?;
            debug!("Usage recorded for {}", uuid);
            Ok(())
        })
        .await
    }

    /// Most recent usage events of a record, newest first.
    pub async fn usage_events(
        &self,
        ctx: &CallContext,
        id: &str,
        limit: u64,
    ) -> Result<Vec<UsageEvent>> {
        let uuid = parse_id(id)?;
        ctx.run("usage_events", async {
            let models = usage_event::Entity::find()
                .filter(usage_event::Column::ShortcutId.eq(uuid))
                .order_by_desc(usage_event::Column::OccurredAt)
                .order_by_desc(usage_event::Column::Id)
                .limit(limit)
                .all(&self.db)
                .await?;
            Ok(models.into_iter().map(model_to_usage_event).collect())
        })
        .await
    }
}
