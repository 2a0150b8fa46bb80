//! Mutation operations for SeaOrmStorage
//!
//! This module contains the shortcut lifecycle writes: create, partial
//! update, soft delete, recovery and resolve.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::{model_to_record, new_active_model};
use super::error_map::{map_write_error, parse_id};
use super::query::{find_active_by_id, find_active_by_short};
use super::usage::record_usage_on;
use crate::context::CallContext;
use crate::errors::{Result, ShortcutError};
use crate::storage::models::{RecordPatch, ShortcutRecord, normalize_field};

use migration::entities::shortcut;

fn short_taken(short_code: &str) -> ShortcutError {
    ShortcutError::short_unavailable(format!(
        "short code '{}' is already used by an active record",
        short_code
    ))
}

impl SeaOrmStorage {
    /// Insert a new active record with a fresh id and zero usage.
    pub async fn create(&self, ctx: &CallContext, full: &str, short: &str) -> Result<ShortcutRecord> {
        let (Some(full_url), Some(short_code)) = (
            normalize_field(full.to_string()),
            normalize_field(short.to_string()),
        ) else {
            return Err(ShortcutError::invalid_record(
                "both full url and short code are required",
            ));
        };

        ctx.run("create", async {
            let id = Uuid::new_v4();
            let model = new_active_model(id, full_url, short_code.clone(), Utc::now());

            shortcut::Entity::insert(model)
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| map_write_error(e, "create", || short_taken(&short_code)))?;

            let created = shortcut::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or_else(|| {
                    ShortcutError::database_operation(format!("record {} vanished after insert", id))
                })?;

            info!("Shortcut created: {} ({})", short_code, id);
            Ok(model_to_record(created))
        })
        .await
    }

    /// Apply the supplied fields of `patch` to an active record.
    ///
    /// The row is read back in the same transaction. An empty patch is a
    /// plain lookup.
    pub async fn update(
        &self,
        ctx: &CallContext,
        id: &str,
        patch: RecordPatch,
    ) -> Result<ShortcutRecord> {
        let uuid = parse_id(id)?;
        let patch = patch.normalized();
        if patch.is_empty() {
            return self.lookup_by_id(ctx, id).await;
        }

        ctx.run("update", async {
            let txn = self.db.begin().await.map_err(|e| {
                ShortcutError::database_operation(format!("开始事务失败: {}", e))
            })?;

            let mut changes = shortcut::ActiveModel {
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            if let Some(full_url) = patch.full_url {
                changes.full_url = Set(full_url);
            }
            let conflict_code = patch.short_code.clone().unwrap_or_default();
            if let Some(short_code) = patch.short_code {
                changes.short_code = Set(short_code);
            }

            let result = shortcut::Entity::update_many()
                .set(changes)
                .filter(shortcut::Column::Id.eq(uuid))
                .filter(shortcut::Column::DeletedAt.is_null())
                .exec(&txn)
                .await
                .map_err(|e| map_write_error(e, "update", || short_taken(&conflict_code)))?;

            if result.rows_affected == 0 {
                return Err(ShortcutError::id_not_found(format!(
                    "no active record with id {}",
                    uuid
                )));
            }

            let updated = find_active_by_id(&txn, uuid).await?.ok_or_else(|| {
                ShortcutError::id_not_found(format!("no active record with id {}", uuid))
            })?;

            txn.commit().await.map_err(|e| {
                ShortcutError::database_operation(format!("提交事务失败: {}", e))
            })?;

            info!("Shortcut updated: {}", uuid);
            Ok(model_to_record(updated))
        })
        .await
    }

    /// Mark an active record deleted. Returns its id.
    pub async fn soft_delete(&self, ctx: &CallContext, id: &str) -> Result<Uuid> {
        let uuid = parse_id(id)?;
        ctx.run("soft_delete", async {
            let now = Utc::now();
            let result = shortcut::Entity::update_many()
                .col_expr(shortcut::Column::DeletedAt, Expr::value(Some(now)))
                .col_expr(shortcut::Column::UpdatedAt, Expr::value(now))
                .filter(shortcut::Column::Id.eq(uuid))
                .filter(shortcut::Column::DeletedAt.is_null())
                .exec(&self.db)
                .await
                .map_err(|e| map_write_error(e, "soft_delete", || {
                    ShortcutError::database_operation("unexpected unique violation on delete")
                }))?;

            if result.rows_affected == 0 {
                return Err(ShortcutError::id_not_found(format!(
                    "no active record with id {}",
                    uuid
                )));
            }

            info!("Shortcut soft-deleted: {}", uuid);
            Ok(uuid)
        })
        .await
    }

    /// Bring a soft-deleted record back. Fails with `ShortUnavailable` when
    /// another active record took its short code in the meantime.
    pub async fn recover(&self, ctx: &CallContext, id: &str) -> Result<Uuid> {
        let uuid = parse_id(id)?;
        ctx.run("recover", async {
            let result = shortcut::Entity::update_many()
                .col_expr(
                    shortcut::Column::DeletedAt,
                    Expr::value(Option::<DateTime<Utc>>::None),
                )
                .col_expr(shortcut::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(shortcut::Column::Id.eq(uuid))
                .filter(shortcut::Column::DeletedAt.is_not_null())
                .exec(&self.db)
                .await
                .map_err(|e| {
                    map_write_error(e, "recover", || {
                        ShortcutError::short_unavailable(format!(
                            "short code of record {} is already used by an active record",
                            uuid
                        ))
                    })
                })?;

            if result.rows_affected == 0 {
                return Err(ShortcutError::not_deleted(format!(
                    "no deleted record with id {}",
                    uuid
                )));
            }

            info!("Shortcut recovered: {}", uuid);
            Ok(uuid)
        })
        .await
    }

    /// Look up the active record for `short` and count one use of it.
    ///
    /// Increment and usage event are committed together; if either fails
    /// the resolve fails and nothing is recorded.
    pub async fn resolve(&self, ctx: &CallContext, short: &str) -> Result<String> {
        let short = short.trim().to_lowercase();
        ctx.run("resolve", async {
            let model = find_active_by_short(&self.db, &short)
                .await?
                .ok_or_else(|| {
                    ShortcutError::short_not_found(format!(
                        "no active record with short code '{}'",
                        short
                    ))
                })?;

            let txn = self.db.begin().await.map_err(|e| {
                ShortcutError::database_operation(format!("开始事务失败: {}", e))
            })?;

            // 记录在查询与计数之间被删除时按短码不存在处理
            record_usage_on(&txn, model.id).await.map_err(|e| match e {
                ShortcutError::IdNotFound(_) => ShortcutError::short_not_found(format!(
                    "record for short code '{}' was deleted during resolve",
                    short
                )),
                other => other,
            })?;

            txn.commit().await.map_err(|e| {
                ShortcutError::database_operation(format!("提交事务失败: {}", e))
            })?;

            debug!("Resolved {} -> {}", short, model.full_url);
            Ok(model.full_url)
        })
        .await
    }
}
