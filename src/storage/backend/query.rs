//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use tracing::debug;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::model_to_record;
use super::error_map::parse_id;
use crate::context::CallContext;
use crate::errors::{Result, ShortcutError};
use crate::storage::models::{PageRequest, ShortcutRecord, ShortcutStats, SortKey};

use migration::entities::shortcut;

/// SUM 聚合结果
#[derive(Debug, FromQueryResult)]
struct UsageSum {
    total_usage: Option<i64>,
}

pub(super) async fn find_active_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> std::result::Result<Option<shortcut::Model>, DbErr> {
    shortcut::Entity::find_by_id(id)
        .filter(shortcut::Column::DeletedAt.is_null())
        .one(conn)
        .await
}

pub(super) async fn find_active_by_short<C: ConnectionTrait>(
    conn: &C,
    short_code: &str,
) -> std::result::Result<Option<shortcut::Model>, DbErr> {
    shortcut::Entity::find()
        .filter(shortcut::Column::ShortCode.eq(short_code))
        .filter(shortcut::Column::DeletedAt.is_null())
        .one(conn)
        .await
}

fn sort_column(sort: SortKey) -> shortcut::Column {
    match sort {
        SortKey::Id => shortcut::Column::Id,
        SortKey::Full => shortcut::Column::FullUrl,
        SortKey::Short => shortcut::Column::ShortCode,
        SortKey::Usage => shortcut::Column::UsageCount,
        SortKey::Created => shortcut::Column::CreatedAt,
        SortKey::Updated => shortcut::Column::UpdatedAt,
    }
}

/// PostgreSQL 的 SUM(bigint) 返回 numeric，MySQL 返回 decimal，需要显式转换
fn usage_sum_sql(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Postgres => "CAST(COALESCE(SUM(usage_count), 0) AS BIGINT)",
        DatabaseBackend::MySql => "CAST(COALESCE(SUM(usage_count), 0) AS SIGNED)",
        _ => "COALESCE(SUM(usage_count), 0)",
    }
}

impl SeaOrmStorage {
    /// Active record by id.
    pub async fn lookup_by_id(&self, ctx: &CallContext, id: &str) -> Result<ShortcutRecord> {
        let uuid = parse_id(id)?;
        ctx.run("lookup_by_id", async {
            let model = find_active_by_id(&self.db, uuid).await?;
            debug!("lookup_by_id({}) found={}", uuid, model.is_some());
            model
                .map(model_to_record)
                .ok_or_else(|| ShortcutError::id_not_found(format!("no active record with id {}", uuid)))
        })
        .await
    }

    /// Active record by short code (case-insensitive).
    pub async fn lookup_by_short(&self, ctx: &CallContext, short: &str) -> Result<ShortcutRecord> {
        let short = short.trim().to_lowercase();
        ctx.run("lookup_by_short", async {
            let model = find_active_by_short(&self.db, &short).await?;
            debug!("lookup_by_short({}) found={}", short, model.is_some());
            model.map(model_to_record).ok_or_else(|| {
                ShortcutError::short_not_found(format!("no active record with short code '{}'", short))
            })
        })
        .await
    }

    /// All active records pointing at `full`, oldest first.
    pub async fn lookup_by_full(
        &self,
        ctx: &CallContext,
        full: &str,
    ) -> Result<Vec<ShortcutRecord>> {
        let full = full.trim().to_lowercase();
        ctx.run("lookup_by_full", async {
            let models = shortcut::Entity::find()
                .filter(shortcut::Column::FullUrl.eq(full.as_str()))
                .filter(shortcut::Column::DeletedAt.is_null())
                .order_by_asc(shortcut::Column::CreatedAt)
                .order_by_asc(shortcut::Column::Id)
                .all(&self.db)
                .await?;

            if models.is_empty() {
                return Err(ShortcutError::full_not_found(format!(
                    "no active record for full url '{}'",
                    full
                )));
            }
            Ok(models.into_iter().map(model_to_record).collect())
        })
        .await
    }

    /// Resolve without touching usage counters.
    pub async fn peek(&self, ctx: &CallContext, short: &str) -> Result<String> {
        self.lookup_by_short(ctx, short)
            .await
            .map(|record| record.full_url)
    }

    /// The record in whatever state it is in, soft-deleted included.
    pub async fn details(&self, ctx: &CallContext, id: &str) -> Result<ShortcutRecord> {
        let uuid = parse_id(id)?;
        ctx.run("details", async {
            shortcut::Entity::find_by_id(uuid)
                .one(&self.db)
                .await?
                .map(model_to_record)
                .ok_or_else(|| ShortcutError::id_not_found(format!("no record with id {}", uuid)))
        })
        .await
    }

    /// Number of active records.
    pub async fn count(&self, ctx: &CallContext) -> Result<u64> {
        ctx.run("count", async {
            let count = shortcut::Entity::find()
                .filter(shortcut::Column::DeletedAt.is_null())
                .count(&self.db)
                .await?;
            Ok(count)
        })
        .await
    }

    /// Sum of usage counters over active records.
    pub async fn total_usage(&self, ctx: &CallContext) -> Result<u64> {
        ctx.run("total_usage", async {
            let result = shortcut::Entity::find()
                .select_only()
                .column_as(
                    Expr::cust(usage_sum_sql(self.db.get_database_backend())),
                    "total_usage",
                )
                .filter(shortcut::Column::DeletedAt.is_null())
                .into_model::<UsageSum>()
                .one(&self.db)
                .await?;

            Ok(result
                .and_then(|sum| sum.total_usage)
                .unwrap_or(0)
                .max(0) as u64)
        })
        .await
    }

    pub async fn stats(&self, ctx: &CallContext) -> Result<ShortcutStats> {
        Ok(ShortcutStats {
            active_records: self.count(ctx).await?,
            total_usage: self.total_usage(ctx).await?,
        })
    }

    /// One page of active records, ascending by the requested key, ties by id.
    pub async fn list(&self, ctx: &CallContext, page: PageRequest) -> Result<Vec<ShortcutRecord>> {
        let page = PageRequest::new(page.sort.as_ref(), page.page, page.page_size);
        ctx.run("list", async {
            let mut query = shortcut::Entity::find()
                .filter(shortcut::Column::DeletedAt.is_null())
                .order_by_asc(sort_column(page.sort));
            if page.sort != SortKey::Id {
                query = query.order_by_asc(shortcut::Column::Id);
            }

            let models = query
                .paginate(&self.db, page.page_size)
                .fetch_page(page.page - 1)
                .await?;

            debug!(
                "list(sort={}, page={}, size={}) -> {} rows",
                page.sort.as_ref(),
                page.page,
                page.page_size,
                models.len()
            );
            Ok(models.into_iter().map(model_to_record).collect())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_sort_key_has_a_column() {
        assert_eq!(SortKey::iter().map(sort_column).count(), 6);
        assert!(matches!(sort_column(SortKey::default()), shortcut::Column::Id));
        assert!(matches!(
            sort_column(SortKey::Usage),
            shortcut::Column::UsageCount
        ));
    }

    #[test]
    fn test_usage_sum_sql_casts_per_backend() {
        assert!(usage_sum_sql(DatabaseBackend::Postgres).contains("BIGINT"));
        assert!(usage_sum_sql(DatabaseBackend::MySql).contains("SIGNED"));
        assert!(!usage_sum_sql(DatabaseBackend::Sqlite).contains("CAST"));
    }
}
