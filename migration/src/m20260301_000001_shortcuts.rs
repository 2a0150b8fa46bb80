//! 短链接记录表迁移
//!
//! 创建 shortcuts 表，以及“活跃记录中 short_code 唯一”的约束：
//! - PostgreSQL / SQLite: 部分唯一索引 (WHERE deleted_at IS NULL)
//! - MySQL: 不支持部分索引，使用 STORED 生成列 + 唯一索引（NULL 不参与唯一性比较）

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shortcuts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shortcuts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Shortcuts::FullUrl).text().not_null())
                    .col(
                        ColumnDef::new(Shortcuts::ShortCode)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shortcuts::UsageCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Shortcuts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shortcuts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shortcuts::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        let conn = manager.get_connection();
        match manager.get_database_backend() {
            DatabaseBackend::MySql => {
                conn.execute_unprepared(
                    "ALTER TABLE shortcuts ADD COLUMN active_short_code VARCHAR(255) \
                     AS (IF(deleted_at IS NULL, short_code, NULL)) STORED",
                )
                .await?;
                conn.execute_unprepared(
                    "CREATE UNIQUE INDEX idx_shortcuts_active_short ON shortcuts (active_short_code)",
                )
                .await?;
            }
            _ => {
                conn.execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_shortcuts_active_short \
                     ON shortcuts (short_code) WHERE deleted_at IS NULL",
                )
                .await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_shortcuts_active_short")
                    .table(Shortcuts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Shortcuts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Shortcuts {
    #[sea_orm(iden = "shortcuts")]
    Table,
    Id,
    FullUrl,
    ShortCode,
    UsageCount,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
