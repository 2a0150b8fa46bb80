//! 使用记录表 + 错误日志表迁移

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_shortcuts::Shortcuts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsageEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UsageEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UsageEvents::ShortcutId).uuid().not_null())
                    .col(
                        ColumnDef::new(UsageEvents::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usage_events_shortcut")
                            .from(UsageEvents::Table, UsageEvents::ShortcutId)
                            .to(Shortcuts::Table, Shortcuts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 单条记录的时间序列查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_usage_events_shortcut_time")
                    .table(UsageEvents::Table)
                    .col(UsageEvents::ShortcutId)
                    .col(UsageEvents::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ErrorLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ErrorLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ErrorLogs::Message).text().not_null())
                    .col(
                        ColumnDef::new(ErrorLogs::LoggedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ErrorLogs::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_usage_events_shortcut_time")
                    .table(UsageEvents::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UsageEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UsageEvents {
    #[sea_orm(iden = "usage_events")]
    Table,
    Id,
    ShortcutId,
    OccurredAt,
}

#[derive(DeriveIden)]
enum ErrorLogs {
    #[sea_orm(iden = "error_logs")]
    Table,
    Id,
    Message,
    LoggedAt,
}
