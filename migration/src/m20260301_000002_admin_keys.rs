use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // prefix 为主键：已吊销的 prefix 仍然占位，永不复用
        manager
            .create_table(
                Table::create()
                    .table(AdminKeys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminKeys::Prefix)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminKeys::HashedSecret).text().not_null())
                    .col(
                        ColumnDef::new(AdminKeys::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminKeys::RevokedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminKeys::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AdminKeys {
    #[sea_orm(iden = "admin_keys")]
    Table,
    Prefix,
    HashedSecret,
    CreatedAt,
    RevokedAt,
}
