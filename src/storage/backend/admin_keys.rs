//! `admin_keys` table access for the credential authority.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, sea_query::Expr};
use tracing::debug;

use super::SeaOrmStorage;
use super::error_map::{IntegrityViolation, classify};
use crate::auth::{AdminKeyStore, KeyInsertOutcome};
use crate::errors::{Result, ShortcutError};

use migration::entities::admin_key;

#[async_trait]
impl AdminKeyStore for SeaOrmStorage {
    async fn insert_key(&self, prefix: &str, hashed_secret: &str) -> Result<KeyInsertOutcome> {
        let model = admin_key::ActiveModel {
            prefix: Set(prefix.to_string()),
            hashed_secret: Set(hashed_secret.to_string()),
            created_at: Set(Utc::now()),
            revoked_at: Set(None),
        };

        match admin_key::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(KeyInsertOutcome::Inserted),
            Err(e) if classify(&e) == IntegrityViolation::UniqueKey => {
                debug!("Admin key prefix collision: {}", prefix);
                Ok(KeyInsertOutcome::PrefixTaken)
            }
            Err(e) => Err(ShortcutError::database_operation(format!(
                "插入 admin key 失败: {}",
                e
            ))),
        }
    }

    async fn active_key_hash(&self, prefix: &str) -> Result<Option<String>> {
        let hash = admin_key::Entity::find_by_id(prefix.to_string())
            .select_only()
            .column(admin_key::Column::HashedSecret)
            .filter(admin_key::Column::RevokedAt.is_null())
            .into_tuple::<String>()
            .one(&self.db)
            .await?;
        Ok(hash)
    }

    async fn revoke_key(&self, prefix: &str) -> Result<u64> {
        let result = admin_key::Entity::update_many()
            .col_expr(admin_key::Column::RevokedAt, Expr::value(Some(Utc::now())))
            .filter(admin_key::Column::Prefix.eq(prefix))
            .filter(admin_key::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
