//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod admin_keys;
mod connection;
mod converters;
mod error_log;
pub mod error_map;
mod mutations;
mod query;
mod usage;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{Result, ShortcutError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, new_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ShortcutError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        "postgresql" => "postgres".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based storage backend
///
/// Cloning is cheap: the connection pool is shared.
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    /// Connect, run pending migrations and return the ready store.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url.trim();
        if database_url.is_empty() {
            return Err(ShortcutError::database_config(
                "database_url 未设置".to_string(),
            ));
        }

        let backend_name = normalize_backend_name(&infer_backend_from_url(database_url)?);

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config.pool_size).await?
        } else {
            // mariadb:// 需要改写为 sqlx 能识别的 mysql://
            let url = match database_url.strip_prefix("mariadb://") {
                Some(rest) => format!("mysql://{}", rest),
                None => database_url.to_string(),
            };
            connect_generic(&url, &backend_name, config.pool_size).await?
        };

        let storage = SeaOrmStorage { db, backend_name };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（迁移命令等需要直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("shortcuts.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("sqlite://data/x.db?mode=rwc").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("sqlite::memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mysql://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgresql://u@h/db").unwrap(), "postgres");
    }

    #[test]
    fn test_infer_backend_from_url_unknown() {
        let err = infer_backend_from_url("redis://localhost").unwrap_err();
        assert!(matches!(err, ShortcutError::DatabaseConfig(_)));
    }

    #[test]
    fn test_normalize_backend_name() {
        assert_eq!(normalize_backend_name("mariadb"), "mysql");
        assert_eq!(normalize_backend_name("postgresql"), "postgres");
        assert_eq!(normalize_backend_name("sqlite"), "sqlite");
    }
}
