//! 存储引擎错误翻译
//!
//! 所有对数据库引擎错误码（SQLSTATE / MySQL / SQLite 扩展码）的判断都集中在这里，
//! 业务代码只看到 [`IntegrityViolation`] 和 [`ShortcutError`]。

use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

use crate::errors::{Result, ShortcutError};

/// Engine-neutral classification of a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityViolation {
    UniqueKey,
    ForeignKey,
    MalformedIdentifier,
    Other,
}

pub fn classify(err: &DbErr) -> IntegrityViolation {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => return IntegrityViolation::UniqueKey,
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => return IntegrityViolation::ForeignKey,
        _ => {}
    }

    match err {
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => classify_runtime_error(runtime_err),
        _ => IntegrityViolation::Other,
    }
}

fn classify_runtime_error(err: &sea_orm::error::RuntimeErr) -> IntegrityViolation {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(db_err) = sqlx_err.deref().as_database_error()
                && let Some(code) = db_err.code()
            {
                let classified = classify_code(code.as_ref());
                if classified != IntegrityViolation::Other {
                    return classified;
                }
            }
            // 回退到字符串匹配
            classify_message(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => classify_message(msg),
        #[allow(unreachable_patterns)]
        _ => IntegrityViolation::Other,
    }
}

fn classify_code(code: &str) -> IntegrityViolation {
    match code {
        // PostgreSQL unique_violation / MySQL ER_DUP_ENTRY / SQLite UNIQUE + PRIMARYKEY
        "23505" | "1062" | "2067" | "1555" => IntegrityViolation::UniqueKey,
        // PostgreSQL foreign_key_violation / MySQL ER_NO_REFERENCED_ROW_2 / SQLite FOREIGNKEY
        "23503" | "1452" | "787" => IntegrityViolation::ForeignKey,
        // PostgreSQL invalid_text_representation (malformed uuid)
        "22P02" => IntegrityViolation::MalformedIdentifier,
        _ => IntegrityViolation::Other,
    }
}

fn classify_message(msg: &str) -> IntegrityViolation {
    let msg = msg.to_lowercase();
    if msg.contains("unique constraint")
        || msg.contains("duplicate key")
        || msg.contains("duplicate entry")
    {
        IntegrityViolation::UniqueKey
    } else if msg.contains("foreign key constraint") {
        IntegrityViolation::ForeignKey
    } else if msg.contains("invalid input syntax for type uuid") {
        IntegrityViolation::MalformedIdentifier
    } else {
        IntegrityViolation::Other
    }
}

/// Translate a failed write into the domain taxonomy.
///
/// `on_conflict` builds the error for a unique-key violation, which differs
/// per call site (`ShortUnavailable` for shortcuts).
pub fn map_write_error<F>(err: DbErr, operation: &str, on_conflict: F) -> ShortcutError
where
    F: FnOnce() -> ShortcutError,
{
    match classify(&err) {
        IntegrityViolation::UniqueKey => on_conflict(),
        IntegrityViolation::MalformedIdentifier => {
            ShortcutError::invalid_id(format!("{}: given id has invalid format", operation))
        }
        IntegrityViolation::ForeignKey => {
            ShortcutError::id_not_found(format!("{}: referenced record does not exist", operation))
        }
        IntegrityViolation::Other => {
            ShortcutError::database_operation(format!("{} failed: {}", operation, err))
        }
    }
}

/// Identifier format check, done before any statement is issued.
pub fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(&id.trim().to_lowercase())
        .map_err(|_| ShortcutError::invalid_id(format!("given id has invalid format: '{}'", id)))
}
