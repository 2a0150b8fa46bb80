use std::fmt;

/// Coarse error classes handed to callers outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    NotFound,
    Unauthorized,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    InvalidRecord(String),
    InvalidId(String),
    ShortUnavailable(String),
    IdNotFound(String),
    ShortNotFound(String),
    FullNotFound(String),
    NotDeleted(String),
    PrefixNotFound(String),
    Unauthorized(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Hashing(String),
    Cancelled(String),
    DeadlineExceeded(String),
}

impl ShortcutError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortcutError::InvalidRecord(_) => "E001",
            ShortcutError::InvalidId(_) => "E002",
            ShortcutError::ShortUnavailable(_) => "E003",
            ShortcutError::IdNotFound(_) => "E004",
            ShortcutError::ShortNotFound(_) => "E005",
            ShortcutError::FullNotFound(_) => "E006",
            ShortcutError::NotDeleted(_) => "E007",
            ShortcutError::PrefixNotFound(_) => "E008",
            ShortcutError::Unauthorized(_) => "E009",
            ShortcutError::DatabaseConfig(_) => "E010",
            ShortcutError::DatabaseConnection(_) => "E011",
            ShortcutError::DatabaseOperation(_) => "E012",
            ShortcutError::Hashing(_) => "E013",
            ShortcutError::Cancelled(_) => "E014",
            ShortcutError::DeadlineExceeded(_) => "E015",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortcutError::InvalidRecord(_) => "Invalid Record",
            ShortcutError::InvalidId(_) => "Invalid ID",
            ShortcutError::ShortUnavailable(_) => "Short Code Unavailable",
            ShortcutError::IdNotFound(_) => "ID Not Found",
            ShortcutError::ShortNotFound(_) => "Short Code Not Found",
            ShortcutError::FullNotFound(_) => "Full URL Not Found",
            ShortcutError::NotDeleted(_) => "Record Not Deleted",
            ShortcutError::PrefixNotFound(_) => "Admin Key Prefix Not Found",
            ShortcutError::Unauthorized(_) => "Unauthorized",
            ShortcutError::DatabaseConfig(_) => "Database Configuration Error",
            ShortcutError::DatabaseConnection(_) => "Database Connection Error",
            ShortcutError::DatabaseOperation(_) => "Database Operation Error",
            ShortcutError::Hashing(_) => "Hashing Error",
            ShortcutError::Cancelled(_) => "Operation Cancelled",
            ShortcutError::DeadlineExceeded(_) => "Deadline Exceeded",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortcutError::InvalidRecord(msg)
            | ShortcutError::InvalidId(msg)
            | ShortcutError::ShortUnavailable(msg)
            | ShortcutError::IdNotFound(msg)
            | ShortcutError::ShortNotFound(msg)
            | ShortcutError::FullNotFound(msg)
            | ShortcutError::NotDeleted(msg)
            | ShortcutError::PrefixNotFound(msg)
            | ShortcutError::Unauthorized(msg)
            | ShortcutError::DatabaseConfig(msg)
            | ShortcutError::DatabaseConnection(msg)
            | ShortcutError::DatabaseOperation(msg)
            | ShortcutError::Hashing(msg)
            | ShortcutError::Cancelled(msg)
            | ShortcutError::DeadlineExceeded(msg) => msg,
        }
    }

    /// The class a caller maps to a user-facing response.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShortcutError::InvalidRecord(_) | ShortcutError::InvalidId(_) => {
                ErrorKind::InvalidInput
            }
            ShortcutError::ShortUnavailable(_) => ErrorKind::Conflict,
            ShortcutError::IdNotFound(_)
            | ShortcutError::ShortNotFound(_)
            | ShortcutError::FullNotFound(_)
            | ShortcutError::NotDeleted(_)
            | ShortcutError::PrefixNotFound(_) => ErrorKind::NotFound,
            ShortcutError::Unauthorized(_) => ErrorKind::Unauthorized,
            ShortcutError::DatabaseConfig(_)
            | ShortcutError::DatabaseConnection(_)
            | ShortcutError::DatabaseOperation(_)
            | ShortcutError::Hashing(_)
            | ShortcutError::Cancelled(_)
            | ShortcutError::DeadlineExceeded(_) => ErrorKind::Internal,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    /// 格式化为彩色输出（用于 CLI 错误提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortcutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortcutError {}

// 便捷的构造函数
impl ShortcutError {
    pub fn invalid_record<T: Into<String>>(msg: T) -> Self {
        ShortcutError::InvalidRecord(msg.into())
    }

    pub fn invalid_id<T: Into<String>>(msg: T) -> Self {
        ShortcutError::InvalidId(msg.into())
    }

    pub fn short_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortcutError::ShortUnavailable(msg.into())
    }

    pub fn id_not_found<T: Into<String>>(msg: T) -> Self {
        ShortcutError::IdNotFound(msg.into())
    }

    pub fn short_not_found<T: Into<String>>(msg: T) -> Self {
        ShortcutError::ShortNotFound(msg.into())
    }

    pub fn full_not_found<T: Into<String>>(msg: T) -> Self {
        ShortcutError::FullNotFound(msg.into())
    }

    pub fn not_deleted<T: Into<String>>(msg: T) -> Self {
        ShortcutError::NotDeleted(msg.into())
    }

    pub fn prefix_not_found<T: Into<String>>(msg: T) -> Self {
        ShortcutError::PrefixNotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        ShortcutError::Unauthorized(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortcutError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortcutError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortcutError::DatabaseOperation(msg.into())
    }

    pub fn hashing<T: Into<String>>(msg: T) -> Self {
        ShortcutError::Hashing(msg.into())
    }

    pub fn cancelled<T: Into<String>>(msg: T) -> Self {
        ShortcutError::Cancelled(msg.into())
    }

    pub fn deadline_exceeded<T: Into<String>>(msg: T) -> Self {
        ShortcutError::DeadlineExceeded(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShortcutError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortcutError::DatabaseOperation(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for ShortcutError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        ShortcutError::Hashing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortcutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ShortcutError::invalid_record("x").kind(), ErrorKind::InvalidInput);
        assert_eq!(ShortcutError::invalid_id("x").kind(), ErrorKind::InvalidInput);
        assert_eq!(ShortcutError::short_unavailable("x").kind(), ErrorKind::Conflict);
        assert_eq!(ShortcutError::not_deleted("x").kind(), ErrorKind::NotFound);
        assert_eq!(ShortcutError::prefix_not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(ShortcutError::unauthorized("x").kind(), ErrorKind::Unauthorized);
        assert_eq!(ShortcutError::deadline_exceeded("x").kind(), ErrorKind::Internal);
        assert!(ShortcutError::hashing("x").is_internal());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = ShortcutError::short_not_found("no such short code: ex1");
        assert_eq!(err.to_string(), "Short Code Not Found: no such short code: ex1");
        assert_eq!(err.message(), "no such short code: ex1");
    }

    #[test]
    fn test_codes_are_unique() {
        let all = [
            ShortcutError::invalid_record(""),
            ShortcutError::invalid_id(""),
            ShortcutError::short_unavailable(""),
            ShortcutError::id_not_found(""),
            ShortcutError::short_not_found(""),
            ShortcutError::full_not_found(""),
            ShortcutError::not_deleted(""),
            ShortcutError::prefix_not_found(""),
            ShortcutError::unauthorized(""),
            ShortcutError::database_config(""),
            ShortcutError::database_connection(""),
            ShortcutError::database_operation(""),
            ShortcutError::hashing(""),
            ShortcutError::cancelled(""),
            ShortcutError::deadline_exceeded(""),
        ];
        let codes: std::collections::HashSet<_> = all.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_from_db_err_is_internal() {
        let err: ShortcutError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, ShortcutError::DatabaseOperation(_)));
        assert!(err.is_internal());
    }
}
