use serde::{Deserialize, Serialize};

use crate::utils::password::HashParams;

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
///
/// - database: 数据库连接配置
/// - credentials: admin key / 管理员密码的哈希参数与应用级盐值
/// - admin: 引导管理员身份（用户名 + Argon2 哈希）
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub admin: AdminCredential,
    #[serde(default)]
    pub logging: LoggingConfig,
}

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const ENV_PREFIX: &str = "URL_SHORTENER";

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：URL_SHORTENER，分隔符：__
    /// 示例：URL_SHORTENER__DATABASE__DATABASE_URL=postgres://...
    pub fn load(path: &str) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &str) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File};

        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<StaticConfig>()
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// Default per-call deadline in seconds
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
}

/// 哈希参数与应用级静态盐值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_static_salt")]
    pub salt: String,
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl CredentialsConfig {
    pub fn hash_params(&self) -> HashParams {
        HashParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

/// The single bootstrap administrator allowed to issue and revoke admin keys.
///
/// `password_hash` is an Argon2 PHC string of `password + credentials.salt`;
/// generate one with `url-shortener hash-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredential {
    #[serde(default = "default_admin_username")]
    pub username: String,
    #[serde(default)]
    pub password_hash: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_database_url() -> String {
    "shortcuts.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_static_salt() -> String {
    "@salt".to_string()
}

fn default_memory_kib() -> u32 {
    HashParams::default().memory_kib
}

fn default_iterations() -> u32 {
    HashParams::default().iterations
}

fn default_parallelism() -> u32 {
    HashParams::default().parallelism
}

fn default_admin_username() -> String {
    "urlshorteneradmin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            salt: default_static_salt(),
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl Default for AdminCredential {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password_hash: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.database.database_url, "shortcuts.db");
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.credentials.salt, "@salt");
        assert_eq!(config.credentials.hash_params(), HashParams::default());
        assert_eq!(config.admin.username, "urlshorteneradmin");
        assert!(config.admin.password_hash.is_empty());
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[database]"));
        assert!(sample.contains("[credentials]"));

        let parsed: StaticConfig = toml::from_str(&sample).expect("sample should parse");
        assert_eq!(parsed.admin.username, "urlshorteneradmin");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = StaticConfig::try_load("definitely-not-here.toml").expect("load should succeed");
        assert_eq!(config.database.timeout, 30);
    }
}
