//! CLI interface module
//!
//! This module provides the operator command implementations.

pub mod commands;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::CredentialAuthority;
use crate::cli::{Commands, KeyCommands};
use crate::config::StaticConfig;
use crate::context::CallContext;
use crate::errors::ShortcutError;
use crate::storage::{SeaOrmStorage, StorageFactory};
use crate::utils::password::is_argon2_hash;
use tracing::warn;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    InputError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::InputError(msg) => format!("Input error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::InputError(msg) => {
                format!("{} {}", "Input error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShortcutError> for CliError {
    fn from(err: ShortcutError) -> Self {
        if err.is_internal() {
            CliError::StorageError(err.to_string())
        } else {
            CliError::CommandError(err.to_string())
        }
    }
}

/// Shared state for commands that talk to the database.
pub struct CommandEnv {
    pub config: Arc<StaticConfig>,
    pub storage: Arc<SeaOrmStorage>,
}

impl CommandEnv {
    async fn connect(config: Arc<StaticConfig>) -> Result<Self, CliError> {
        let storage = StorageFactory::create(&config.database).await?;
        Ok(Self { config, storage })
    }

    /// Per-call context bounded by `database.timeout`.
    pub fn call_context(&self) -> CallContext {
        CallContext::with_timeout(Duration::from_secs(self.config.database.timeout.max(1)))
    }

    pub fn authority(&self) -> Result<CredentialAuthority, CliError> {
        let admin = &self.config.admin;
        if !admin.password_hash.is_empty() && !is_argon2_hash(&admin.password_hash) {
            warn!("admin.password_hash is not an Argon2 PHC string; administrator login will fail");
        }

        Ok(CredentialAuthority::new(
            self.storage.clone(),
            &self.config.credentials,
            self.config.admin.clone(),
        )?)
    }

    /// Persist internal failures before handing them back to the caller.
    pub async fn record_failure(&self, err: ShortcutError) -> CliError {
        if err.is_internal() {
            self.storage.log_error(&self.call_context(), &err).await;
        }
        err.into()
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    match cmd {
        // 不需要数据库连接的命令
        Commands::HashPassword { stdin } => commands::hash_password(&config.credentials, stdin),
        Commands::GenerateConfig { output_path, force } => {
            commands::generate_config(output_path, force)
        }
        Commands::Migrate => commands::migrate(&CommandEnv::connect(config).await?).await,
        Commands::Key { action } => {
            let env = CommandEnv::connect(config).await?;
            match action {
                KeyCommands::Generate { admin } => commands::generate_key(&env, &admin).await,
                KeyCommands::Revoke { prefix, admin } => {
                    commands::revoke_key(&env, &prefix, &admin).await
                }
                KeyCommands::Check { key } => commands::check_key(&env, &key).await,
            }
        }
        Commands::Stats => commands::show_stats(&CommandEnv::connect(config).await?).await,
        Commands::Errors { limit } => {
            commands::show_errors(&CommandEnv::connect(config).await?, limit).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shortcut_error() {
        assert!(matches!(
            CliError::from(ShortcutError::database_operation("boom")),
            CliError::StorageError(_)
        ));
        assert!(matches!(
            CliError::from(ShortcutError::unauthorized("nope")),
            CliError::CommandError(_)
        ));
    }

    #[test]
    fn test_format_simple() {
        let err = CliError::InputError("empty password".to_string());
        assert_eq!(err.format_simple(), "Input error: empty password");
        assert_eq!(err.to_string(), err.format_simple());
    }
}
