//! migrate / stats / errors

use colored::Colorize;

use crate::interfaces::cli::{CliError, CommandEnv};
use crate::storage::backend::run_migrations;

/// Apply pending migrations; a no-op when the schema is current.
pub async fn migrate(env: &CommandEnv) -> Result<(), CliError> {
    if let Err(e) = run_migrations(env.storage.get_db()).await {
        return Err(env.record_failure(e).await);
    }

    println!(
        "{} {} schema is up to date",
        "✓".green().bold(),
        env.storage.backend_name().to_uppercase()
    );
    Ok(())
}

pub async fn show_stats(env: &CommandEnv) -> Result<(), CliError> {
    let stats = match env.storage.stats(&env.call_context()).await {
        Ok(stats) => stats,
        Err(e) => return Err(env.record_failure(e).await),
    };

    let json = serde_json::to_string_pretty(&stats)
        .map_err(|e| CliError::CommandError(format!("Failed to serialize stats: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub async fn show_errors(env: &CommandEnv, limit: u64) -> Result<(), CliError> {
    let entries = env.storage.recent_errors(&env.call_context(), limit).await?;

    if entries.is_empty() {
        println!("{}", "No errors recorded".dimmed());
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {}",
            entry.logged_at.to_rfc3339().dimmed(),
            entry.message
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::{DatabaseConfig, StaticConfig};
    use crate::context::CallContext;
    use crate::storage::StorageFactory;

    #[tokio::test]
    async fn test_migrate_reapplies_cleanly_on_migrated_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StaticConfig::default();
        config.database = DatabaseConfig {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("m.db").display()),
            pool_size: 2,
            timeout: 30,
        };
        let storage = StorageFactory::create(&config.database).await.unwrap();
        storage
            .create(&CallContext::background(), "https://example.com", "keep")
            .await
            .unwrap();

        let env = CommandEnv {
            config: Arc::new(config),
            storage: storage.clone(),
        };
        migrate(&env).await.unwrap();
        migrate(&env).await.unwrap();

        assert_eq!(storage.count(&CallContext::background()).await.unwrap(), 1);
    }
}
