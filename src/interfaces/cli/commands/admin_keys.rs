//! Admin key CLI commands

use colored::Colorize;
use tracing::warn;

use super::password::read_admin_password;
use crate::cli::AdminLogin;
use crate::auth::CredentialAuthority;
use crate::errors::ShortcutError;
use crate::interfaces::cli::{CliError, CommandEnv};

fn login(env: &CommandEnv, admin: &AdminLogin) -> Result<CredentialAuthority, CliError> {
    let authority = env.authority()?;
    let password = read_admin_password(admin.password_stdin)?;
    authority
        .authenticate_admin(&admin.username, &password)
        .map_err(|e| {
            warn!("Administrator authentication failed for '{}'", admin.username);
            CliError::from(e)
        })?;
    Ok(authority)
}

pub async fn generate_key(env: &CommandEnv, admin: &AdminLogin) -> Result<(), CliError> {
    let authority = login(env, admin)?;

    match authority.generate_key(&env.call_context()).await {
        Ok(key) => {
            eprintln!(
                "{} Admin key issued. It is shown only once:",
                "✓".green().bold()
            );
            println!("{}", key);
            Ok(())
        }
        Err(e) => Err(env.record_failure(e).await),
    }
}

pub async fn revoke_key(env: &CommandEnv, prefix: &str, admin: &AdminLogin) -> Result<(), CliError> {
    let authority = login(env, admin)?;

    match authority.revoke_key(&env.call_context(), prefix).await {
        Ok(()) => {
            println!("{} Admin key {} revoked", "✓".green().bold(), prefix.cyan());
            Ok(())
        }
        Err(e) => Err(env.record_failure(e).await),
    }
}

pub async fn check_key(env: &CommandEnv, key: &str) -> Result<(), CliError> {
    let authority = env.authority()?;

    match authority.validate_key(&env.call_context(), key).await {
        Ok(()) => {
            println!("{} Key is valid", "✓".green().bold());
            Ok(())
        }
        Err(ShortcutError::Unauthorized(_)) => Err(CliError::CommandError(
            "Key is invalid or revoked".to_string(),
        )),
        Err(e) => Err(env.record_failure(e).await),
    }
}
