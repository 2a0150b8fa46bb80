//! 密码输入与 hash-password 命令

use std::io::{self, BufRead, IsTerminal};

use colored::Colorize;

use crate::config::CredentialsConfig;
use crate::interfaces::cli::CliError;
use crate::utils::password::SecretHasher;

/// 从 stdin 读取一行密码
fn read_password_line() -> Result<String, CliError> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::InputError(format!("Failed to read from stdin: {}", e)))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt(label: &str) -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::InputError(
            "No password provided. Use --stdin / --password-stdin or run interactively."
                .to_string(),
        ));
    }
    rpassword::prompt_password(label)
        .map_err(|e| CliError::InputError(format!("Failed to read password: {}", e)))
}

/// 读取管理员密码（登录用，不需要确认）
pub fn read_admin_password(from_stdin: bool) -> Result<String, CliError> {
    if from_stdin {
        read_password_line()
    } else {
        prompt("Administrator password: ")
    }
}

/// 交互式输入密码（带确认）
fn read_new_password(from_stdin: bool) -> Result<String, CliError> {
    if from_stdin {
        return read_password_line();
    }

    let password = prompt("Enter new password: ")?;
    let confirm = prompt("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::InputError("Passwords do not match".to_string()));
    }
    Ok(password)
}

/// 运行 hash-password 命令
pub fn hash_password(credentials: &CredentialsConfig, stdin: bool) -> Result<(), CliError> {
    let password = read_new_password(stdin)?;
    if password.is_empty() {
        return Err(CliError::InputError("Password must not be empty".to_string()));
    }

    let hasher = SecretHasher::new(credentials.hash_params(), credentials.salt.clone())
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    let hashed = hasher
        .hash(&password)
        .map_err(|e| CliError::CommandError(e.to_string()))?;

    eprintln!(
        "{} Put this value into admin.password_hash:",
        "✓".green().bold()
    );
    println!("{}", hashed);
    Ok(())
}
