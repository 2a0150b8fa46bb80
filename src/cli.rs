//! Command-line interface definitions using clap
//!
//! This module defines the operator CLI using clap's derive macros.

use clap::{Parser, Subcommand};

/// url-shortener - persistence and credential core of a URL shortener
#[derive(Parser)]
#[command(name = "url-shortener")]
#[command(version)]
#[command(about = "Operator tools for the URL shortener store", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create or upgrade the database schema
    Migrate,

    /// Manage admin keys
    Key {
        #[command(subcommand)]
        action: KeyCommands,
    },

    /// Hash a password for `admin.password_hash`
    HashPassword {
        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Print record and usage totals as JSON
    Stats,

    /// Show the most recent persisted internal errors
    Errors {
        /// Maximum number of entries
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: stdout)
        output_path: Option<String>,

        /// Force overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Admin key commands. Issuing and revoking require the bootstrap administrator.
#[derive(Subcommand)]
pub enum KeyCommands {
    /// Issue a new admin key (printed once)
    Generate {
        #[command(flatten)]
        admin: AdminLogin,
    },

    /// Revoke the admin key with the given prefix
    Revoke {
        /// 8-letter key prefix
        prefix: String,

        #[command(flatten)]
        admin: AdminLogin,
    },

    /// Check whether an admin key is valid
    Check {
        /// Full key, `prefix.secret`
        key: String,
    },
}

#[derive(clap::Args)]
pub struct AdminLogin {
    /// Administrator username
    #[arg(long, short = 'u')]
    pub username: String,

    /// Read the administrator password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}
