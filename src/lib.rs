//! url-shortener - persistence and credential core of a URL shortener
//!
//! This library provides the record store, usage tracking and the admin
//! credential authority, backed by SeaORM (SQLite, MySQL/MariaDB, PostgreSQL).
//!
//! # Architecture
//! - `storage`: Record store, usage tracker, error log and engine error mapping
//! - `auth`: Admin key issuance/validation/revocation and bootstrap admin login
//! - `context`: Per-call deadline and cancellation
//! - `config`: Configuration management
//! - `interfaces`: Operator CLI
//! - `system`: Logging initialization

pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod interfaces;
pub mod storage;
pub mod system;
pub mod utils;
