use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::{DEFAULT_CONFIG_PATH, StaticConfig};

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Only the process edge (the CLI) reads this; library components take the
/// config sections they need as explicit arguments.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Initialize the global configuration
///
/// Loads configuration from `path` (default "config.toml"). If the file
/// doesn't exist, uses in-memory defaults plus environment overrides.
///
/// # Examples
/// ```no_run
/// use url_shortener::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) {
    CONFIG.get_or_init(|| {
        ArcSwap::from_pointee(StaticConfig::load(path.unwrap_or(DEFAULT_CONFIG_PATH)))
    });
}
