//! Generate config command

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

fn confirm_overwrite(path: &str) -> Result<bool, CliError> {
    print!(
        "{} {} {}",
        "File already exists:".yellow(),
        path.blue(),
        "Overwrite? [y/N] ".yellow()
    );
    io::stdout()
        .flush()
        .map_err(|e| CliError::InputError(e.to_string()))?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| CliError::InputError(e.to_string()))?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Generate example configuration file; without a path it goes to stdout.
pub fn generate_config(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let content = StaticConfig::generate_sample_config();

    let Some(path) = output_path else {
        print!("{}", content);
        return Ok(());
    };

    // 非 --force 模式下交互确认
    if !force && Path::new(&path).exists() && !confirm_overwrite(&path)? {
        println!("{}", "Aborted.".red());
        return Ok(());
    }

    std::fs::write(&path, content).map_err(|e| {
        CliError::CommandError(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_config_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap().to_string();

        generate_config(Some(path_str.clone()), true).unwrap();

        let loaded = StaticConfig::try_load(&path_str).unwrap();
        assert_eq!(loaded.database.database_url, "shortcuts.db");
        assert_eq!(loaded.credentials.salt, "@salt");
        assert_eq!(loaded.admin.username, "urlshorteneradmin");
    }
}
