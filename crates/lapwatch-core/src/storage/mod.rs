mod config;

pub use config::{Config, CountdownConfig, DisplayConfig, NotificationsConfig};

use std::path::PathBuf;

/// Returns the configuration directory.
///
/// `LAPWATCH_CONFIG_DIR` wins if set. Otherwise `~/.config/lapwatch[-dev]/`,
/// where `LAPWATCH_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn config_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("LAPWATCH_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("LAPWATCH_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("lapwatch-dev")
            } else {
                base_dir.join("lapwatch")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
