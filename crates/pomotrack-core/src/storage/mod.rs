mod config;
pub mod database;

pub use config::{ColorScheme, Config, Theme, ThemeConfig, TimerConfig};
pub use database::{Database, SessionOutcome, SessionRecord};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `POMOTRACK_HOME` overrides the location outright. Otherwise this is
/// `~/.config/pomotrack[-dev]/`, with the `-dev` suffix when
/// `POMOTRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOTRACK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotrack-dev")
            } else {
                base_dir.join("pomotrack")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
