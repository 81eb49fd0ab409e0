//! Application settings loading.
//!
//! Settings come from an optional `duitku.toml` file, with `DATABASE_URL`
//! and `BIND_ADDR` environment variables taking precedence. Everything has a
//! default, so a bare `duitku` run works against a local SQLite file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

fn default_database_url() -> String {
    "sqlite://data/duitku.sqlite?mode=rwc".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SeaORM connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            bind_addr: default_bind_addr(),
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings file: {e}"),
    })
}

/// Loads settings from `./duitku.toml` when present, falling back to
/// defaults, then applies environment variable overrides.
pub fn load_default_settings() -> Result<Settings> {
    let mut settings = if Path::new("duitku.toml").exists() {
        load_settings("duitku.toml")?
    } else {
        Settings::default()
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        settings.database_url = url;
    }
    if let Ok(addr) = std::env::var("BIND_ADDR") {
        settings.bind_addr = addr;
    }

    Ok(settings)
}
