/// Database connection and schema creation
pub mod database;

/// Application settings from duitku.toml and environment variables
pub mod settings;
