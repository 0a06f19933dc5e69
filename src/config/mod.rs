/// Environment-driven application settings
pub mod app;

/// Database connection pool and table creation
pub mod database;

/// Default lixi configuration loading from a TOML seed file
pub mod seed;

pub use app::{AdminSeed, AppConfig, Environment};
pub use database::DatabaseSettings;
