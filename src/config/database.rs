//! Database configuration module.
//!
//! This module builds the pooled connection and creates all tables using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The one piece SeaORM cannot express from an entity, the partial
//! unique index that allows at most one active lixi configuration, is issued
//! as raw SQL understood by both `SQLite` and `PostgreSQL`.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

use crate::entities::{LixiConfig, LixiGreeting, User};
use crate::errors::Result;

/// Default local `SQLite` file, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://lixi.sqlite?mode=rwc";

/// At most one row may have `is_active = true`.
pub const ACTIVE_CONFIG_INDEX_SQL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_lixi_configs_active \
     ON lixi_configs (is_active) WHERE is_active";

/// Connection pool settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Store connection string
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// Connections are recycled after this long
    pub max_lifetime: Duration,
    /// Idle connections above `min_connections` are closed after this long
    pub idle_timeout: Duration,
    /// Give up establishing or checking out a connection after this long
    pub connect_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            min_connections: 2,
            max_lifetime: Duration::from_secs(60 * 60),
            idle_timeout: Duration::from_secs(30 * 60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Opens the connection pool described by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .max_lifetime(settings.max_lifetime)
        .idle_timeout(settings.idle_timeout)
        .connect_timeout(settings.connect_timeout)
        .acquire_timeout(settings.connect_timeout)
        .sqlx_logging(false);

    debug!(
        max_connections = settings.max_connections,
        "connecting to database"
    );
    let db = Database::connect(options).await?;
    db.ping().await?;
    info!("database connection pool ready");
    Ok(db)
}

/// Creates all tables and the active-configuration index if they are missing.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut config_table = schema.create_table_from_entity(LixiConfig);
    let mut greeting_table = schema.create_table_from_entity(LixiGreeting);

    user_table.if_not_exists();
    config_table.if_not_exists();
    greeting_table.if_not_exists();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&config_table)).await?;
    db.execute(builder.build(&greeting_table)).await?;
    db.execute_unprepared(ACTIVE_CONFIG_INDEX_SQL).await?;

    Ok(())
}
