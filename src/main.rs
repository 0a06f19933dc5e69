use dotenvy::dotenv;
use lixi_buddy::{
    api::{self, AppState, RouterOptions},
    config::{AppConfig, database, seed},
    errors::{Error, Result},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    if dotenv().is_err() {
        info!("No .env file found, using environment variables");
    }

    // 3. Load the application configuration
    let app_config = AppConfig::from_env()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(environment = ?app_config.environment, "configuration loaded");

    // 4. Connect and make sure the schema exists
    let db = database::connect(&app_config.database)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    let state = AppState::from_database(&db, &app_config.jwt_secret);

    // 5. Seed the admin account
    if let Some(admin) = &app_config.admin_seed {
        match state.auth.register(&admin.email, &admin.password).await {
            Ok(user) => info!(user_id = user.id, "admin account created"),
            Err(Error::Conflict { .. }) => info!("admin account already exists"),
            Err(e) => warn!("Failed to seed admin account: {}", e),
        }
    }

    // 6. Seed a default lixi configuration on first start
    if app_config.seed_file.exists() {
        match seed::load_seed(&app_config.seed_file) {
            Ok(config) => {
                seed::apply_seed(&state.lixi, config)
                    .await
                    .inspect_err(|e| error!("Failed to apply seed file: {}", e))?;
            }
            Err(e) => warn!("Ignoring seed file: {}", e),
        }
    }

    // 7. Serve
    let router = api::router(state, &RouterOptions::from(&app_config));
    api::serve(router, app_config.port).await?;

    db.close().await?;
    info!("Server stopped");
    Ok(())
}
