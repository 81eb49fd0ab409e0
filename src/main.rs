use dotenvy::dotenv;
use duitku::{config, errors::Result, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal: env vars can be set externally.
    dotenv().ok();

    let settings = config::settings::load_default_settings()?;
    info!("loaded settings, database at {}", settings.database_url);

    let db = config::database::create_connection(&settings.database_url).await?;
    config::database::create_tables(&db).await?;
    info!("database ready");

    server::run(db, &settings.bind_addr).await?;

    Ok(())
}
