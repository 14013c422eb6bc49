//! Provisioning entry point: prepares the database the app runs against.
//!
//! Initializes tracing, loads `.env`, connects to the configured database,
//! creates the schema and seeds the default category taxonomy. The UI layer
//! lives elsewhere; running this once is enough to hand it a ready store.

use dotenvy::dotenv;
use grocery_buddy::{config, core, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Connect and create the schema
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to the database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;
    info!("Database ready at {}", config::database::get_database_url());

    // 4. Seed default categories when the taxonomy is empty
    let seed = config::categories::load_default_config()?;
    let inserted = core::category::seed_categories(&db, &seed.categories).await?;
    if inserted == 0 {
        info!("Category taxonomy already populated, nothing to seed");
    }

    Ok(())
}
