use clubly_api::config::ApiConfig;
use clubly_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url)
        .await
        .wrap_err("Failed to connect to the database")?;

    // Tables are created idempotently on every start
    initialize_database(&db_pool).await?;

    clubly_api::start_server(config, db_pool).await?;

    Ok(())
}
