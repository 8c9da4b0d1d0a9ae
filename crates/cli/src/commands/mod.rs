//! CLI command implementations.

pub mod intents;
pub mod migrate;

use secrecy::SecretString;
use smart_cart_server::config::{ConfigError, get_database_url};
use smart_cart_server::db::{self, StoreError};
use sqlx::PgPool;
use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Connect to the database named by `SMART_CART_DATABASE_URL`.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = get_database_url("SMART_CART_DATABASE_URL")?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
