#![cfg(test)]
use std::time::Duration;

use sea_orm::{ConnectOptions, Database};
use models::db::ensure_schema;

use crate::signature::repository::SeaOrmSignatureRepository;

/// Repository over a private in-memory SQLite database with the schema applied.
///
/// One pooled connection, so every statement sees the same memory database.
pub async fn sqlite_repo() -> Result<SeaOrmSignatureRepository, anyhow::Error> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    ensure_schema(&db).await?;
    Ok(SeaOrmSignatureRepository::new(db, Duration::from_secs(5)))
}
