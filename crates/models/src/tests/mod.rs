

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps every query on the same memory database.
pub(crate) async fn sqlite_memory() -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    crate::db::ensure_schema(&db).await?;
    Ok(db)
}
