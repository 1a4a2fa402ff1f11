//! Store connection bootstrap.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

/// Open the connection pool and, if asked, bring the schema up to date.
///
/// An in-memory SQLite database lives inside a single connection, so the
/// pool is pinned to one connection for such URLs.
pub async fn connect(
    url: &str,
    max_connections: u32,
    run_migrations: bool,
) -> Result<DatabaseConnection, DbErr> {
    let in_memory = url.starts_with("sqlite::memory:") || url.contains("mode=memory");
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(if in_memory { 1 } else { max_connections })
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    if run_migrations {
        Migrator::up(&db, None).await?;
        tracing::info!("migrations applied");
    }
    Ok(db)
}
