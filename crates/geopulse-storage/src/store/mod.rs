use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

pub mod alert;
pub mod observation;
pub mod threshold;
pub mod user;

/// Unified access layer for the GeoPulse database.
///
/// All methods are `async fn`, backed by SeaORM over SQLite.
pub struct GeoStore {
    pub(crate) db: DatabaseConnection,
}

impl GeoStore {
    /// Connect and initialize the database.
    ///
    /// `db_url` is a full connection URL supplied by the server config,
    /// e.g. `sqlite://data/geopulse.db?mode=rwc`.
    ///
    /// Runs all pending `sea-orm-migration` migrations so the schema is
    /// current before the first query.
    pub async fn new(db_url: &str) -> Result<Self> {
        let db = Database::connect(db_url).await?;

        // WAL mode only applies to SQLite
        if db_url.starts_with("sqlite:") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None).await?;

        tracing::info!(db_url = %db_url, "Initialized geo store");

        Ok(Self { db })
    }

    /// Underlying database connection (used by the store submodules).
    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
