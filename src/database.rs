use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

/// Connection pool for the directory store.
///
/// Nothing here holds a session across requests: every service call borrows
/// a connection (or opens a transaction) for the length of one operation.
pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(16)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(60))
            .sqlx_logging(false);

        // sqlx turns `PRAGMA foreign_keys` on for every pooled SQLite
        // connection, which the show cascades rely on.
        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        let database = Database { conn };
        database.migrate().await?;

        log::info!("Database ready at: {}", path.display());
        Ok(database)
    }

    /// Apply every pending migration.
    pub async fn migrate(&self) -> Result<()> {
        log::debug!("Running database migrations");
        migration::Migrator::up(&self.conn, None)
            .await
            .context("Failed to run database migrations")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;

    use crate::entities;

    #[tokio::test]
    async fn test_open_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("booking.db");

        let database = Database::open(&path).await.unwrap();

        assert!(path.exists());
        let locations = entities::location::Entity::find()
            .all(&database.conn)
            .await
            .unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn test_open_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("booking.db");

        drop(Database::open(&path).await.unwrap());
        let database = Database::open(&path).await.unwrap();

        database.migrate().await.unwrap();
    }
}
