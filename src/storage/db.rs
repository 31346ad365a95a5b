use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Query error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

/// Statistics from a purge operation
#[derive(Debug, Default)]
pub struct PurgeStats {
    pub rows: u64,
}

impl Database {
    /// Open or create the database under the given directory.
    ///
    /// WAL mode and a busy timeout are set on every pooled connection so
    /// concurrent requests queue on the write lock instead of erroring.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("math-glossary.db");

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )
        });
        let pool = Pool::builder().max_size(8).build(manager)?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Check out a pooled connection.
    pub(crate) fn conn(
        &self,
    ) -> Result<PooledConnection<SqliteConnectionManager>, DatabaseError> {
        Ok(self.pool.get()?)
    }

    /// Create the per-category tables if they do not exist yet.
    fn init_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.conn()?;
        for category in Category::ALL {
            let attachment_column = if category.accepts_attachment() {
                ",\n                 attachment TEXT"
            } else {
                ""
            };
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 definition TEXT NOT NULL{attachment_column}
                 )",
                category.table()
            );
            conn.execute(&sql, [])?;
        }
        Ok(())
    }

    // ========================================================================
    // Admin operations
    // ========================================================================

    /// Purge all data - for testing only
    pub fn purge_all(&self) -> Result<PurgeStats, DatabaseError> {
        let conn = self.conn()?;
        let mut stats = PurgeStats::default();

        for category in Category::ALL {
            let sql = format!("DELETE FROM {}", category.table());
            stats.rows += conn.execute(&sql, [])? as u64;
        }

        Ok(stats)
    }
}
