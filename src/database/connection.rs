//! Database connection management

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use crate::error::{SplitError, Result};
use super::schema;

/// Database connection wrapper
pub struct Database {
    /// Path to the database file
    path: PathBuf,
    /// SQLite connection
    conn: Option<Connection>,
}

impl Database {
    /// Open a database at the specified path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        enable_foreign_keys(&conn)?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
        })
    }

    /// Create a new database with all tables
    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        enable_foreign_keys(&conn)?;

        for sql in schema::CREATE_ALL_TABLES {
            conn.execute(sql, [])?;
        }
        conn.execute_batch(schema::CREATE_INDICES)?;

        tracing::info!(path = %path.display(), "created database");
        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
        })
    }

    /// Get a reference to the connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| {
            SplitError::DatabaseError("Database not open".to_string())
        })
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the database connection
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Check if database is open
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Begin a transaction
    pub fn begin_transaction(&self) -> Result<()> {
        self.connection()?.execute_batch("BEGIN TRANSACTION")?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit_transaction(&self) -> Result<()> {
        self.connection()?.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback_transaction(&self) -> Result<()> {
        self.connection()?.execute_batch("ROLLBACK")?;
        Ok(())
    }

    /// Run `f` inside a transaction, committing on success and rolling back on error
    pub fn transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        self.begin_transaction()?;
        match f(self.connection()?) {
            Ok(value) => {
                self.commit_transaction()?;
                Ok(value)
            }
            Err(e) => {
                self.rollback_transaction()?;
                Err(e)
            }
        }
    }

    /// Force a WAL checkpoint to write all data to the main database file
    ///
    /// The ledger uses SQLite's default rollback journal, where every commit
    /// already lands in the main file and this returns without doing work.
    /// It only matters when the file has been switched to WAL mode.
    pub fn checkpoint(&self) -> Result<()> {
        self.connection()?.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}

/// SQLite leaves foreign key enforcement off per connection unless asked
fn enable_foreign_keys(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    Ok(())
}
