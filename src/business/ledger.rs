//! Main Ledger API
//!
//! This module provides the primary interface for interacting with
//! a SplitBill database.

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use crate::config::LedgerConfig;
use crate::error::{SplitError, Result};
use crate::database::{Database, LedgerProperties, migrations, queries};
use crate::utils::generate_database_id;
use crate::DB_VERSION;

/// Main ledger interface
pub struct Ledger {
    /// Path to the ledger folder
    pub(crate) folder: PathBuf,
    /// Database connection
    pub(crate) db: Option<Database>,
    /// Runtime configuration
    pub(crate) config: LedgerConfig,
}

impl Ledger {
    /// Open a ledger from a folder
    ///
    /// Older schemas are upgraded in place. A schema newer than this
    /// library is rejected with `InvalidVersion`.
    pub fn open(folder: &Path, config: LedgerConfig) -> Result<Self> {
        let db_path = folder.join(&config.database_filename);

        if !db_path.exists() {
            return Err(SplitError::DatabaseNotFound(
                db_path.to_string_lossy().to_string()
            ));
        }

        let db = Database::open(&db_path)?;
        let conn = db.connection()?;

        let version = migrations::get_database_version(conn)?;
        if !migrations::is_version_compatible(&version) {
            return Err(SplitError::InvalidVersion(version));
        }
        if version != DB_VERSION {
            tracing::info!(from = %version, to = DB_VERSION, "migrating ledger database");
            db.transaction(|conn| {
                migrations::upgrade_database(conn, &version)?;
                migrations::set_database_version(conn, DB_VERSION)
            })?;
        }

        tracing::info!(folder = %folder.display(), "opened ledger");
        Ok(Self {
            folder: folder.to_path_buf(),
            db: Some(db),
            config,
        })
    }

    /// Create a new ledger in the specified folder
    pub fn create(folder: &Path, config: LedgerConfig) -> Result<Self> {
        std::fs::create_dir_all(folder)?;

        let db_path = folder.join(&config.database_filename);
        if db_path.exists() {
            return Err(SplitError::InvalidOperation(format!(
                "Database already exists: {}", db_path.display()
            )));
        }

        let db = Database::create(&db_path)?;
        let db_id = generate_database_id();
        queries::set_properties(db.connection()?, &db_id, &config.lang, DB_VERSION)?;

        tracing::info!(folder = %folder.display(), database_id = %db_id, "created ledger");
        Ok(Self {
            folder: folder.to_path_buf(),
            db: Some(db),
            config,
        })
    }

    /// Close the ledger
    pub fn close(&mut self) {
        if let Some(mut db) = self.db.take() {
            db.close();
            tracing::debug!(folder = %self.folder.display(), "closed ledger");
        }
    }

    /// Check if the ledger is open
    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Get the ledger folder path
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Get the database path
    pub fn database_path(&self) -> PathBuf {
        self.folder.join(&self.config.database_filename)
    }

    /// Get the runtime configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get database properties
    pub fn get_properties(&self) -> Result<LedgerProperties> {
        queries::get_properties(self.conn()?)?
            .ok_or_else(|| SplitError::DatabaseError("Properties not found".to_string()))
    }

    /// Get a reference to the database
    pub fn database(&self) -> Result<&Database> {
        self.db.as_ref().ok_or_else(|| SplitError::DatabaseError("Database not open".to_string()))
    }

    /// Get the open connection
    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.database()?.connection()
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        self.close();
    }
}
