//! Connection management for the library store.

use super::Library;
use super::schema;
use super::transaction::Transaction;
use crate::error::{Error, Result};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

impl Library {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory store with the full schema.
    ///
    /// Useful for tests and throwaway libraries that don't need persistence.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA recursive_triggers = ON;")?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a store at the given path.
    ///
    /// Creates parent directories if they don't exist, initializes the
    /// schema on first use, and migrates older stores forward.
    /// `recursive_triggers` is enabled so deletes cascaded from `books`
    /// still fire the `notes_ad` trigger that clears the search index.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(e, parent))?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA recursive_triggers = ON;")?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Opens the store at [`Library::default_path`].
    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path()?)
    }

    /// Returns the per-user default store location,
    /// `<data dir>/booknote/booknote.db`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("booknote").join("booknote.db"))
            .ok_or_else(|| Error::NotFound("user data directory".to_string()))
    }

    /// Closes the store, reporting any error SQLite raises while flushing.
    ///
    /// Dropping the handle also closes it; this form surfaces the failure.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Database(e))
    }

    /// Returns the stored schema version.
    pub fn schema_version(&self) -> Result<i32> {
        schema::schema_version(&self.conn)
    }

    // ===========================================
    // Transaction Support
    // ===========================================

    /// Begins a new transaction.
    ///
    /// The transaction rolls back on drop unless `commit()` is called.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Transaction::begin(&self.conn)
    }
}
