//! Schema creation and forward-only migration.

use crate::error::{Error, Result};
use crate::store::transaction::Transaction;
use rusqlite::Connection;

/// Schema version written by the current build.
pub const SCHEMA_VERSION: i32 = 3;

// ===========================================
// Baseline (v1) DDL
// ===========================================

const CREATE_BOOKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    isbn TEXT UNIQUE,
    title TEXT NOT NULL,
    author TEXT,
    year INTEGER,
    publisher TEXT,
    filepath TEXT NOT NULL UNIQUE,
    added_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

const CREATE_NOTES_TABLE: &str = "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    page_number INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

const CREATE_METADATA_TABLE: &str = "CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);";

// External-content FTS5 table mirroring notes.content. Writes must go
// through the special command form, which the triggers below use.
const CREATE_NOTES_FTS: &str = "CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(
    content,
    content='notes',
    content_rowid='id'
);";

const CREATE_FTS_TRIGGERS: &str = "CREATE TRIGGER IF NOT EXISTS notes_ai
AFTER INSERT ON notes BEGIN
    INSERT INTO notes_fts(rowid, content) VALUES (new.id, new.content);
END;
CREATE TRIGGER IF NOT EXISTS notes_ad
AFTER DELETE ON notes BEGIN
    INSERT INTO notes_fts(notes_fts, rowid, content) VALUES ('delete', old.id, old.content);
END;
CREATE TRIGGER IF NOT EXISTS notes_au
AFTER UPDATE ON notes BEGIN
    INSERT INTO notes_fts(notes_fts, rowid, content) VALUES ('delete', old.id, old.content);
    INSERT INTO notes_fts(rowid, content) VALUES (new.id, new.content);
END;";

// ===========================================
// Initialization
// ===========================================

/// Creates the v1 schema objects if absent and migrates the store forward
/// to [`SCHEMA_VERSION`].
///
/// Idempotent: safe to call on every open. Any DDL failure aborts with
/// [`Error::Database`] and the store must not be used afterward.
pub(crate) fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_BOOKS_TABLE)?;
    conn.execute_batch(CREATE_NOTES_TABLE)?;
    conn.execute_batch(CREATE_METADATA_TABLE)?;
    conn.execute_batch(CREATE_NOTES_FTS)?;
    conn.execute_batch(CREATE_FTS_TRIGGERS)?;

    conn.execute(
        "INSERT OR IGNORE INTO metadata (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    migrate(conn)
}

/// Returns the schema version stored in the metadata table.
pub(crate) fn schema_version(conn: &Connection) -> Result<i32> {
    let value = conn.query_row(
        "SELECT value FROM metadata WHERE key = 'schema_version'",
        [],
        |row| row.get::<_, String>(0),
    );

    match value {
        Ok(text) => text
            .parse()
            .map_err(|_| Error::Unknown(format!("malformed schema_version {text:?}"))),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(Error::NotFound("schema_version metadata".to_string()))
        }
        Err(e) => Err(Error::Database(e)),
    }
}

// ===========================================
// Forward-Only Migrations
// ===========================================

/// Applies every migration above the stored version, in order.
///
/// Migrations are additive and forward-only: no column drops, no data
/// rewriting beyond column defaults.
fn migrate(conn: &Connection) -> Result<()> {
    let mut version = schema_version(conn)?;

    if version < 2 {
        apply_step(
            conn,
            2,
            "ALTER TABLE notes ADD COLUMN title TEXT NOT NULL DEFAULT 'Untitled';",
        )?;
        version = 2;
    }

    if version < 3 {
        apply_step(conn, 3, "ALTER TABLE books ADD COLUMN cover_path TEXT;")?;
    }

    Ok(())
}

/// Runs one version-to-version step as a single transaction, so the version
/// bump can never outlive a failed schema change.
fn apply_step(conn: &Connection, version: i32, ddl: &str) -> Result<()> {
    let tx = Transaction::begin(conn)?;
    tx.execute_batch(ddl)?;
    tx.execute(
        "UPDATE metadata SET value = ?1 WHERE key = 'schema_version'",
        [version.to_string()],
    )?;
    tx.commit()
}
