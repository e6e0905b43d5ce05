//! SQLite-backed persistence: schema lifecycle and the query layer.

mod books;
mod connection;
mod notes;
mod schema;
mod transaction;


pub use schema::SCHEMA_VERSION;
pub use transaction::Transaction;

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;

// ===========================================
// Library Handle
// ===========================================

/// Handle to an open library store.
///
/// Owns the SQLite connection and is the sole path by which collaborators
/// read or write persisted state. Operations are synchronous and run on the
/// caller's thread; callers sharing a handle across threads must serialize
/// access themselves.
pub struct Library {
    pub(crate) conn: Connection,
}

impl Library {
    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ===========================================
// Timestamp Codec
// ===========================================

// Timestamps are stored as RFC 3339 text with fixed microsecond precision
// so that lexicographic order on the column equals chronological order.

pub(crate) fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Unknown(format!("malformed stored timestamp {text:?}: {e}")))
}
