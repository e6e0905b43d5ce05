//! booknote-core - data layer for the booknote personal library manager.
//!
//! Tracks books (PDF files with bibliographic metadata) and free-text notes
//! attached to them, with full-text search over note content via SQLite FTS5.
//! Consumers (CLI, GUI, metadata fetchers) go through [`Library`] exclusively;
//! this crate owns the schema, its migrations, and every query.

pub mod domain;
pub mod error;
pub mod store;

pub use domain::{Book, Note};
pub use error::{Error, Result};
pub use store::{Library, Transaction};
