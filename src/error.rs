//! Shared error taxonomy used by every layer of the crate.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in the library core.
///
/// Every fallible operation in this crate returns one of these kinds; the
/// core never recovers from a failure internally. Collaborators (CLI/GUI)
/// are responsible for turning these into user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller supplied a bad input (empty required field, non-positive id).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store engine failed: constraint violation, malformed FTS query
    /// syntax, or I/O inside SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A file or directory was missing.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Reserved for collaborators that fetch metadata or covers over HTTP.
    #[error("network error: {0}")]
    Network(String),

    /// An allocation failed.
    #[error("out of memory")]
    OutOfMemory,

    /// No row matched a by-id lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// Reserved. Duplicate-key violations currently surface as [`Error::Database`];
    /// this variant exists so callers can classify them separately later.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The operating system denied access.
    #[error("permission denied: {path}")]
    Permission { path: PathBuf },

    /// Any failure that does not fit another kind, including corrupted
    /// values encountered while marshalling rows.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Classifies a filesystem error against the taxonomy.
    pub(crate) fn io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Error::Permission {
                path: path.to_path_buf(),
            },
            io::ErrorKind::OutOfMemory => Error::OutOfMemory,
            _ => Error::Unknown(format!("{}: {}", path.display(), err)),
        }
    }
}

/// Result type for library core operations.
pub type Result<T> = std::result::Result<T, Error>;
