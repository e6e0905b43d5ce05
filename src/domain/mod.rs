//! Entity models: Book and Note.

mod book;
mod note;

pub use book::Book;
pub use note::Note;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the store's microsecond precision, so an
/// entity compares equal to itself after a persist/load round trip.
pub(crate) fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
