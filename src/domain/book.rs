//! Book entity: a PDF file with bibliographic metadata.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// A book tracked by the library.
///
/// Books are constructed in memory with an unassigned id (`0`), validated,
/// and persisted via [`crate::Library::insert_book`], which assigns the id.
/// Setters refresh `updated_at`; `id` and `added_at` never change after
/// creation.
///
/// # Required Fields
/// - `title`: non-empty human-readable title
/// - `filepath`: path to the source PDF, unique within a store
///
/// # Optional Fields
/// - `isbn`: unique within a store when present
/// - `author`, `publisher`: free-form strings
/// - `year`: publication year (`None` when unknown)
/// - `cover_path`: local cache path to a cover image
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    id: i64,
    isbn: Option<String>,
    title: String,
    author: Option<String>,
    year: Option<i32>,
    publisher: Option<String>,
    filepath: String,
    cover_path: Option<String>,
    added_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Book {
    /// Creates a new Book with the required fields.
    ///
    /// Sets `added_at == updated_at == now`. The title is stored trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `title` or `filepath` is empty
    /// or whitespace-only.
    pub fn new(title: impl Into<String>, filepath: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument(
                "book title cannot be empty".to_string(),
            ));
        }

        let filepath = filepath.into();
        if filepath.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "book filepath cannot be empty".to_string(),
            ));
        }

        let now = super::now_utc();
        Ok(Self {
            id: 0,
            isbn: None,
            title: trimmed.to_string(),
            author: None,
            year: None,
            publisher: None,
            filepath,
            cover_path: None,
            added_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a Book from its stored representation.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_stored(
        id: i64,
        isbn: Option<String>,
        title: String,
        author: Option<String>,
        year: Option<i32>,
        publisher: Option<String>,
        filepath: String,
        cover_path: Option<String>,
        added_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            isbn,
            title,
            author,
            year,
            publisher,
            filepath,
            cover_path,
            added_at,
            updated_at,
        }
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    /// Returns the store-assigned id, or `0` if the book is not yet persisted.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the ISBN, if known.
    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the author, if known.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Returns the publication year, if known.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Returns the publisher, if known.
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    /// Returns the path to the source PDF.
    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    /// Returns the local cover-image cache path, if one has been fetched.
    pub fn cover_path(&self) -> Option<&str> {
        self.cover_path.as_deref()
    }

    /// Returns when the book was added to the library.
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Returns when the book was last modified.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the ISBN (`None` clears it) and refreshes `updated_at`.
    pub fn set_isbn(&mut self, isbn: Option<&str>) {
        self.isbn = isbn.map(str::to_string);
        self.touch();
    }

    /// Replaces the author (`None` clears it) and refreshes `updated_at`.
    pub fn set_author(&mut self, author: Option<&str>) {
        self.author = author.map(str::to_string);
        self.touch();
    }

    /// Replaces the publication year (`None` clears it) and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `year` is zero or negative.
    pub fn set_year(&mut self, year: Option<i32>) -> Result<()> {
        if let Some(y) = year
            && y <= 0
        {
            return Err(Error::InvalidArgument(format!(
                "publication year must be positive, got {y}"
            )));
        }
        self.year = year;
        self.touch();
        Ok(())
    }

    /// Replaces the publisher (`None` clears it) and refreshes `updated_at`.
    pub fn set_publisher(&mut self, publisher: Option<&str>) {
        self.publisher = publisher.map(str::to_string);
        self.touch();
    }

    /// Replaces the cover cache path (`None` clears it) and refreshes `updated_at`.
    pub fn set_cover_path(&mut self, cover_path: Option<&str>) {
        self.cover_path = cover_path.map(str::to_string);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = super::now_utc();
    }
}
