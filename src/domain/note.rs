//! Note entity: free-text annotation attached to a book.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// Maximum length of a derived note title, in characters, including the
/// ellipsis.
const TITLE_MAX_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Title used when no title is given and none can be derived from content.
/// Matches the schema default for the `notes.title` column.
const UNTITLED: &str = "Untitled";

/// A free-text note attached to a book.
///
/// Notes reference an existing book by id; deleting the book deletes its
/// notes (cascade). Like [`Book`](crate::Book), a note is constructed in
/// memory with an unassigned id and persisted via
/// [`crate::Library::insert_note`].
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    id: i64,
    book_id: i64,
    title: String,
    content: String,
    page_number: Option<u32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new Note for the given book.
    ///
    /// If `title` is `None` or empty/whitespace, it is derived from the
    /// first line of `content`, capped at 50 characters with a `...` suffix
    /// when truncated. `page_number` of `None` means the note is not
    /// page-specific.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `book_id <= 0` or `content` is
    /// empty or whitespace-only.
    pub fn new(
        book_id: i64,
        title: Option<&str>,
        content: impl Into<String>,
        page_number: Option<u32>,
    ) -> Result<Self> {
        if book_id <= 0 {
            return Err(Error::InvalidArgument(format!(
                "note book_id must be positive, got {book_id}"
            )));
        }

        let content = content.into();
        if content.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "note content cannot be empty".to_string(),
            ));
        }

        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => derive_title(&content),
        };

        let now = super::now_utc();
        Ok(Self {
            id: 0,
            book_id,
            title,
            content,
            page_number,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a Note from its stored representation.
    pub(crate) fn from_stored(
        id: i64,
        book_id: i64,
        title: String,
        content: String,
        page_number: Option<u32>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            book_id,
            title,
            content,
            page_number,
            created_at,
            updated_at,
        }
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    /// Returns the store-assigned id, or `0` if the note is not yet persisted.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the id of the book this note belongs to.
    pub fn book_id(&self) -> i64 {
        self.book_id
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the page this note refers to, or `None` if not page-specific.
    pub fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    /// Returns when the note was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the note was last modified.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the note text and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `content` is empty or
    /// whitespace-only.
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "note content cannot be empty".to_string(),
            ));
        }
        self.content = content;
        self.touch();
        Ok(())
    }

    /// Replaces the title and refreshes `updated_at`.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Replaces the page reference and refreshes `updated_at`.
    pub fn set_page(&mut self, page_number: Option<u32>) {
        self.page_number = page_number;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = super::now_utc();
    }
}

/// Derives a note title from the first line of its content.
///
/// Lines of 50 characters or fewer are kept verbatim; longer lines are cut
/// to 47 characters plus `...`. A blank first line yields `Untitled`.
fn derive_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return UNTITLED.to_string();
    }

    if first_line.chars().count() <= TITLE_MAX_CHARS {
        first_line.to_string()
    } else {
        let prefix: String = first_line
            .chars()
            .take(TITLE_MAX_CHARS - ELLIPSIS.len())
            .collect();
        format!("{prefix}{ELLIPSIS}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_note_stores_fields() {
        let note = Note::new(1, Some("Ch. 3"), "Streams are lazy lists", Some(42)).unwrap();
        assert_eq!(note.book_id(), 1);
        assert_eq!(note.title(), "Ch. 3");
        assert_eq!(note.content(), "Streams are lazy lists");
        assert_eq!(note.page_number(), Some(42));
        assert_eq!(note.id(), 0);
        assert_eq!(note.created_at(), note.updated_at());
    }

    #[test]
    fn zero_book_id_is_invalid() {
        let result = Note::new(0, None, "content", None);
        assert!(matches!(result, Err(crate::Error::InvalidArgument(_))));
    }

    #[test]
    fn negative_book_id_is_invalid() {
        let result = Note::new(-7, None, "content", None);
        assert!(matches!(result, Err(crate::Error::InvalidArgument(_))));
    }

    #[test]
    fn empty_content_is_invalid() {
        let result = Note::new(1, Some("title"), "", None);
        assert!(matches!(result, Err(crate::Error::InvalidArgument(_))));
    }

    #[test]
    fn title_derived_from_first_line() {
        let note = Note::new(1, None, "First line\nSecond line", None).unwrap();
        assert_eq!(note.title(), "First line");
    }

    #[test]
    fn empty_title_is_treated_as_absent() {
        let note = Note::new(1, Some(""), "First line\nSecond line", None).unwrap();
        assert_eq!(note.title(), "First line");
    }

    #[test]
    fn long_first_line_is_truncated_to_fifty_chars_with_ellipsis() {
        let content = "a".repeat(70);
        let note = Note::new(1, None, content, None).unwrap();

        assert_eq!(note.title().chars().count(), 50);
        assert!(note.title().ends_with("..."));
        assert!(note.title().starts_with(&"a".repeat(47)));
    }

    #[test]
    fn fifty_char_first_line_is_kept_verbatim() {
        let content = "b".repeat(50);
        let note = Note::new(1, None, content.clone(), None).unwrap();
        assert_eq!(note.title(), content);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let content = "é".repeat(70);
        let note = Note::new(1, None, content, None).unwrap();
        assert_eq!(note.title().chars().count(), 50);
    }

    #[test]
    fn blank_first_line_falls_back_to_untitled() {
        let note = Note::new(1, None, "\nactual content", None).unwrap();
        assert_eq!(note.title(), "Untitled");
    }

    #[test]
    fn set_content_replaces_text_and_touches_updated_at() {
        let mut note = Note::new(1, Some("t"), "old", None).unwrap();
        let before = note.updated_at();

        note.set_content("new text").unwrap();

        assert_eq!(note.content(), "new text");
        assert!(note.updated_at() >= before);
    }

    #[test]
    fn set_content_rejects_empty() {
        let mut note = Note::new(1, Some("t"), "old", None).unwrap();
        let result = note.set_content("  ");
        assert!(matches!(result, Err(crate::Error::InvalidArgument(_))));
        assert_eq!(note.content(), "old", "content should be unchanged");
    }

    #[test]
    fn set_page_and_title_never_change_identity() {
        let mut note = Note::new(3, Some("t"), "content", Some(1)).unwrap();
        let created = note.created_at();

        note.set_title("renamed");
        note.set_page(None);

        assert_eq!(note.title(), "renamed");
        assert_eq!(note.page_number(), None);
        assert_eq!(note.book_id(), 3);
        assert_eq!(note.created_at(), created);
    }
}
