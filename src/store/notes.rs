//! Note queries and full-text search.

use super::{Library, decode_timestamp, encode_timestamp};
use crate::domain::Note;
use crate::error::{Error, Result};
use rusqlite::{Row, params};

type RawNote = (i64, i64, String, String, Option<u32>, String, String);

fn raw_note(row: &Row) -> rusqlite::Result<RawNote> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn note_from_raw(raw: RawNote) -> Result<Note> {
    let (id, book_id, title, content, page_number, created_at, updated_at) = raw;
    Ok(Note::from_stored(
        id,
        book_id,
        title,
        content,
        page_number,
        decode_timestamp(&created_at)?,
        decode_timestamp(&updated_at)?,
    ))
}

impl Library {
    /// Inserts a note and assigns the generated id into it.
    ///
    /// The `notes_ai` trigger mirrors the content into the search index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the referenced book doesn't exist
    /// (foreign key) or on other store failure; on error the note's id
    /// stays unassigned.
    pub fn insert_note(&self, note: &mut Note) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO notes (book_id, title, content, page_number, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                note.book_id(),
                note.title(),
                note.content(),
                note.page_number(),
                encode_timestamp(note.created_at()),
                encode_timestamp(note.updated_at()),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        note.assign_id(id);
        Ok(id)
    }

    /// Lists a book's notes, ordered by creation time ascending.
    ///
    /// A book with no notes yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `book_id <= 0`.
    pub fn list_notes(&self, book_id: i64) -> Result<Vec<Note>> {
        if book_id <= 0 {
            return Err(Error::InvalidArgument(format!(
                "book id must be positive, got {book_id}"
            )));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, book_id, title, content, page_number, created_at, updated_at
             FROM notes WHERE book_id = ?1 ORDER BY created_at",
        )?;

        let rows = stmt.query_map([book_id], raw_note)?;
        let mut notes = Vec::new();
        for row in rows {
            notes.push(note_from_raw(row?)?);
        }
        Ok(notes)
    }

    /// Replaces a note's mutable fields by id.
    ///
    /// `book_id` and `created_at` are never rewritten. The `notes_au`
    /// trigger keeps the search index in sync.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the note has no assigned id.
    pub fn update_note(&self, note: &Note) -> Result<()> {
        if note.id() <= 0 {
            return Err(Error::InvalidArgument(
                "cannot update a note without an assigned id".to_string(),
            ));
        }

        self.conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, page_number = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                note.title(),
                note.content(),
                note.page_number(),
                encode_timestamp(note.updated_at()),
                note.id(),
            ],
        )?;
        Ok(())
    }

    /// Deletes a note; the `notes_ad` trigger removes its index entry.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `id <= 0`.
    pub fn delete_note(&self, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(Error::InvalidArgument(format!(
                "note id must be positive, got {id}"
            )));
        }

        self.conn
            .execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Full-text search over note content, most recent first.
    ///
    /// The query string is handed to FTS5 unmodified, so its operators
    /// (prefix `*`, phrases, AND/OR/NOT) all work. Zero matches yield an
    /// empty vec.
    ///
    /// # Errors
    ///
    /// Malformed FTS5 query syntax surfaces as [`Error::Database`].
    pub fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT n.id, n.book_id, n.title, n.content, n.page_number, n.created_at, n.updated_at
             FROM notes_fts
             JOIN notes n ON notes_fts.rowid = n.id
             WHERE notes_fts MATCH ?1
             ORDER BY n.created_at DESC",
        )?;

        let rows = stmt.query_map([query], raw_note)?;
        let mut notes = Vec::new();
        for row in rows {
            notes.push(note_from_raw(row?)?);
        }
        Ok(notes)
    }
}
