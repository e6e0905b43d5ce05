//! Book queries.

use super::{Library, decode_timestamp, encode_timestamp};
use crate::domain::Book;
use crate::error::{Error, Result};
use rusqlite::{Row, params};

const BOOK_COLUMNS: &str =
    "id, isbn, title, author, year, publisher, filepath, cover_path, added_at, updated_at";

type RawBook = (
    i64,
    Option<String>,
    String,
    Option<String>,
    Option<i32>,
    Option<String>,
    String,
    Option<String>,
    String,
    String,
);

fn raw_book(row: &Row) -> rusqlite::Result<RawBook> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn book_from_raw(raw: RawBook) -> Result<Book> {
    let (id, isbn, title, author, year, publisher, filepath, cover_path, added_at, updated_at) =
        raw;
    Ok(Book::from_stored(
        id,
        isbn,
        title,
        author,
        year,
        publisher,
        filepath,
        cover_path,
        decode_timestamp(&added_at)?,
        decode_timestamp(&updated_at)?,
    ))
}

impl Library {
    /// Inserts a book and assigns the generated id into it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] on constraint violation (duplicate
    /// `filepath` or `isbn`) or other store failure; on error the book's id
    /// stays unassigned.
    pub fn insert_book(&self, book: &mut Book) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO books (isbn, title, author, year, publisher, filepath, cover_path, added_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                book.isbn(),
                book.title(),
                book.author(),
                book.year(),
                book.publisher(),
                book.filepath(),
                book.cover_path(),
                encode_timestamp(book.added_at()),
                encode_timestamp(book.updated_at()),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        book.assign_id(id);
        Ok(id)
    }

    /// Retrieves a book by id.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `id <= 0`; [`Error::NotFound`] if no
    /// row matches.
    pub fn get_book(&self, id: i64) -> Result<Book> {
        if id <= 0 {
            return Err(Error::InvalidArgument(format!(
                "book id must be positive, got {id}"
            )));
        }

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"))?;

        match stmt.query_row([id], raw_book) {
            Ok(raw) => book_from_raw(raw),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(Error::NotFound(format!("book {id}")))
            }
            Err(e) => Err(Error::Database(e)),
        }
    }

    /// Lists every book, ordered by title ascending.
    ///
    /// An empty store yields an empty vec, not an error.
    pub fn list_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY title"))?;

        let rows = stmt.query_map([], raw_book)?;
        let mut books = Vec::new();
        for row in rows {
            books.push(book_from_raw(row?)?);
        }
        Ok(books)
    }

    /// Replaces a book's row by id (full-row replace).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the book has no assigned id.
    pub fn update_book(&self, book: &Book) -> Result<()> {
        if book.id() <= 0 {
            return Err(Error::InvalidArgument(
                "cannot update a book without an assigned id".to_string(),
            ));
        }

        self.conn.execute(
            "UPDATE books SET isbn = ?1, title = ?2, author = ?3, year = ?4,
             publisher = ?5, filepath = ?6, cover_path = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                book.isbn(),
                book.title(),
                book.author(),
                book.year(),
                book.publisher(),
                book.filepath(),
                book.cover_path(),
                encode_timestamp(book.updated_at()),
                book.id(),
            ],
        )?;
        Ok(())
    }

    /// Deletes a book; the cascade removes its notes, and the triggers
    /// remove their search-index entries.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `id <= 0`.
    pub fn delete_book(&self, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(Error::InvalidArgument(format!(
                "book id must be positive, got {id}"
            )));
        }

        self.conn
            .execute("DELETE FROM books WHERE id = ?1", [id])?;
        Ok(())
    }
}
