//! End-to-end tests of the public library surface.

use booknote_core::{Book, Error, Library, Note};
use tempfile::tempdir;

#[test]
fn full_workflow_add_annotate_search_delete() {
    let dir = tempdir().unwrap();
    let library = Library::open(&dir.path().join("library.db")).unwrap();

    // Add a book with metadata
    let mut book = Book::new("The Little Schemer", "/books/little-schemer.pdf").unwrap();
    book.set_author(Some("Friedman and Felleisen"));
    book.set_isbn(Some("9780262560993"));
    book.set_year(Some(1995)).unwrap();
    let book_id = library.insert_book(&mut book).unwrap();

    // Annotate it
    let mut note = Note::new(
        book_id,
        None,
        "The Ten Commandments\nRecursion always asks about the rest.",
        Some(23),
    )
    .unwrap();
    library.insert_note(&mut note).unwrap();
    assert_eq!(note.title(), "The Ten Commandments");

    // Search finds it
    let hits = library.search_notes("recursion").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].book_id(), book_id);
    assert_eq!(hits[0].page_number(), Some(23));

    // Deleting the book cascades to the note and the index
    library.delete_book(book_id).unwrap();
    assert!(library.search_notes("recursion").unwrap().is_empty());
    assert!(matches!(library.get_book(book_id), Err(Error::NotFound(_))));
}

#[test]
fn book_round_trip_preserves_every_field() {
    let library = Library::open_in_memory().unwrap();

    let mut book = Book::new("Purely Functional Data Structures", "/books/pfds.pdf").unwrap();
    book.set_isbn(Some("9780521663502"));
    book.set_author(Some("Chris Okasaki"));
    book.set_year(Some(1998)).unwrap();
    book.set_publisher(Some("Cambridge University Press"));
    book.set_cover_path(Some("/cache/covers/pfds.jpg"));

    let id = library.insert_book(&mut book).unwrap();
    let fetched = library.get_book(id).unwrap();

    assert_eq!(fetched, book);
}

#[test]
fn duplicate_filepath_is_rejected() {
    let library = Library::open_in_memory().unwrap();

    let mut first = Book::new("First", "/books/shared.pdf").unwrap();
    library.insert_book(&mut first).unwrap();

    let mut second = Book::new("Second", "/books/shared.pdf").unwrap();
    let result = library.insert_book(&mut second);

    assert!(matches!(result, Err(Error::Database(_))));
    assert_eq!(second.id(), 0);
}

#[test]
fn empty_library_lists_no_books() {
    let library = Library::open_in_memory().unwrap();
    assert!(library.list_books().unwrap().is_empty());
}

#[test]
fn books_list_lexicographically_by_title() {
    let library = Library::open_in_memory().unwrap();
    for (title, path) in [
        ("Types and Programming Languages", "/books/tapl.pdf"),
        ("Compilers", "/books/dragon.pdf"),
        ("Operating Systems", "/books/ostep.pdf"),
    ] {
        let mut book = Book::new(title, path).unwrap();
        library.insert_book(&mut book).unwrap();
    }

    let titles: Vec<String> = library
        .list_books()
        .unwrap()
        .iter()
        .map(|b| b.title().to_string())
        .collect();

    assert_eq!(
        titles,
        vec![
            "Compilers",
            "Operating Systems",
            "Types and Programming Languages"
        ]
    );
}

#[test]
fn long_single_line_note_gets_truncated_title() {
    let library = Library::open_in_memory().unwrap();
    let mut book = Book::new("Host", "/books/host.pdf").unwrap();
    let book_id = library.insert_book(&mut book).unwrap();

    let content: String = "x".repeat(70);
    let mut note = Note::new(book_id, None, content, None).unwrap();
    library.insert_note(&mut note).unwrap();

    let stored = &library.list_notes(book_id).unwrap()[0];
    assert_eq!(stored.title().chars().count(), 50);
    assert!(stored.title().ends_with("..."));
}

// Opens a database laid out by a v1 release and verifies it migrates
// forward without data loss.
#[test]
fn v1_store_on_disk_migrates_to_version_3() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("old-library.db");

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                isbn TEXT UNIQUE,
                title TEXT NOT NULL,
                author TEXT,
                year INTEGER,
                publisher TEXT,
                filepath TEXT NOT NULL UNIQUE,
                added_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
                content TEXT NOT NULL,
                page_number INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL);
            CREATE VIRTUAL TABLE notes_fts USING fts5(
                content, content='notes', content_rowid='id'
            );
            CREATE TRIGGER notes_ai AFTER INSERT ON notes BEGIN
                INSERT INTO notes_fts(rowid, content) VALUES (new.id, new.content);
            END;
            CREATE TRIGGER notes_ad AFTER DELETE ON notes BEGIN
                INSERT INTO notes_fts(notes_fts, rowid, content)
                VALUES ('delete', old.id, old.content);
            END;
            CREATE TRIGGER notes_au AFTER UPDATE ON notes BEGIN
                INSERT INTO notes_fts(notes_fts, rowid, content)
                VALUES ('delete', old.id, old.content);
                INSERT INTO notes_fts(rowid, content) VALUES (new.id, new.content);
            END;
            INSERT INTO metadata (key, value) VALUES ('schema_version', '1');
            INSERT INTO books (title, filepath, added_at, updated_at)
            VALUES ('Legacy Book', '/legacy.pdf',
                    '2020-06-01T00:00:00.000000Z', '2020-06-01T00:00:00.000000Z');
            INSERT INTO notes (book_id, content, created_at, updated_at)
            VALUES (1, 'legacy annotation',
                    '2020-06-02T00:00:00.000000Z', '2020-06-02T00:00:00.000000Z');",
        )
        .unwrap();
    }

    let library = Library::open(&db_path).unwrap();

    assert_eq!(library.schema_version().unwrap(), 3);

    let books = library.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title(), "Legacy Book");
    assert_eq!(books[0].cover_path(), None, "migrated rows get NULL cover");

    let notes = library.list_notes(books[0].id()).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title(), "Untitled", "migrated notes take the default title");
    assert_eq!(notes[0].content(), "legacy annotation");

    // The pre-migration note is still searchable
    assert_eq!(library.search_notes("legacy").unwrap().len(), 1);
}

// A store stamped v2 whose books table already has cover_path makes the
// v3 step fail; the stored version must not move past the failure.
#[test]
fn failed_migration_leaves_on_disk_version_untouched() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("stuck-library.db");

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                isbn TEXT UNIQUE,
                title TEXT NOT NULL,
                author TEXT,
                year INTEGER,
                publisher TEXT,
                filepath TEXT NOT NULL UNIQUE,
                added_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                cover_path TEXT
            );
            CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
                title TEXT NOT NULL DEFAULT 'Untitled',
                content TEXT NOT NULL,
                page_number INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL);
            INSERT INTO metadata (key, value) VALUES ('schema_version', '2');",
        )
        .unwrap();
    }

    assert!(Library::open(&db_path).is_err(), "open should surface the failed step");

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let version: String = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(version, "2", "version must stay at the last good step");
}

#[test]
fn transaction_groups_book_and_first_note() {
    let mut library = Library::open_in_memory().unwrap();

    let tx = library.transaction().unwrap();
    tx.execute(
        "INSERT INTO books (title, filepath, added_at, updated_at)
         VALUES ('Atomic', '/books/atomic.pdf',
                 '2024-01-01T00:00:00.000000Z', '2024-01-01T00:00:00.000000Z')",
        [],
    )
    .unwrap();
    tx.execute(
        "INSERT INTO notes (book_id, title, content, created_at, updated_at)
         VALUES (1, 'first', 'inserted together',
                 '2024-01-01T00:00:00.000000Z', '2024-01-01T00:00:00.000000Z')",
        [],
    )
    .unwrap();
    tx.commit().unwrap();

    assert_eq!(library.list_books().unwrap().len(), 1);
    assert_eq!(library.list_notes(1).unwrap().len(), 1);
}
