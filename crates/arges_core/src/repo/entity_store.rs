//! Entity store contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `books` and `authors` collections.
//! - Assign fresh identifiers when entities are created.
//!
//! # Invariants
//! - Listings are ordered by insertion (`seq ASC`).
//! - Author name lookup is an exact, case-sensitive comparison.
//! - Removing a missing book is a no-op that reports `None`.

use crate::model::book::{Author, AuthorId, Book, BookId};
use crate::model::id::IdGenerator;
use crate::repo::{parse_entity_id, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Storage contract for the two entity collections.
pub trait EntityStore {
    /// Creates and appends a book with a fresh identifier.
    fn add_book(&self, title: &str) -> RepoResult<Book>;
    /// Creates and appends an author with a fresh identifier.
    fn add_author(&self, name: &str) -> RepoResult<Author>;
    /// Removes one book and returns it, or `None` when no book matches.
    fn remove_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn list_authors(&self) -> RepoResult<Vec<Author>>;
    /// Returns the earliest inserted author whose name equals `name` exactly.
    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
}

/// SQLite-backed entity store.
///
/// Borrows either a plain connection or an open transaction, so the service
/// can compose several stores inside one atomic unit.
pub struct SqliteEntityStore<'a, G: IdGenerator> {
    conn: &'a Connection,
    ids: &'a G,
}

impl<'a, G: IdGenerator> SqliteEntityStore<'a, G> {
    pub fn new(conn: &'a Connection, ids: &'a G) -> Self {
        Self { conn, ids }
    }
}

impl<G: IdGenerator> EntityStore for SqliteEntityStore<'_, G> {
    fn add_book(&self, title: &str) -> RepoResult<Book> {
        let book = Book::with_id(self.ids.next_id(), title);
        self.conn.execute(
            "INSERT INTO books (id, title) VALUES (?1, ?2);",
            params![book.id.to_string(), book.title.as_str()],
        )?;
        Ok(book)
    }

    fn add_author(&self, name: &str) -> RepoResult<Author> {
        let author = Author::with_id(self.ids.next_id(), name);
        self.conn.execute(
            "INSERT INTO authors (id, name) VALUES (?1, ?2);",
            params![author.id.to_string(), author.name.as_str()],
        )?;
        Ok(author)
    }

    fn remove_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let Some(book) = self.get_book(id)? else {
            return Ok(None);
        };
        self.conn
            .execute("DELETE FROM books WHERE id = ?1;", [id.to_string()])?;
        Ok(Some(book))
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title FROM books WHERE id = ?1;",
                [id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(|(id, title)| parse_book(&id, title)).transpose()
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name FROM authors WHERE id = ?1;",
                [id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(|(id, name)| parse_author(&id, name)).transpose()
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM books ORDER BY seq ASC;")?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            books.push(parse_book(&id, row.get("title")?)?);
        }
        Ok(books)
    }

    fn list_authors(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM authors ORDER BY seq ASC;")?;
        let mut rows = stmt.query([])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            authors.push(parse_author(&id, row.get("name")?)?);
        }
        Ok(authors)
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        // Default BINARY collation keeps the comparison exact.
        let row = self
            .conn
            .query_row(
                "SELECT id, name
                 FROM authors
                 WHERE name = ?1
                 ORDER BY seq ASC
                 LIMIT 1;",
                [name],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(|(id, name)| parse_author(&id, name)).transpose()
    }
}

fn parse_book(id: &str, title: String) -> RepoResult<Book> {
    Ok(Book::with_id(parse_entity_id(id, "books.id")?, title))
}

fn parse_author(id: &str, name: String) -> RepoResult<Author> {
    Ok(Author::with_id(parse_entity_id(id, "authors.id")?, name))
}
