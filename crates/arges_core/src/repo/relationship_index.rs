//! Relationship index contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `book_authors` join table.
//! - Answer book→author and author→books lookups.
//!
//! # Invariants
//! - The index never checks that linked entities exist; the service does,
//!   with foreign keys as the last line.
//! - A book with more than one link has no definitive author.

use crate::model::book::{AuthorId, BookId};
use crate::model::link::Link;
use crate::repo::{parse_entity_id, RepoResult};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

/// Storage contract for the book-to-author join table.
pub trait RelationshipIndex {
    /// Appends one link. Duplicates are not rejected.
    fn link(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<()>;
    /// Removes every link of `book_id` and returns how many were removed.
    fn unlink(&self, book_id: BookId) -> RepoResult<usize>;
    /// Returns the single author linked to `book_id`.
    ///
    /// Zero links and more than one link both resolve to `None`.
    fn author_id_of(&self, book_id: BookId) -> RepoResult<Option<AuthorId>>;
    fn book_ids_of(&self, author_id: AuthorId) -> RepoResult<BTreeSet<BookId>>;
    /// Snapshot of every link in insertion order.
    fn list_links(&self) -> RepoResult<Vec<Link>>;
}

/// SQLite-backed relationship index.
pub struct SqliteRelationshipIndex<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRelationshipIndex<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl RelationshipIndex for SqliteRelationshipIndex<'_> {
    fn link(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO book_authors (book_id, author_id) VALUES (?1, ?2);",
            params![book_id.to_string(), author_id.to_string()],
        )?;
        Ok(())
    }

    fn unlink(&self, book_id: BookId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM book_authors WHERE book_id = ?1;",
            [book_id.to_string()],
        )?;
        Ok(removed)
    }

    fn author_id_of(&self, book_id: BookId) -> RepoResult<Option<AuthorId>> {
        // Two rows are enough to tell "unique" from "ambiguous".
        let mut stmt = self.conn.prepare(
            "SELECT author_id
             FROM book_authors
             WHERE book_id = ?1
             ORDER BY seq ASC
             LIMIT 2;",
        )?;
        let mut rows = stmt.query([book_id.to_string()])?;
        let mut matches = Vec::with_capacity(2);
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            matches.push(parse_entity_id(&value, "book_authors.author_id")?);
        }

        match matches.as_slice() {
            [author_id] => Ok(Some(*author_id)),
            _ => Ok(None),
        }
    }

    fn book_ids_of(&self, author_id: AuthorId) -> RepoResult<BTreeSet<BookId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT book_id FROM book_authors WHERE author_id = ?1;")?;
        let mut rows = stmt.query([author_id.to_string()])?;
        let mut book_ids = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            book_ids.insert(parse_entity_id(&value, "book_authors.book_id")?);
        }
        Ok(book_ids)
    }

    fn list_links(&self) -> RepoResult<Vec<Link>> {
        let mut stmt = self
            .conn
            .prepare("SELECT book_id, author_id FROM book_authors ORDER BY seq ASC;")?;
        let mut rows = stmt.query([])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            let book_id: String = row.get("book_id")?;
            let author_id: String = row.get("author_id")?;
            links.push(Link {
                book_id: parse_entity_id(&book_id, "book_authors.book_id")?,
                author_id: parse_entity_id(&author_id, "book_authors.author_id")?,
            });
        }
        Ok(links)
    }
}
