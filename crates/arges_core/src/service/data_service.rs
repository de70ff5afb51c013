//! Catalog use-case service.
//!
//! # Responsibility
//! - Own the catalog connection and the identifier generator.
//! - Implement list/add/remove operations and the two lazy joins on top of
//!   the entity store and relationship index.
//!
//! # Invariants
//! - Every link references a present book and a present author.
//! - Removing a book removes all of its links first.
//! - Adding a book under an existing author name reuses that author.
//! - Authors are never removed, even when their last book is.
//! - Each operation runs under one exclusive lock; mutations also run in one
//!   immediate transaction, so no caller observes a partial write.

use crate::db::{open_db_in_memory, DbError};
use crate::model::book::{Author, Book, BookId};
use crate::model::id::{IdGenerator, UuidGenerator};
use crate::repo::entity_store::{EntityStore, SqliteEntityStore};
use crate::repo::relationship_index::{RelationshipIndex, SqliteRelationshipIndex};
use crate::repo::RepoError;
use log::{error, info};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from catalog service operations.
///
/// Lookups that find nothing are not errors; they return `None` or an empty
/// list.
#[derive(Debug)]
pub enum ServiceError {
    /// Storage-layer failure.
    Repo(RepoError),
    /// A catalog invariant does not hold.
    InconsistentState(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent catalog state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Catalog service facade. Share it across threads through `Arc`.
pub struct DataService<G: IdGenerator = UuidGenerator> {
    conn: Mutex<Connection>,
    ids: G,
}

impl DataService<UuidGenerator> {
    /// Creates an empty catalog on a fresh in-memory database.
    pub fn in_memory() -> ServiceResult<Self> {
        Self::in_memory_with(UuidGenerator)
    }
}

impl<G: IdGenerator> DataService<G> {
    /// Wraps a bootstrapped connection (see [`crate::db::bootstrap_connection`]).
    pub fn new(conn: Connection, ids: G) -> Self {
        Self {
            conn: Mutex::new(conn),
            ids,
        }
    }

    /// Creates an empty catalog using the given identifier generator.
    pub fn in_memory_with(ids: G) -> ServiceResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::new(conn, ids))
    }

    /// Returns every book in insertion order.
    pub fn list_books(&self) -> ServiceResult<Vec<Book>> {
        self.read(|conn| Ok(SqliteEntityStore::new(conn, &self.ids).list_books()?))
    }

    /// Returns every author in insertion order, orphans included.
    pub fn list_authors(&self) -> ServiceResult<Vec<Author>> {
        self.read(|conn| Ok(SqliteEntityStore::new(conn, &self.ids).list_authors()?))
    }

    /// Resolves the author of `book`.
    ///
    /// Returns `None` when the book has no link, more than one link, or a
    /// link whose author is missing.
    pub fn resolve_author(&self, book: &Book) -> ServiceResult<Option<Author>> {
        self.read(|conn| {
            let index = SqliteRelationshipIndex::new(conn);
            let Some(author_id) = index.author_id_of(book.id)? else {
                return Ok(None);
            };
            Ok(SqliteEntityStore::new(conn, &self.ids).get_author(author_id)?)
        })
    }

    /// Resolves the books linked to `author`, in book insertion order.
    ///
    /// Link targets without a stored book are skipped.
    pub fn resolve_books(&self, author: &Author) -> ServiceResult<Vec<Book>> {
        self.read(|conn| {
            let book_ids = SqliteRelationshipIndex::new(conn).book_ids_of(author.id)?;
            if book_ids.is_empty() {
                return Ok(Vec::new());
            }
            let books = SqliteEntityStore::new(conn, &self.ids).list_books()?;
            Ok(books
                .into_iter()
                .filter(|book| book_ids.contains(&book.id))
                .collect())
        })
    }

    /// Adds a book and links it to the author named `author_name`.
    ///
    /// The author is reused on an exact name match and created otherwise.
    /// Author creation, book creation and linking commit together or not at
    /// all. The returned book carries no resolved author.
    pub fn add_book(&self, title: &str, author_name: &str) -> ServiceResult<Book> {
        let started_at = Instant::now();
        let (book, author_id, author_created) = self.write("book_add", |tx| {
            let store = SqliteEntityStore::new(tx, &self.ids);
            let index = SqliteRelationshipIndex::new(tx);

            let (author, created) = match store.find_author_by_name(author_name)? {
                Some(existing) => (existing, false),
                None => (store.add_author(author_name)?, true),
            };
            let book = store.add_book(title)?;
            index.link(book.id, author.id)?;
            Ok((book, author.id, created))
        })?;

        info!(
            "event=book_add module=service status=ok book_id={} author_id={} author_created={} duration_ms={}",
            book.id,
            author_id,
            author_created,
            started_at.elapsed().as_millis()
        );
        Ok(book)
    }

    /// Removes a book together with all of its links.
    ///
    /// Returns the removed book, or `None` (with nothing changed) when no
    /// book has that id. The book's author is kept.
    pub fn remove_book(&self, id: BookId) -> ServiceResult<Option<Book>> {
        let started_at = Instant::now();
        let removed = self.write("book_remove", |tx| {
            let store = SqliteEntityStore::new(tx, &self.ids);
            let index = SqliteRelationshipIndex::new(tx);

            let Some(book) = store.get_book(id)? else {
                return Ok(None);
            };
            let unlinked = index.unlink(book.id)?;
            if store.remove_book(book.id)?.is_none() {
                return Err(ServiceError::InconsistentState(format!(
                    "book {} vanished during removal",
                    book.id
                )));
            }
            Ok(Some((book, unlinked)))
        })?;

        info!(
            "event=book_remove module=service status=ok book_id={} found={} links_removed={} duration_ms={}",
            id,
            removed.is_some(),
            removed.as_ref().map_or(0, |(_, unlinked)| *unlinked),
            started_at.elapsed().as_millis()
        );
        Ok(removed.map(|(book, _)| book))
    }

    /// Checks that every link references a present book and author.
    ///
    /// # Errors
    /// - `InconsistentState` naming the first dangling link found.
    pub fn verify_integrity(&self) -> ServiceResult<()> {
        self.read(|conn| {
            let store = SqliteEntityStore::new(conn, &self.ids);
            for link in SqliteRelationshipIndex::new(conn).list_links()? {
                if store.get_book(link.book_id)?.is_none() {
                    return Err(ServiceError::InconsistentState(format!(
                        "link {} -> {} references a missing book",
                        link.book_id, link.author_id
                    )));
                }
                if store.get_author(link.author_id)?.is_none() {
                    return Err(ServiceError::InconsistentState(format!(
                        "link {} -> {} references a missing author",
                        link.book_id, link.author_id
                    )));
                }
            }
            Ok(())
        })
    }

    fn read<T>(&self, op: impl FnOnce(&Connection) -> ServiceResult<T>) -> ServiceResult<T> {
        let conn = self.conn.lock();
        op(&*conn)
    }

    fn write<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Transaction<'_>) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut conn = self.conn.lock();
        let result = run_in_transaction(&mut *conn, op);
        if let Err(err) = &result {
            error!("event={event} module=service status=error error={err}");
        }
        result
    }
}

fn run_in_transaction<T>(
    conn: &mut Connection,
    op: impl FnOnce(&Transaction<'_>) -> ServiceResult<T>,
) -> ServiceResult<T> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    // Dropping `tx` on the error path rolls every step back.
    let value = op(&tx)?;
    tx.commit()?;
    Ok(value)
}
