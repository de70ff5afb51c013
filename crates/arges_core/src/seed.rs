//! Sample catalog fixture.
//!
//! Three books by two authors, loaded through the regular `add_book` path so
//! the fixture obeys the same invariants as user data.

use crate::model::book::{Author, Book};
use crate::model::id::IdGenerator;
use crate::service::data_service::{DataService, ServiceResult};
use log::info;

/// `(title, author name)` pairs in load order.
pub const SAMPLE_BOOKS: &[(&str, &str)] = &[
    ("Title 1", "Foo Bar"),
    ("Title 2", "Foo Bar"),
    ("Title 3", "Hoge Hoge"),
];

/// Records created by [`load_sample_catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCatalog {
    /// Books in `SAMPLE_BOOKS` order.
    pub books: Vec<Book>,
    /// Authors in first-appearance order.
    pub authors: Vec<Author>,
}

/// Loads [`SAMPLE_BOOKS`] into `service`.
///
/// Intended for an empty catalog; on a populated one, authors with matching
/// names are reused like in any other `add_book` call.
pub fn load_sample_catalog<G: IdGenerator>(
    service: &DataService<G>,
) -> ServiceResult<SampleCatalog> {
    let mut books = Vec::with_capacity(SAMPLE_BOOKS.len());
    for (title, author_name) in SAMPLE_BOOKS {
        books.push(service.add_book(title, author_name)?);
    }

    let mut authors: Vec<Author> = Vec::new();
    for book in &books {
        if let Some(author) = service.resolve_author(book)? {
            if !authors.iter().any(|known| known.id == author.id) {
                authors.push(author);
            }
        }
    }

    info!(
        "event=seed_load module=seed status=ok books={} authors={}",
        books.len(),
        authors.len()
    );
    Ok(SampleCatalog { books, authors })
}
