use arges_core::db::open_db_in_memory;
use arges_core::{
    Author, Book, EntityStore, Link, RelationshipIndex, SequentialIdGenerator, SqliteEntityStore,
    SqliteRelationshipIndex,
};
use rusqlite::Connection;
use std::collections::BTreeSet;
use uuid::Uuid;

struct Fixture {
    books: Vec<Book>,
    authors: Vec<Author>,
}

/// Books b1..b3, authors a1 ("Foo Bar") and a2 ("Hoge Hoge"),
/// links (b1,a1), (b2,a1), (b3,a2).
fn seed(conn: &Connection, ids: &SequentialIdGenerator) -> Fixture {
    let store = SqliteEntityStore::new(conn, ids);
    let index = SqliteRelationshipIndex::new(conn);
    let books: Vec<Book> = ["Title 1", "Title 2", "Title 3"]
        .into_iter()
        .map(|title| store.add_book(title).unwrap())
        .collect();
    let authors: Vec<Author> = ["Foo Bar", "Hoge Hoge"]
        .into_iter()
        .map(|name| store.add_author(name).unwrap())
        .collect();
    index.link(books[0].id, authors[0].id).unwrap();
    index.link(books[1].id, authors[0].id).unwrap();
    index.link(books[2].id, authors[1].id).unwrap();
    Fixture { books, authors }
}

#[test]
fn lookups_answer_both_directions() {
    let conn = open_db_in_memory().unwrap();
    let ids = SequentialIdGenerator::new();
    let fx = seed(&conn, &ids);
    let index = SqliteRelationshipIndex::new(&conn);

    let expected: BTreeSet<_> = [fx.books[0].id, fx.books[1].id].into_iter().collect();
    assert_eq!(index.book_ids_of(fx.authors[0].id).unwrap(), expected);
    assert_eq!(
        index.author_id_of(fx.books[2].id).unwrap(),
        Some(fx.authors[1].id)
    );
}

#[test]
fn unknown_ids_resolve_to_absent() {
    let conn = open_db_in_memory().unwrap();
    let ids = SequentialIdGenerator::new();
    seed(&conn, &ids);
    let index = SqliteRelationshipIndex::new(&conn);

    assert_eq!(index.author_id_of(Uuid::from_u128(777)).unwrap(), None);
    assert!(index.book_ids_of(Uuid::from_u128(778)).unwrap().is_empty());
}

#[test]
fn duplicate_links_make_author_ambiguous() {
    let conn = open_db_in_memory().unwrap();
    let ids = SequentialIdGenerator::new();
    let fx = seed(&conn, &ids);
    let index = SqliteRelationshipIndex::new(&conn);

    index.link(fx.books[2].id, fx.authors[0].id).unwrap();
    assert_eq!(index.author_id_of(fx.books[2].id).unwrap(), None);

    // Same pair twice is still more than one link.
    index.link(fx.books[0].id, fx.authors[0].id).unwrap();
    assert_eq!(index.author_id_of(fx.books[0].id).unwrap(), None);
}

#[test]
fn unlink_removes_every_link_of_the_book() {
    let conn = open_db_in_memory().unwrap();
    let ids = SequentialIdGenerator::new();
    let fx = seed(&conn, &ids);
    let index = SqliteRelationshipIndex::new(&conn);
    index.link(fx.books[0].id, fx.authors[1].id).unwrap();

    assert_eq!(index.unlink(fx.books[0].id).unwrap(), 2);
    assert_eq!(index.unlink(fx.books[0].id).unwrap(), 0);
    assert_eq!(index.author_id_of(fx.books[0].id).unwrap(), None);
    assert_eq!(
        index.list_links().unwrap(),
        vec![
            Link {
                book_id: fx.books[1].id,
                author_id: fx.authors[0].id,
            },
            Link {
                book_id: fx.books[2].id,
                author_id: fx.authors[1].id,
            },
        ]
    );
}

#[test]
fn link_to_missing_entity_is_rejected_by_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let ids = SequentialIdGenerator::new();
    let fx = seed(&conn, &ids);
    let index = SqliteRelationshipIndex::new(&conn);

    assert!(index.link(Uuid::from_u128(500), fx.authors[0].id).is_err());
    assert!(index.link(fx.books[0].id, Uuid::from_u128(501)).is_err());
    assert_eq!(index.list_links().unwrap().len(), 3);
}
