use arges_core::DataService;
use std::sync::Arc;
use std::thread;

const WRITERS: usize = 8;
const BOOKS_PER_WRITER: usize = 25;

#[test]
fn concurrent_adds_share_one_new_author() {
    let service = Arc::new(DataService::in_memory().unwrap());

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..BOOKS_PER_WRITER)
                    .map(|idx| {
                        service
                            .add_book(&format!("w{writer}-b{idx}"), "Shared Author")
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let books: Vec<_> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();

    let authors = service.list_authors().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(books.len(), WRITERS * BOOKS_PER_WRITER);
    assert_eq!(
        service.resolve_books(&authors[0]).unwrap().len(),
        WRITERS * BOOKS_PER_WRITER
    );
    service.verify_integrity().unwrap();
}

#[test]
fn readers_never_observe_a_book_without_its_author() {
    let service = Arc::new(DataService::in_memory().unwrap());

    let writer = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for idx in 0..200 {
                let book = service
                    .add_book(&format!("Book {idx}"), &format!("Author {}", idx % 7))
                    .unwrap();
                if idx % 4 == 0 {
                    service.remove_book(book.id).unwrap();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..50 {
                    service.verify_integrity().unwrap();
                    for book in service.list_books().unwrap() {
                        // A stored book always resolves; losing its author
                        // means it was removed in between.
                        if service.resolve_author(&book).unwrap().is_none() {
                            assert!(!service.list_books().unwrap().contains(&book));
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    service.verify_integrity().unwrap();
    assert_eq!(service.list_books().unwrap().len(), 150);
    assert_eq!(service.list_authors().unwrap().len(), 7);
}
