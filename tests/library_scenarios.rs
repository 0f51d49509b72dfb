//! Scenario tests for the `Library` facade.

mod common;

use bibcat::{BookCollection, CatalogEntry, CatalogError, Library};
use common::{create_sample_books, make_printed_book};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_added_book_is_found_once() {
    let mut library = Library::from_books(create_sample_books()).unwrap();
    let book = make_printed_book("new-1", "Mikhail Bulgakov", 1967);
    library.add_book(book.clone()).unwrap();

    assert_eq!(**library.get_by_isbn("new-1").unwrap(), book);
    let occurrences = library.books().isbns().filter(|isbn| *isbn == "new-1").count();
    assert_eq!(occurrences, 1);
    library.verify().unwrap();
}

#[test]
fn test_removed_book_is_gone_everywhere() {
    let mut library = Library::from_books(create_sample_books()).unwrap();
    let removed = library.remove_book("978-1").unwrap();
    assert_eq!(removed.title(), "Anna Karenina");

    assert!(!library.books().contains("978-1"));
    assert!(!library.index().contains("978-1"));
    assert!(matches!(
        library.get_by_isbn("978-1"),
        Err(CatalogError::NotFound(ref isbn)) if isbn == "978-1"
    ));
    assert_eq!(library.find_by_author("leo tolstoy").len(), 1);
    assert!(library.find_by_year(1878).is_empty());
    library.verify().unwrap();
}

#[test]
fn test_empty_library_remove_random_reports_empty() {
    let mut library = Library::new();
    let mut rng = StdRng::seed_from_u64(0);
    let err = library.remove_random(&mut rng).unwrap_err();
    assert!(matches!(err, CatalogError::EmptyCollection));
    assert!(err.is_recoverable());
    assert!(library.is_empty());
    assert!(library.index().is_empty());
}

#[test]
fn test_author_match_ignores_case() {
    let mut library = Library::new();
    library
        .add_book(make_printed_book("123", "Test Author", 2000))
        .unwrap();
    let matches = library.find_by_author("tEST aUTHOR");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].isbn(), "123");
}

#[test]
fn test_year_lookup_returns_only_that_year() {
    let mut library = Library::new();
    library
        .add_book(make_printed_book("010", "Author A", 2001))
        .unwrap();
    library
        .add_book(make_printed_book("020", "Author B", 2002))
        .unwrap();
    let matches = library.find_by_year(2002);
    assert_eq!(matches.isbns().collect::<Vec<_>>(), ["020"]);
}

#[test]
fn test_double_remove_fails_second_time() {
    let mut library = Library::new();
    library
        .add_book(make_printed_book("123", "Test Author", 2000))
        .unwrap();
    library.remove_book("123").unwrap();
    assert!(matches!(
        library.remove_book("123"),
        Err(CatalogError::NotFound(_))
    ));
    library.verify().unwrap();
}

#[test]
fn test_refresh_twice_matches_once() {
    let mut library = Library::from_books(create_sample_books()).unwrap();
    library.books_mut().remove("978-3").unwrap();

    library.refresh_indexes();
    let once = library.index().clone();
    library.refresh_indexes();
    assert_eq!(library.index(), &once);
    library.verify().unwrap();
}

#[test]
fn test_genre_scan_keeps_catalogue_order() {
    let library = Library::from_books(create_sample_books()).unwrap();
    let novels = library.find_by_genre("novel");
    assert_eq!(
        novels.isbns().collect::<Vec<_>>(),
        ["978-0", "978-1", "978-2"]
    );
}

#[test]
fn test_lookup_results_are_independent_collections() {
    let library = Library::from_books(create_sample_books()).unwrap();
    let mut tolstoy = library.find_by_author("Leo Tolstoy");
    tolstoy.remove("978-0").unwrap();
    assert_eq!(library.find_by_author("Leo Tolstoy").len(), 2);

    let combined: BookCollection = &tolstoy + library.books();
    assert_eq!(combined.len(), library.len());
}

#[test]
fn test_seeded_remove_random_is_reproducible() {
    let drain = |seed: u64| {
        let mut library = Library::from_books(create_sample_books()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut order = Vec::new();
        while let Ok(book) = library.remove_random(&mut rng) {
            order.push(book.isbn().to_string());
        }
        order
    };
    assert_eq!(drain(21), drain(21));
}
