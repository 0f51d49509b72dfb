//! Common test helpers and utilities shared across test suite.

use bibcat::{Book, CoverType, FileFormat};

/// Creates a hardcover printed book with the given catalog attributes.
pub fn make_printed_book(isbn: &str, author: &str, year: i32) -> Book {
    Book::builder(isbn)
        .title("Test")
        .author(author)
        .year(year)
        .genre("genre")
        .printed(150, CoverType::Hardcover)
        .build()
}

/// Creates a small mixed catalog of printed and digital books.
///
/// Two books share an author and two share a year so bucket handling gets
/// exercised.
#[allow(dead_code)]
pub fn create_sample_books() -> Vec<Book> {
    vec![
        Book::printed("978-0", "War and Peace", "Leo Tolstoy", 1869, "novel", 1225),
        Book::printed("978-1", "Anna Karenina", "Leo Tolstoy", 1878, "novel", 864),
        Book::digital(
            "978-2",
            "Crime and Punishment",
            "Fyodor Dostoevsky",
            1866,
            "Novel",
            FileFormat::Epub,
            2.4,
        ),
        Book::digital(
            "978-3",
            "The Idiot",
            "Fyodor Dostoevsky",
            1869,
            "classic",
            FileFormat::Pdf,
            3.1,
        ),
        Book::builder("978-4")
            .title("Eugene Onegin")
            .author("Alexander Pushkin")
            .year(1833)
            .genre("poetry")
            .printed(240, CoverType::Paperback)
            .build(),
    ]
}
