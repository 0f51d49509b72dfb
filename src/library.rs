//! The catalog facade.
//!
//! A [`Library`] owns one [`BookCollection`] and one [`IndexDict`] and keeps
//! them holding exactly the same set of ISBNs. Every mutating operation goes
//! through both structures; nothing is changed when an operation fails.
//!
//! # Examples
//!
//! ```
//! use bibcat::{Book, Library};
//!
//! # fn main() -> bibcat::Result<()> {
//! let mut library = Library::new();
//! library.add_book(Book::printed("123", "War and Peace", "Leo Tolstoy", 1869, "novel", 1225))?;
//!
//! assert_eq!(library.find_by_author("leo tolstoy").len(), 1);
//! assert_eq!(library.get_by_isbn("123")?.year(), 1869);
//!
//! library.remove_book("123")?;
//! assert!(library.get_by_isbn("123").is_err());
//! # Ok(())
//! # }
//! ```

use crate::book::{AsIsbn, CatalogEntry, SharedBook};
use crate::collection::BookCollection;
use crate::error::{CatalogError, Result};
use crate::index::{IndexDict, IndexField};
use indexmap::IndexSet;
use rand::Rng;
use std::sync::Arc;

/// An ordered book collection with consistent secondary indexes.
#[derive(Debug, Clone, Default)]
pub struct Library {
    books: BookCollection,
    index: IndexDict,
}

impl Library {
    /// Create an empty library
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library holding `books`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateIsbn`] if `books` repeats an ISBN.
    pub fn from_books<I>(books: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<SharedBook>,
    {
        let mut library = Library::new();
        for book in books {
            library.add_book(book)?;
        }
        Ok(library)
    }

    /// Number of catalogued books
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the library is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Whether a book with this ISBN is catalogued.
    #[must_use]
    pub fn contains<K: AsIsbn + ?Sized>(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// The books in catalogue order
    #[must_use]
    pub fn books(&self) -> &BookCollection {
        &self.books
    }

    /// Mutable access to the collection, bypassing the indexes.
    ///
    /// Any change made through this reference leaves the indexes stale.
    /// Call [`refresh_indexes`](Self::refresh_indexes) afterwards.
    pub fn books_mut(&mut self) -> &mut BookCollection {
        &mut self.books
    }

    /// The secondary indexes
    #[must_use]
    pub fn index(&self) -> &IndexDict {
        &self.index
    }

    /// Catalogue a book.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateIsbn`] if the ISBN is already
    /// catalogued. The library is left unchanged.
    pub fn add_book(&mut self, book: impl Into<SharedBook>) -> Result<()> {
        let book = book.into();
        if self.index.contains(&book) {
            return Err(CatalogError::DuplicateIsbn(book.isbn().to_string()));
        }
        log::debug!("Adding {} [{}]", book.short_label(), book.isbn());
        self.books.add(Arc::clone(&book));
        self.index.add(book);
        Ok(())
    }

    /// Remove a book by ISBN from both the collection and the indexes.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no book has that ISBN, or
    /// [`CatalogError::IndexDesync`] if only one of the two structures holds
    /// it or the collection holds it more than once. Nothing is removed on
    /// error.
    ///
    /// # Panics
    ///
    /// In debug builds, panics when the collection and the indexes disagree.
    pub fn remove_book<K: AsIsbn + ?Sized>(&mut self, key: &K) -> Result<SharedBook> {
        let isbn = key.as_isbn();
        match self.books.position(isbn) {
            Some(pos) => self.detach(pos),
            None if self.index.contains(isbn) => Err(self.desync(format!(
                "ISBN {isbn} is indexed but not in the collection"
            ))),
            None => Err(CatalogError::NotFound(isbn.to_string())),
        }
    }

    /// Remove a uniformly random book from both structures.
    ///
    /// Consumes the same randomness as [`BookCollection::pop_random`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyCollection`] when the library is empty, or
    /// [`CatalogError::IndexDesync`] if the chosen book is not indexed or its
    /// ISBN appears more than once in the collection.
    ///
    /// # Panics
    ///
    /// In debug builds, panics when the collection and the indexes disagree.
    pub fn remove_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SharedBook> {
        let pos = self.books.random_position(rng)?;
        self.detach(pos)
    }

    /// Rebuild the indexes from the current collection.
    pub fn refresh_indexes(&mut self) {
        self.index.rebuild(&self.books);
        log::debug!("Rebuilt indexes for {} books", self.index.len());
    }

    /// Books by an author, matched case-insensitively
    #[must_use]
    pub fn find_by_author(&self, author: &str) -> BookCollection {
        self.index.get_by_author(author)
    }

    /// Books published in `year`
    #[must_use]
    pub fn find_by_year(&self, year: i32) -> BookCollection {
        self.index.get_by_year(year)
    }

    /// Run a field-keyed index query
    #[must_use]
    pub fn find(&self, field: &IndexField) -> BookCollection {
        self.index.query(field)
    }

    /// Books of a genre, matched case-insensitively, in catalogue order.
    ///
    /// This is a linear scan; genres are not indexed.
    #[must_use]
    pub fn find_by_genre(&self, genre: &str) -> BookCollection {
        let genre = genre.to_lowercase();
        self.books
            .filtered(|book| book.genre().to_lowercase() == genre)
    }

    /// Books whose title or author contains `keyword`, in catalogue order.
    #[must_use]
    pub fn search(&self, keyword: &str) -> BookCollection {
        self.books.filtered(|book| book.matches_keyword(keyword))
    }

    /// Look up a book by exact ISBN.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no book has that ISBN.
    pub fn get_by_isbn<K: AsIsbn + ?Sized>(&self, key: &K) -> Result<&SharedBook> {
        self.index.lookup(key)
    }

    /// Check that the collection and the indexes hold the same set of books.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IndexDesync`] describing the first mismatch.
    pub fn verify(&self) -> Result<()> {
        let mut seen = IndexSet::with_capacity(self.books.len());
        for isbn in self.books.isbns() {
            if !seen.insert(isbn) {
                return Err(CatalogError::IndexDesync(format!(
                    "ISBN {isbn} appears more than once in the collection"
                )));
            }
            if !self.index.contains(isbn) {
                return Err(CatalogError::IndexDesync(format!(
                    "ISBN {isbn} is in the collection but not indexed"
                )));
            }
        }
        if let Some(isbn) = self.index.isbns().find(|isbn| !seen.contains(isbn)) {
            return Err(CatalogError::IndexDesync(format!(
                "ISBN {isbn} is indexed but not in the collection"
            )));
        }
        self.index.check_consistency()
    }

    /// Remove the book at `pos` from both structures, checking the index first.
    fn detach(&mut self, pos: usize) -> Result<SharedBook> {
        let Some(isbn) = self.books.get(pos).map(|book| book.isbn().to_string()) else {
            return Err(CatalogError::EmptyCollection);
        };
        if !self.index.contains(&isbn) {
            return Err(self.desync(format!(
                "ISBN {isbn} is in the collection but not the index"
            )));
        }
        if self.books.isbns().filter(|other| *other == isbn).count() > 1 {
            return Err(self.desync(format!(
                "ISBN {isbn} appears more than once in the collection"
            )));
        }

        let removed = self
            .books
            .remove_at(pos)
            .ok_or_else(|| CatalogError::NotFound(isbn.clone()))?;
        self.index.remove(&isbn)?;
        log::debug!("Removed {} [{isbn}]", removed.short_label());
        Ok(removed)
    }

    fn desync(&self, message: String) -> CatalogError {
        log::error!("{message} ({} collected, {} indexed)", self.books.len(), self.index.len());
        if cfg!(debug_assertions) {
            panic!("{message}");
        }
        CatalogError::IndexDesync(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Book, CoverType, FileFormat};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_printed_book(isbn: &str, author: &str, year: i32, genre: &str) -> Book {
        Book::builder(isbn)
            .title("Test")
            .author(author)
            .year(year)
            .genre(genre)
            .printed(150, CoverType::Hardcover)
            .build()
    }

    #[test]
    fn test_add_lookup_remove() {
        let mut library = Library::new();
        library
            .add_book(make_printed_book("123", "Test Author", 2000, "genre"))
            .unwrap();
        assert_eq!(library.get_by_isbn("123").unwrap().author(), "Test Author");
        assert!(library.find_by_author("Test Author").contains("123"));

        library.remove_book("123").unwrap();
        assert!(matches!(
            library.get_by_isbn("123"),
            Err(CatalogError::NotFound(_))
        ));
        library.refresh_indexes();
        assert!(library.is_empty());
        library.verify().unwrap();
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut library = Library::new();
        library.add_book(make_printed_book("1", "A", 2000, "g")).unwrap();
        let err = library
            .add_book(make_printed_book("1", "B", 2001, "h"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateIsbn(ref isbn) if isbn == "1"));
        assert_eq!(library.len(), 1);
        assert_eq!(library.get_by_isbn("1").unwrap().author(), "A");
        assert!(library.find_by_year(2001).is_empty());
    }

    #[test]
    fn test_from_books_rejects_duplicates() {
        let books = vec![
            make_printed_book("1", "A", 2000, "g"),
            make_printed_book("1", "B", 2000, "g"),
        ];
        assert!(matches!(
            Library::from_books(books),
            Err(CatalogError::DuplicateIsbn(_))
        ));
    }

    #[test]
    fn test_find_by_genre_scans_in_order() {
        let library = Library::from_books(vec![
            make_printed_book("1", "A", 2000, "Novel"),
            make_printed_book("2", "B", 2000, "poetry"),
            make_printed_book("3", "C", 2000, "novel"),
        ])
        .unwrap();
        let novels = library.find_by_genre("NOVEL");
        assert_eq!(novels.isbns().collect::<Vec<_>>(), ["1", "3"]);
        assert!(library.find_by_genre("nov").is_empty());
    }

    #[test]
    fn test_search_keyword() {
        let library = Library::from_books(vec![
            Book::printed("1", "War and Peace", "Leo Tolstoy", 1869, "novel", 1225),
            Book::digital("2", "Eugene Onegin", "Alexander Pushkin", 1833, "poetry", FileFormat::Pdf, 2.0),
        ])
        .unwrap();
        assert_eq!(library.search("peace").isbns().collect::<Vec<_>>(), ["1"]);
        assert_eq!(library.search("PUSHKIN").isbns().collect::<Vec<_>>(), ["2"]);
        assert!(library.search("Bulgakov").is_empty());
    }

    #[test]
    fn test_remove_random_empty() {
        let mut library = Library::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            library.remove_random(&mut rng),
            Err(CatalogError::EmptyCollection)
        ));
        assert!(library.is_empty());
        assert!(library.index().is_empty());
    }

    #[test]
    fn test_remove_random_matches_pop_random() {
        let books: Vec<Book> = (0..8)
            .map(|n| make_printed_book(&n.to_string(), "A", 2000 + n, "g"))
            .collect();
        let mut library = Library::from_books(books.clone()).unwrap();
        let mut collection: BookCollection = books.into_iter().collect();

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        while !library.is_empty() {
            let from_library = library.remove_random(&mut rng_a).unwrap();
            let from_collection = collection.pop_random(&mut rng_b).unwrap();
            assert_eq!(from_library, from_collection);
            library.verify().unwrap();
        }
    }

    #[test]
    fn test_refresh_heals_direct_mutation() {
        let mut library = Library::new();
        library.add_book(make_printed_book("1", "A", 2000, "g")).unwrap();
        library
            .books_mut()
            .add(make_printed_book("2", "B", 2001, "g"));

        assert!(matches!(library.verify(), Err(CatalogError::IndexDesync(_))));
        assert!(library.find_by_year(2001).is_empty());

        library.refresh_indexes();
        library.verify().unwrap();
        assert_eq!(library.find_by_year(2001).len(), 1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "not the index"))]
    fn test_remove_unindexed_book_reports_desync() {
        let mut library = Library::new();
        library
            .books_mut()
            .add(make_printed_book("1", "A", 2000, "g"));

        let err = library.remove_book("1").unwrap_err();
        assert!(matches!(err, CatalogError::IndexDesync(_)));
        assert!(!err.is_recoverable());
        assert_eq!(library.len(), 1);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "more than once"))]
    fn test_remove_duplicated_isbn_reports_desync() {
        let mut library = Library::new();
        library.add_book(make_printed_book("1", "A", 2000, "g")).unwrap();
        library
            .books_mut()
            .add(make_printed_book("1", "B", 2001, "g"));

        let err = library.remove_book("1").unwrap_err();
        assert!(matches!(err, CatalogError::IndexDesync(_)));
        assert_eq!(library.len(), 2);
        assert!(library.contains("1"));
    }

    #[test]
    fn test_find_by_index_field() {
        let library = Library::from_books(vec![
            make_printed_book("1", "Mikhail Bulgakov", 1967, "novel"),
            make_printed_book("2", "Mikhail Sholokhov", 1940, "novel"),
        ])
        .unwrap();
        let field = IndexField::parse("author", "mikhail bulgakov").unwrap();
        assert_eq!(library.find(&field).isbns().collect::<Vec<_>>(), ["1"]);
    }
}
