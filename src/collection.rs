//! Insertion-ordered book collection.
//!
//! [`BookCollection`] is a thin, list-like container. It does not enforce ISBN
//! uniqueness on its own; [`Library`](crate::Library) does that for the books
//! it catalogues. Every operation that returns a collection (slicing,
//! concatenation, filtering) returns a new collection with its own storage.

use crate::book::{AsIsbn, Book, SharedBook};
use crate::error::{CatalogError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Bound, Index, RangeBounds};
use std::sync::Arc;

/// An ordered sequence of books.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookCollection {
    books: Vec<SharedBook>,
}

impl BookCollection {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        BookCollection { books: Vec::new() }
    }

    /// Number of books, counting duplicates
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the collection holds no books
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Append a book to the end of the collection.
    pub fn add(&mut self, book: impl Into<SharedBook>) {
        self.books.push(book.into());
    }

    /// Append every book in order.
    pub fn extend<I>(&mut self, books: I)
    where
        I: IntoIterator,
        I::Item: Into<SharedBook>,
    {
        for book in books {
            self.add(book);
        }
    }

    /// Position of the first book with the given ISBN.
    #[must_use]
    pub fn position<K: AsIsbn + ?Sized>(&self, key: &K) -> Option<usize> {
        let isbn = key.as_isbn();
        self.books.iter().position(|book| book.as_isbn() == isbn)
    }

    /// Whether a book with the given ISBN is present.
    #[must_use]
    pub fn contains<K: AsIsbn + ?Sized>(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Remove and return the first book with the given ISBN.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no book has that ISBN.
    pub fn remove<K: AsIsbn + ?Sized>(&mut self, key: &K) -> Result<SharedBook> {
        match self.position(key) {
            Some(pos) => Ok(self.books.remove(pos)),
            None => Err(CatalogError::NotFound(key.as_isbn().to_string())),
        }
    }

    /// Pick the position [`pop_random`](Self::pop_random) would remove.
    ///
    /// Draws exactly one value from `rng`, so choosing a position and then
    /// removing it consumes the same randomness as `pop_random`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyCollection`] if the collection is empty.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        if self.books.is_empty() {
            return Err(CatalogError::EmptyCollection);
        }
        Ok(rng.random_range(0..self.books.len()))
    }

    /// Remove and return a uniformly random book.
    ///
    /// The same seeded generator always removes the same sequence of books.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyCollection`] if the collection is empty.
    pub fn pop_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SharedBook> {
        let pos = self.random_position(rng)?;
        Ok(self.books.remove(pos))
    }

    /// Remove the book at `pos`, or `None` when out of range.
    pub(crate) fn remove_at(&mut self, pos: usize) -> Option<SharedBook> {
        (pos < self.books.len()).then(|| self.books.remove(pos))
    }

    /// Book at `pos`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&SharedBook> {
        self.books.get(pos)
    }

    /// Copy a range of books into a new collection.
    ///
    /// Bounds are clamped to the collection, so an out-of-range slice yields a
    /// shorter or empty collection rather than panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibcat::{Book, BookCollection};
    ///
    /// let collection: BookCollection = (1..=5)
    ///     .map(|n| Book::printed(n.to_string(), "T", "A", 2000, "g", 100))
    ///     .collect();
    ///
    /// assert_eq!(collection.slice(..3).len(), 3);
    /// assert_eq!(collection.slice(3..10).len(), 2);
    /// assert!(collection.slice(8..).is_empty());
    /// ```
    #[must_use]
    pub fn slice<B: RangeBounds<usize>>(&self, range: B) -> BookCollection {
        let len = self.books.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);

        if start >= end {
            return BookCollection::new();
        }
        BookCollection {
            books: self.books[start..end].to_vec(),
        }
    }

    /// Combine two collections without duplicating ISBNs.
    ///
    /// The result holds every book of `self` in order, followed by the books
    /// of `other` whose ISBN is not already present. On conflict the left
    /// side wins.
    #[must_use]
    pub fn concat(&self, other: &BookCollection) -> BookCollection {
        let mut combined = self.clone();
        for book in other {
            if !combined.contains(book) {
                combined.add(Arc::clone(book));
            }
        }
        combined
    }

    /// Independent copy of the current contents.
    ///
    /// The returned vector is unaffected by later mutation of the collection.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SharedBook> {
        self.books.clone()
    }

    /// Iterate over books in order
    pub fn iter(&self) -> std::slice::Iter<'_, SharedBook> {
        self.books.iter()
    }

    /// Iterate over the ISBNs in order
    pub fn isbns(&self) -> impl Iterator<Item = &str> {
        self.books.iter().map(|book| book.as_isbn())
    }

    /// Borrow the books as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[SharedBook] {
        &self.books
    }

    /// Keep only the books matching `predicate`, in order, in a new collection.
    #[must_use]
    pub fn filtered<F>(&self, mut predicate: F) -> BookCollection
    where
        F: FnMut(&Book) -> bool,
    {
        self.books
            .iter()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }
}

impl Index<usize> for BookCollection {
    type Output = Book;

    fn index(&self, pos: usize) -> &Book {
        &self.books[pos]
    }
}

impl std::ops::Add<&BookCollection> for &BookCollection {
    type Output = BookCollection;

    fn add(self, other: &BookCollection) -> BookCollection {
        self.concat(other)
    }
}

impl FromIterator<SharedBook> for BookCollection {
    fn from_iter<I: IntoIterator<Item = SharedBook>>(iter: I) -> Self {
        BookCollection {
            books: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Book> for BookCollection {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        iter.into_iter().map(Arc::new).collect()
    }
}

impl From<Vec<SharedBook>> for BookCollection {
    fn from(books: Vec<SharedBook>) -> Self {
        BookCollection { books }
    }
}

impl IntoIterator for BookCollection {
    type Item = SharedBook;
    type IntoIter = std::vec::IntoIter<SharedBook>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.into_iter()
    }
}

impl<'a> IntoIterator for &'a BookCollection {
    type Item = &'a SharedBook;
    type IntoIter = std::slice::Iter<'a, SharedBook>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}
