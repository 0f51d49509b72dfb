//! Secondary indexes over a set of books.
//!
//! [`IndexDict`] keeps three mappings derived from one logical set of books:
//!
//! - `by_isbn`: ISBN → book, one entry per ISBN
//! - `by_author`: lowercased author → bucket of books
//! - `by_year`: year → bucket of books
//!
//! A book is in `by_isbn` if and only if it is in exactly its own author and
//! year buckets. Buckets never stay behind empty. Buckets hold the same
//! [`SharedBook`] pointer as `by_isbn`, never a copy.
//!
//! Maps and buckets are `IndexMap`/`IndexSet`, so lookup results come back in
//! the order books were indexed. Callers that need another order must sort.

use crate::book::{AsIsbn, CatalogEntry, SharedBook};
use crate::collection::BookCollection;
use crate::error::{CatalogError, Result};
use indexmap::{IndexMap, IndexSet};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

type Buckets<K> = IndexMap<K, IndexSet<SharedBook>>;

/// A field-keyed query against one of the secondary indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexField {
    /// Case-insensitive author match
    Author(String),
    /// Exact year match
    Year(i32),
}

impl IndexField {
    /// Build a query from a field name and a textual value.
    ///
    /// Field names are matched case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibcat::IndexField;
    ///
    /// assert_eq!(IndexField::parse("Year", "2001").unwrap(), IndexField::Year(2001));
    /// assert!(IndexField::parse("genre", "novel").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedField`] for a field other than
    /// `author` or `year`, and [`CatalogError::InvalidQuery`] when a year is
    /// not an integer.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        match field.to_lowercase().as_str() {
            "author" => Ok(IndexField::Author(value.to_string())),
            "year" => value.trim().parse().map(IndexField::Year).map_err(|_| {
                CatalogError::InvalidQuery(format!("year must be an integer, got '{value}'"))
            }),
            _ => Err(CatalogError::UnsupportedField(field.to_string())),
        }
    }
}

impl fmt::Display for IndexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Author(author) => write!(f, "author={author}"),
            Self::Year(year) => write!(f, "year={year}"),
        }
    }
}

/// ISBN, author, and year indexes kept consistent with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDict {
    by_isbn: IndexMap<String, SharedBook>,
    by_author: Buckets<String>,
    by_year: Buckets<i32>,
}

impl IndexDict {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed books
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_isbn.len()
    }

    /// Whether nothing is indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_isbn.is_empty()
    }

    /// Index a book under its ISBN, author, and year.
    ///
    /// If a book with the same ISBN is already indexed it is fully removed
    /// first, including its author and year bucket membership, and returned.
    pub fn add(&mut self, book: impl Into<SharedBook>) -> Option<SharedBook> {
        let book = book.into();
        let replaced = self.remove(&book).ok();
        if let Some(old) = &replaced {
            log::debug!("Replacing indexed entry for ISBN {}", old.isbn());
        }

        self.by_author
            .entry(book.author_key())
            .or_default()
            .insert(Arc::clone(&book));
        self.by_year
            .entry(book.year())
            .or_default()
            .insert(Arc::clone(&book));
        self.by_isbn.insert(book.isbn().to_string(), book);
        replaced
    }

    /// Remove a book from all three mappings and return it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the ISBN is not indexed.
    pub fn remove<K: AsIsbn + ?Sized>(&mut self, key: &K) -> Result<SharedBook> {
        let isbn = key.as_isbn();
        let book = self
            .by_isbn
            .shift_remove(isbn)
            .ok_or_else(|| CatalogError::NotFound(isbn.to_string()))?;

        discard(&mut self.by_author, &book.author_key(), &book);
        discard(&mut self.by_year, &book.year(), &book);
        Ok(book)
    }

    /// Look up a book by exact ISBN.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the ISBN is not indexed.
    pub fn lookup<K: AsIsbn + ?Sized>(&self, key: &K) -> Result<&SharedBook> {
        let isbn = key.as_isbn();
        self.by_isbn
            .get(isbn)
            .ok_or_else(|| CatalogError::NotFound(isbn.to_string()))
    }

    /// Whether the ISBN is indexed. Only `by_isbn` is consulted.
    #[must_use]
    pub fn contains<K: AsIsbn + ?Sized>(&self, key: &K) -> bool {
        self.by_isbn.contains_key(key.as_isbn())
    }

    /// Books by an author, matched case-insensitively. Empty when unknown.
    #[must_use]
    pub fn get_by_author(&self, author: &str) -> BookCollection {
        bucket_to_collection(self.by_author.get(&author.to_lowercase()))
    }

    /// Books published in `year`. Empty when unknown.
    #[must_use]
    pub fn get_by_year(&self, year: i32) -> BookCollection {
        bucket_to_collection(self.by_year.get(&year))
    }

    /// Run a field-keyed query.
    #[must_use]
    pub fn query(&self, field: &IndexField) -> BookCollection {
        match field {
            IndexField::Author(author) => self.get_by_author(author),
            IndexField::Year(year) => self.get_by_year(*year),
        }
    }

    /// Clear every mapping and index `books` in order.
    ///
    /// When `books` repeats an ISBN, the last occurrence wins.
    pub fn rebuild<I>(&mut self, books: I)
    where
        I: IntoIterator,
        I::Item: Borrow<SharedBook>,
    {
        self.by_isbn.clear();
        self.by_author.clear();
        self.by_year.clear();
        for book in books {
            self.add(Arc::clone(book.borrow()));
        }
    }

    /// Iterate over `(isbn, book)` pairs in indexing order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedBook)> {
        self.by_isbn.iter().map(|(isbn, book)| (isbn.as_str(), book))
    }

    /// Iterate over the indexed ISBNs in indexing order
    pub fn isbns(&self) -> impl Iterator<Item = &str> {
        self.by_isbn.keys().map(String::as_str)
    }

    /// Lowercased author keys that currently have a bucket
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.by_author.keys().map(String::as_str)
    }

    /// Years that currently have a bucket
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Verify that the three mappings describe the same set of books.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IndexDesync`] describing the first violation found.
    pub fn check_consistency(&self) -> Result<()> {
        for (isbn, book) in &self.by_isbn {
            if book.isbn() != isbn.as_str() {
                return Err(desync(format!(
                    "ISBN key {isbn} holds book {}",
                    book.isbn()
                )));
            }
            if !holds_same(self.by_author.get(&book.author_key()), book) {
                return Err(desync(format!("ISBN {isbn} missing from its author bucket")));
            }
            if !holds_same(self.by_year.get(&book.year()), book) {
                return Err(desync(format!("ISBN {isbn} missing from its year bucket")));
            }
        }

        for (author, bucket) in &self.by_author {
            self.check_bucket(bucket, &format!("author '{author}'"), |book| {
                book.author_key() == *author
            })?;
        }
        for (year, bucket) in &self.by_year {
            self.check_bucket(bucket, &format!("year {year}"), |book| book.year() == *year)?;
        }
        Ok(())
    }

    fn check_bucket<F>(&self, bucket: &IndexSet<SharedBook>, name: &str, belongs: F) -> Result<()>
    where
        F: Fn(&SharedBook) -> bool,
    {
        if bucket.is_empty() {
            return Err(desync(format!("empty bucket left for {name}")));
        }
        for book in bucket {
            if !belongs(book) {
                return Err(desync(format!("ISBN {} filed under {name}", book.isbn())));
            }
            match self.by_isbn.get(book.isbn()) {
                Some(primary) if Arc::ptr_eq(primary, book) => {},
                _ => {
                    return Err(desync(format!(
                        "stale entry for ISBN {} in bucket for {name}",
                        book.isbn()
                    )))
                },
            }
        }
        Ok(())
    }
}

fn discard<K: Hash + Eq>(buckets: &mut Buckets<K>, key: &K, book: &SharedBook) {
    if let Some(bucket) = buckets.get_mut(key) {
        bucket.shift_remove(book);
        if bucket.is_empty() {
            buckets.shift_remove(key);
        }
    }
}

fn holds_same(bucket: Option<&IndexSet<SharedBook>>, book: &SharedBook) -> bool {
    bucket
        .and_then(|bucket| bucket.get(book))
        .is_some_and(|entry| Arc::ptr_eq(entry, book))
}

fn bucket_to_collection(bucket: Option<&IndexSet<SharedBook>>) -> BookCollection {
    bucket
        .map(|bucket| bucket.iter().cloned().collect())
        .unwrap_or_default()
}

fn desync(message: String) -> CatalogError {
    CatalogError::IndexDesync(message)
}
