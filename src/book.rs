//! Book record structures.
//!
//! This module provides the immutable catalog entry types:
//! - [`Book`] - a catalog entry with the fields common to every edition
//! - [`BookFormat`] - the closed set of variants (printed or digital) and their extra attributes
//! - [`CatalogEntry`] - the capability set every entry exposes
//! - [`AsIsbn`] - anything that can be used as a lookup key
//!
//! Identity is the ISBN alone: two books with the same ISBN compare equal and
//! hash identically regardless of their other fields.
//!
//! # Examples
//!
//! ```
//! use bibcat::{Book, CatalogEntry, CoverType};
//!
//! let book = Book::builder("978-0140447934")
//!     .title("War and Peace")
//!     .author("Leo Tolstoy")
//!     .year(1869)
//!     .genre("novel")
//!     .printed(1225, CoverType::Hardcover)
//!     .build();
//!
//! assert_eq!(book.short_label(), "War and Peace (1869)");
//! assert_eq!(book.describe_binding().as_deref(), Some("1225 pages, hardcover"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A book shared between the collection and every index bucket that holds it.
pub type SharedBook = Arc<Book>;

/// Binding of a printed book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverType {
    /// Soft cover (default)
    #[default]
    Paperback,
    /// Hard cover
    Hardcover,
}

impl fmt::Display for CoverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paperback => write!(f, "paperback"),
            Self::Hardcover => write!(f, "hardcover"),
        }
    }
}

/// File format of a digital book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// EPUB (default)
    #[default]
    Epub,
    /// PDF
    Pdf,
    /// Kindle MOBI
    Mobi,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epub => write!(f, "epub"),
            Self::Pdf => write!(f, "pdf"),
            Self::Mobi => write!(f, "mobi"),
        }
    }
}

/// Default size reported for a digital book when none is given.
pub const DEFAULT_FILE_SIZE_MB: f64 = 1.5;

/// The edition-specific part of a [`Book`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BookFormat {
    /// A physical copy
    Printed {
        /// Page count
        pages: u32,
        /// Binding
        cover: CoverType,
    },
    /// An electronic copy
    Digital {
        /// Container format
        file_format: FileFormat,
        /// File size in megabytes
        file_size_mb: f64,
    },
}

impl BookFormat {
    /// Short lowercase name of the variant (`printed` or `digital`).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Printed { .. } => "printed",
            Self::Digital { .. } => "digital",
        }
    }
}

impl Default for BookFormat {
    fn default() -> Self {
        BookFormat::Printed {
            pages: 0,
            cover: CoverType::default(),
        }
    }
}

/// Capabilities shared by every catalog entry variant.
pub trait CatalogEntry {
    /// The unique identifier of the entry.
    fn isbn(&self) -> &str;

    /// A one-line, variant-specific description.
    fn describe(&self) -> String;

    /// A compact `Title (Year)` label.
    fn short_label(&self) -> String;
}

/// Anything that can identify a book by ISBN.
///
/// Lookup and removal operations accept either a bare ISBN or a book, so
/// `collection.remove("978-0")` and `collection.remove(&book)` are equivalent.
pub trait AsIsbn {
    /// The ISBN this key refers to.
    fn as_isbn(&self) -> &str;
}

impl AsIsbn for str {
    fn as_isbn(&self) -> &str {
        self
    }
}

impl AsIsbn for String {
    fn as_isbn(&self) -> &str {
        self
    }
}

impl AsIsbn for Book {
    fn as_isbn(&self) -> &str {
        &self.isbn
    }
}

impl AsIsbn for SharedBook {
    fn as_isbn(&self) -> &str {
        &self.isbn
    }
}

/// An immutable catalog entry.
///
/// Fields are private; a `Book` never changes once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    year: i32,
    genre: String,
    isbn: String,
    format: BookFormat,
}

impl Book {
    /// Create a builder for a book with the given ISBN.
    #[must_use]
    pub fn builder(isbn: impl Into<String>) -> BookBuilder {
        BookBuilder {
            book: Book {
                title: String::new(),
                author: String::new(),
                year: 0,
                genre: String::new(),
                isbn: isbn.into(),
                format: BookFormat::default(),
            },
        }
    }

    /// Create a paperback printed book.
    ///
    /// Use [`Book::builder`] to choose a different cover.
    #[must_use]
    pub fn printed(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        pages: u32,
    ) -> Self {
        Book::builder(isbn)
            .title(title)
            .author(author)
            .year(year)
            .genre(genre)
            .printed(pages, CoverType::default())
            .build()
    }

    /// Create a digital book.
    #[must_use]
    pub fn digital(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        file_format: FileFormat,
        file_size_mb: f64,
    ) -> Self {
        Book::builder(isbn)
            .title(title)
            .author(author)
            .year(year)
            .genre(genre)
            .digital(file_format, file_size_mb)
            .build()
    }

    /// Title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author as catalogued (original casing)
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Publication year
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Genre as catalogued (original casing)
    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Edition-specific attributes
    #[must_use]
    pub fn format(&self) -> &BookFormat {
        &self.format
    }

    /// Whether this is a printed copy.
    #[must_use]
    pub fn is_printed(&self) -> bool {
        matches!(self.format, BookFormat::Printed { .. })
    }

    /// Whether this is a digital copy.
    #[must_use]
    pub fn is_digital(&self) -> bool {
        matches!(self.format, BookFormat::Digital { .. })
    }

    /// Case-insensitive substring match against the title or the author.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibcat::Book;
    ///
    /// let book = Book::printed("1", "War and Peace", "Leo Tolstoy", 1869, "novel", 1225);
    /// assert!(book.matches_keyword("tolstoy"));
    /// assert!(book.matches_keyword("PEACE"));
    /// assert!(!book.matches_keyword("Pushkin"));
    /// ```
    #[must_use]
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword)
            || self.author.to_lowercase().contains(&keyword)
    }

    /// Page count and binding, for printed books only.
    #[must_use]
    pub fn describe_binding(&self) -> Option<String> {
        match &self.format {
            BookFormat::Printed { pages, cover } => Some(format!("{pages} pages, {cover}")),
            BookFormat::Digital { .. } => None,
        }
    }

    /// Simulates opening a digital book on a reading device.
    ///
    /// Returns `None` for printed books.
    #[must_use]
    pub fn open_on(&self, device: &str) -> Option<String> {
        match &self.format {
            BookFormat::Digital { file_format, .. } => Some(format!(
                "Opening '{}' on {device} as {file_format}",
                self.title
            )),
            BookFormat::Printed { .. } => None,
        }
    }

    /// Lowercased author, the key of the author index.
    pub(crate) fn author_key(&self) -> String {
        self.author.to_lowercase()
    }
}

impl CatalogEntry for Book {
    fn isbn(&self) -> &str {
        &self.isbn
    }

    fn describe(&self) -> String {
        match &self.format {
            BookFormat::Printed { pages, .. } => format!(
                "Printed Book({:?}, {:?}, {}, {:?}, {}, pages={pages})",
                self.title, self.author, self.year, self.genre, self.isbn
            ),
            BookFormat::Digital {
                file_format,
                file_size_mb,
            } => format!(
                "Digital Book({:?}, {:?}, {}, {:?}, {}, {file_format}, {file_size_mb:?}MB)",
                self.title, self.author, self.year, self.genre, self.isbn
            ),
        }
    }

    fn short_label(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.isbn == other.isbn
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.isbn.hash(state);
    }
}

/// Builder for fluently constructing books
#[derive(Debug)]
pub struct BookBuilder {
    book: Book,
}

impl BookBuilder {
    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.book.title = title.into();
        self
    }

    /// Set the author
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.book.author = author.into();
        self
    }

    /// Set the publication year
    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.book.year = year;
        self
    }

    /// Set the genre
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.book.genre = genre.into();
        self
    }

    /// Make this a printed book
    #[must_use]
    pub fn printed(mut self, pages: u32, cover: CoverType) -> Self {
        self.book.format = BookFormat::Printed { pages, cover };
        self
    }

    /// Make this a digital book
    #[must_use]
    pub fn digital(mut self, file_format: FileFormat, file_size_mb: f64) -> Self {
        self.book.format = BookFormat::Digital {
            file_format,
            file_size_mb,
        };
        self
    }

    /// Build the book
    #[must_use]
    pub fn build(self) -> Book {
        self.book
    }

    /// Build the book behind a shared pointer, ready to be catalogued
    #[must_use]
    pub fn build_shared(self) -> SharedBook {
        Arc::new(self.book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_printed_book(isbn: &str) -> Book {
        Book::builder(isbn)
            .title("Test")
            .author("Test Author")
            .year(2000)
            .genre("genre")
            .printed(150, CoverType::Hardcover)
            .build()
    }

    #[test]
    fn test_printed_binding_and_display() {
        let book = make_printed_book("000");
        assert_eq!(
            book.describe_binding().as_deref(),
            Some("150 pages, hardcover")
        );
        let text = book.to_string();
        assert!(text.starts_with("Printed Book("));
        assert!(text.contains("pages=150"));
        assert!(book.open_on("reader").is_none());
    }

    #[test]
    fn test_digital_open_and_display() {
        let book = Book::digital("111", "Digi", "Author", 2023, "genre", FileFormat::Pdf, 3.25);
        assert_eq!(
            book.open_on("e-reader").as_deref(),
            Some("Opening 'Digi' on e-reader as pdf")
        );
        let text = book.describe();
        assert!(text.starts_with("Digital Book("));
        assert!(text.contains("3.25MB"));
        assert!(book.describe_binding().is_none());

        let whole = Book::digital("112", "Digi", "Author", 2023, "genre", FileFormat::Mobi, 2.0);
        assert!(whole.describe().ends_with("mobi, 2.0MB)"));
    }

    #[test]
    fn test_defaults() {
        let book = Book::printed("1", "T", "A", 1999, "g", 100);
        assert_eq!(
            book.format(),
            &BookFormat::Printed {
                pages: 100,
                cover: CoverType::Paperback
            }
        );
        assert!(book.is_printed());

        let digital = Book::builder("2")
            .digital(FileFormat::default(), DEFAULT_FILE_SIZE_MB)
            .build();
        assert!(digital.is_digital());
        assert!(digital.describe().contains("epub, 1.5MB"));
    }

    #[test]
    fn test_identity_is_isbn_only() {
        let a = Book::printed("42", "One", "A", 2000, "x", 10);
        let b = Book::digital("42", "Other", "B", 2010, "y", FileFormat::Mobi, 2.0);
        let c = Book::printed("43", "One", "A", 2000, "x", 10);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Book> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_short_label_and_keywords() {
        let book = Book::printed("7", "The Quiet Don", "Mikhail Sholokhov", 1940, "novel", 900);
        assert_eq!(book.short_label(), "The Quiet Don (1940)");
        assert!(book.matches_keyword("quiet"));
        assert!(book.matches_keyword("SHOLOKHOV"));
        assert!(!book.matches_keyword("novel"));
    }

    #[test]
    fn test_as_isbn_keys() {
        let book = make_printed_book("abc");
        let shared: SharedBook = Arc::new(book.clone());
        assert_eq!(book.as_isbn(), "abc");
        assert_eq!(shared.as_isbn(), "abc");
        assert_eq!("abc".as_isbn(), "abc");
        assert_eq!(String::from("abc").as_isbn(), "abc");
    }

    #[test]
    fn test_serde_tagged_format() {
        let book = Book::digital("9", "T", "A", 2001, "g", FileFormat::Epub, 1.5);
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["format"]["kind"], "digital");
        assert_eq!(value["format"]["file_format"], "epub");
    }
}
