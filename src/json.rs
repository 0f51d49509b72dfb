//! JSON serialization of book collections.
//!
//! A collection is encoded as a JSON array of books in collection order. Each
//! book carries its edition attributes under `format`, tagged by `kind`:
//!
//! ```json
//! [
//!   {
//!     "title": "War and Peace",
//!     "author": "Leo Tolstoy",
//!     "year": 1869,
//!     "genre": "novel",
//!     "isbn": "123",
//!     "format": { "kind": "printed", "pages": 1225, "cover": "hardcover" }
//!   }
//! ]
//! ```
//!
//! # Examples
//!
//! ```
//! use bibcat::{json, Book, Library};
//!
//! # fn main() -> bibcat::Result<()> {
//! let library = Library::from_books(vec![
//!     Book::printed("123", "War and Peace", "Leo Tolstoy", 1869, "novel", 1225),
//! ])?;
//!
//! let text = json::books_to_json(library.books())?;
//! let restored = json::library_from_json(&text)?;
//! assert_eq!(restored.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::collection::BookCollection;
use crate::error::Result;
use crate::library::Library;

/// Encode a collection as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if the collection cannot be serialized.
pub fn books_to_json(books: &BookCollection) -> Result<String> {
    Ok(serde_json::to_string_pretty(books)?)
}

/// Decode a JSON array of books into a collection, keeping duplicates.
///
/// # Errors
///
/// Returns an error if the input is not a JSON array of books.
pub fn books_from_json(json: &str) -> Result<BookCollection> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a JSON array of books into an indexed library.
///
/// # Errors
///
/// Returns an error if the input is not a JSON array of books, or
/// [`CatalogError::DuplicateIsbn`](crate::CatalogError::DuplicateIsbn) if it
/// repeats an ISBN.
pub fn library_from_json(json: &str) -> Result<Library> {
    Library::from_books(books_from_json(json)?)
}
