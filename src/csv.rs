//! CSV export of books.
//!
//! Produces one row per book with the columns
//! `isbn,title,author,year,genre,kind,pages,cover,file_format,file_size_mb`.
//! Columns that do not apply to a book's variant are left empty.
//!
//! # Examples
//!
//! ```
//! use bibcat::{csv, Book, Library};
//!
//! # fn main() -> bibcat::Result<()> {
//! let library = Library::from_books(vec![
//!     Book::printed("123", "War and Peace", "Leo Tolstoy", 1869, "novel", 1225),
//! ])?;
//!
//! let text = csv::books_to_csv(library.books().as_slice())?;
//! assert!(text.starts_with("isbn,title,author,year,genre,kind"));
//! # Ok(())
//! # }
//! ```

use crate::book::{BookFormat, CatalogEntry, CoverType, FileFormat, SharedBook};
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct BookRow<'a> {
    isbn: &'a str,
    title: &'a str,
    author: &'a str,
    year: i32,
    genre: &'a str,
    kind: &'static str,
    pages: Option<u32>,
    cover: Option<CoverType>,
    file_format: Option<FileFormat>,
    file_size_mb: Option<f64>,
}

impl<'a> From<&'a SharedBook> for BookRow<'a> {
    fn from(book: &'a SharedBook) -> Self {
        let (pages, cover, file_format, file_size_mb) = match *book.format() {
            BookFormat::Printed { pages, cover } => (Some(pages), Some(cover), None, None),
            BookFormat::Digital {
                file_format,
                file_size_mb,
            } => (None, None, Some(file_format), Some(file_size_mb)),
        };
        BookRow {
            isbn: book.isbn(),
            title: book.title(),
            author: book.author(),
            year: book.year(),
            genre: book.genre(),
            kind: book.format().kind(),
            pages,
            cover,
            file_format,
            file_size_mb,
        }
    }
}

/// Convert books to CSV with a header row.
///
/// # Errors
///
/// Returns an error if the CSV cannot be written.
pub fn books_to_csv(books: &[SharedBook]) -> Result<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    for book in books {
        writer.serialize(BookRow::from(book))?;
    }
    let data = writer
        .into_inner()
        .map_err(|err| ::csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Book;
    use std::sync::Arc;

    #[test]
    fn test_rows_per_variant() {
        let books = vec![
            Arc::new(Book::printed("1", "War and Peace", "Leo Tolstoy", 1869, "novel", 1225)),
            Arc::new(Book::digital("2", "Onegin", "Pushkin", 1833, "poetry", FileFormat::Pdf, 2.5)),
        ];
        let text = books_to_csv(&books).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "isbn,title,author,year,genre,kind,pages,cover,file_format,file_size_mb"
        );
        assert_eq!(lines[1], "1,War and Peace,Leo Tolstoy,1869,novel,printed,1225,paperback,,");
        assert_eq!(lines[2], "2,Onegin,Pushkin,1833,poetry,digital,,,pdf,2.5");
    }

    #[test]
    fn test_quotes_embedded_commas() {
        let books = vec![Arc::new(Book::printed("1", "Crime, and Punishment", "F. D.", 1866, "novel", 600))];
        let text = books_to_csv(&books).unwrap();
        assert!(text.contains("\"Crime, and Punishment\""));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(books_to_csv(&[]).unwrap(), "");
    }
}
