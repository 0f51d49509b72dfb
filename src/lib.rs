#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Modules
//!
//! - [`book`] - Book records (`Book`, `BookFormat`, `CatalogEntry`)
//! - [`collection`] - Insertion-ordered `BookCollection`
//! - [`index`] - ISBN, author, and year indexes (`IndexDict`)
//! - [`library`] - The `Library` facade keeping collection and indexes in sync
//! - [`json`] - JSON encoding of collections
//! - [`csv`] - CSV export of books
//! - [`simulation`] - Seeded random event simulator
//! - [`error`] - Error types and result type
//!
//! # Consistency
//!
//! A [`Library`] holds exactly the same set of ISBNs in its collection and its
//! indexes after every operation. Mutating the collection directly through
//! [`Library::books_mut`] breaks that until [`Library::refresh_indexes`] is
//! called; [`Library::verify`] reports any mismatch.

pub mod book;
pub mod collection;
pub mod csv;
pub mod error;
pub mod index;
pub mod json;
pub mod library;
pub mod simulation;

pub use book::{
    AsIsbn, Book, BookBuilder, BookFormat, CatalogEntry, CoverType, FileFormat, SharedBook,
    DEFAULT_FILE_SIZE_MB,
};
pub use collection::BookCollection;
pub use error::{CatalogError, Result};
pub use index::{IndexDict, IndexField};
pub use library::Library;
pub use simulation::{EventReport, Simulation, SimulationConfig};
