//! Error types for catalog operations.
//!
//! This module provides the [`CatalogError`] type for all catalog operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all catalog operations.
///
/// Every variant except [`CatalogError::IndexDesync`] is an ordinary,
/// recoverable condition the caller is expected to handle.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No book with the given ISBN exists in the structure that was queried.
    #[error("Book with ISBN {0} not found")]
    NotFound(String),

    /// A random removal was requested from an empty collection.
    #[error("Cannot take a random book from an empty collection")]
    EmptyCollection,

    /// A book with the same ISBN is already catalogued.
    #[error("Duplicate ISBN: {0}")]
    DuplicateIsbn(String),

    /// The collection and the index no longer describe the same set of books.
    #[error("Collection and index out of sync: {0}")]
    IndexDesync(String),

    /// An index field name other than `author` or `year` was requested.
    #[error("Unsupported index field '{0}'")]
    UnsupportedField(String),

    /// An index query value could not be interpreted for its field.
    #[error("Invalid index query: {0}")]
    InvalidQuery(String),

    /// A simulation was configured with values it cannot draw from.
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CatalogError {
    /// Returns `false` only for internal-consistency failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibcat::CatalogError;
    ///
    /// assert!(CatalogError::EmptyCollection.is_recoverable());
    /// assert!(!CatalogError::IndexDesync("978-0".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CatalogError::IndexDesync(_))
    }
}

/// Convenience type alias for [`std::result::Result`] with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
