use thiserror::Error;

/// Errors surfaced by the catalog. Load/save I/O failures are not listed
/// here: they travel as `anyhow::Error` at the persistence boundary and are
/// reported, never fatal.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Invalid state '{0}'. Must be 'Available' or 'Loaned'.")]
    InvalidState(String),

    #[error("No book found with the exact title '{0}'.")]
    NotFound(String),

    #[error("Book '{0}' is already loaned.")]
    AlreadyLoaned(String),

    #[error("A book with the title '{0}' already exists.")]
    DuplicateTitle(String),

    #[error("Malformed book record: {0}")]
    MalformedRecord(String),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
