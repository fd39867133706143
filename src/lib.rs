// Biblioteca - Personal Library Catalog
// Exposes the catalog model and file-backed store for use in the CLI and tests

pub mod book;
pub mod error;
pub mod library;

// Re-export commonly used types
pub use book::{Book, BookKind, BookRecord, BookState};
pub use error::LibraryError;
pub use library::{Library, DATA_FILE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
