// 📖 Library Catalog Store - In-memory collection + flat-file persistence
//
// Owns every catalog entry for the lifetime of the process. The backing
// store is a UTF-8 text file with one JSON record per line, fully read on
// open and fully rewritten on save. All lookups are linear scans in
// insertion order; titles are matched case-insensitively.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{error, info};

use crate::book::{Book, BookState};
use crate::error::{LibraryError, Result};

/// Backing file name, resolved in the process working directory
pub const DATA_FILE: &str = "biblioteca.txt";

// ============================================================================
// LIBRARY STORE
// ============================================================================

/// In-memory owner of all catalog entries plus load/save to the text store
pub struct Library {
    /// Entries in insertion order
    books: Vec<Book>,
    /// Backing file, rewritten in full on save
    path: PathBuf,
}

impl Library {
    /// Open the catalog at `path`, loading whatever is persisted there.
    ///
    /// A missing file is not an error: the library starts empty. A file that
    /// fails to read or decode is reported and the library also starts empty;
    /// loading is all-or-nothing, so a malformed line discards the entries
    /// parsed before it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if !path.exists() {
            info!(
                "catalog file '{}' not found, starting with an empty library",
                path.display()
            );
            return Library { books: Vec::new(), path };
        }

        let books = match read_catalog(&path) {
            Ok(books) => {
                info!("loaded {} books from '{}'", books.len(), path.display());
                books
            }
            Err(err) => {
                error!("could not load catalog from '{}': {:#}", path.display(), err);
                Vec::new()
            }
        };

        Library { books, path }
    }

    /// Overwrite the backing file with every entry, one record per line, in
    /// catalog order. Returns the number of records written.
    pub fn save(&self) -> anyhow::Result<usize> {
        let mut contents = String::new();
        for book in &self.books {
            let line = serde_json::to_string(book)
                .with_context(|| format!("failed to serialize record for '{}'", book.title))?;
            contents.push_str(&line);
            contents.push('\n');
        }

        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write '{}'", self.path.display()))?;

        info!("saved {} books to '{}'", self.books.len(), self.path.display());
        Ok(self.books.len())
    }

    // ========================================================================
    // CATALOG OPERATIONS
    // ========================================================================

    /// Append a book, rejecting titles that already exist case-insensitively
    pub fn add(&mut self, book: Book) -> Result<()> {
        if self.find_exact(&book.title).is_some() {
            return Err(LibraryError::DuplicateTitle(book.title));
        }
        self.books.push(book);
        Ok(())
    }

    /// Remove the entry matching `title` exactly (case-insensitive) and
    /// return it
    pub fn remove(&mut self, title: &str) -> Result<Book> {
        let index = self
            .position_exact(title)
            .ok_or_else(|| LibraryError::NotFound(title.to_string()))?;
        Ok(self.books.remove(index))
    }

    /// First case-insensitive exact title match, if any
    pub fn find_exact(&self, title: &str) -> Option<&Book> {
        let needle = title.to_lowercase();
        self.books.iter().find(|book| book.title.to_lowercase() == needle)
    }

    /// All entries whose title contains `query` (case-insensitive), in
    /// catalog order
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// All entries currently available, in catalog order
    pub fn available(&self) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|book| book.state == BookState::Available)
            .collect()
    }

    /// Mark the exact-title match as loaned.
    ///
    /// Fails with `NotFound` when no entry matches and `AlreadyLoaned` when
    /// the match is already out.
    pub fn mark_loaned(&mut self, title: &str) -> Result<()> {
        let index = self
            .position_exact(title)
            .ok_or_else(|| LibraryError::NotFound(title.to_string()))?;

        let book = &mut self.books[index];
        if book.state == BookState::Loaned {
            return Err(LibraryError::AlreadyLoaned(book.title.clone()));
        }

        book.state = BookState::Loaned;
        Ok(())
    }

    /// Return the exact-title match to the shelf.
    ///
    /// Fails with `NotFound` when no entry matches. Returning a book that is
    /// already available is a no-op, reported as `Ok(false)`.
    pub fn return_book(&mut self, title: &str) -> Result<bool> {
        let index = self
            .position_exact(title)
            .ok_or_else(|| LibraryError::NotFound(title.to_string()))?;

        let book = &mut self.books[index];
        if book.state == BookState::Available {
            return Ok(false);
        }

        book.state = BookState::Available;
        Ok(true)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn position_exact(&self, title: &str) -> Option<usize> {
        let needle = title.to_lowercase();
        self.books.iter().position(|book| book.title.to_lowercase() == needle)
    }
}

/// Decode every non-blank line of the backing file. Any undecodable line
/// aborts the whole load.
fn read_catalog(path: &Path) -> anyhow::Result<Vec<Book>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;

    let mut books = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let book: Book = serde_json::from_str(line)
            .with_context(|| format!("malformed record on line {}", number + 1))?;
        books.push(book);
    }

    Ok(books)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    /// Library backed by a path inside a fresh temp dir (file not created)
    fn empty_library(dir: &tempfile::TempDir) -> Library {
        Library::open(dir.path().join(DATA_FILE))
    }

    fn dune() -> Book {
        Book::new("Dune", "Herbert", "1965")
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let library = empty_library(&dir);

        assert!(library.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate_title_case_insensitive() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);

        library.add(dune()).unwrap();
        let result = library.add(Book::new("DUNE", "Someone Else", "2001"));

        assert!(
            matches!(result, Err(LibraryError::DuplicateTitle(ref t)) if t == "DUNE"),
            "second add must be rejected"
        );
        assert_eq!(library.len(), 1, "collection must be unchanged");
        assert_eq!(library.books()[0].author, "Herbert");
    }

    #[test]
    fn test_remove_unknown_title_fails() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();

        let result = library.remove("Nonexistent");

        assert!(matches!(result, Err(LibraryError::NotFound(_))));
        assert_eq!(library.len(), 1, "collection must be unchanged");
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();

        let removed = library.remove("dune").unwrap();

        assert_eq!(removed.title, "Dune");
        assert!(library.is_empty());
    }

    #[test]
    fn test_mark_loaned_twice_fails() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();

        library.mark_loaned("Dune").unwrap();
        let result = library.mark_loaned("Dune");

        assert!(
            matches!(result, Err(LibraryError::AlreadyLoaned(ref t)) if t == "Dune"),
            "second loan must fail"
        );
        assert_eq!(library.books()[0].state, BookState::Loaned, "state must be unchanged");
    }

    #[test]
    fn test_mark_loaned_unknown_title_fails() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);

        let result = library.mark_loaned("Dune");

        assert!(matches!(result, Err(LibraryError::NotFound(_))));
    }

    #[test]
    fn test_return_restores_availability() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();
        library.mark_loaned("Dune").unwrap();

        let changed = library.return_book("Dune").unwrap();

        assert!(changed);
        assert_eq!(library.books()[0].state, BookState::Available);
    }

    #[test]
    fn test_return_of_available_book_is_noop() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();

        let changed = library.return_book("Dune").unwrap();

        assert!(!changed, "already-available return is a no-op, not an error");
        assert_eq!(library.books()[0].state, BookState::Available);
    }

    #[test]
    fn test_search_substring_case_insensitive() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();
        library.add(Book::new("Dune Messiah", "Herbert", "1969")).unwrap();
        library.add(Book::new("1984", "Orwell", "1949")).unwrap();

        let results = library.search("dune");

        let titles: Vec<&str> = results.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Dune Messiah"], "all and only matches, in order");

        assert!(library.search("orwell").is_empty(), "search matches titles, not authors");
    }

    #[test]
    fn test_find_exact_returns_at_most_one() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();
        library.add(Book::new("Dune Messiah", "Herbert", "1969")).unwrap();

        let found = library.find_exact("dUnE").unwrap();
        assert_eq!(found.title, "Dune");

        assert!(library.find_exact("Dune M").is_none());
    }

    #[test]
    fn test_available_lists_in_catalog_order() {
        let dir = tempdir().unwrap();
        let mut library = empty_library(&dir);
        library.add(dune()).unwrap();
        library.add(Book::new("1984", "Orwell", "1949")).unwrap();
        library.add(Book::new("Fahrenheit 451", "Bradbury", "1953")).unwrap();
        library.mark_loaned("1984").unwrap();

        let available = library.available();

        let titles: Vec<&str> = available.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Fahrenheit 451"]);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);

        let mut library = Library::open(&path);
        library.add(Book::digital("1984", "Orwell", "1949", "ePub")).unwrap();
        library.add(dune()).unwrap();
        library.mark_loaned("Dune").unwrap();

        let written = library.save().unwrap();
        assert_eq!(written, 2);

        let reloaded = Library::open(&path);
        assert_eq!(reloaded.books(), library.books());

        let digital = reloaded.find_exact("1984").unwrap();
        assert!(digital.is_digital());
        assert_eq!(digital.format.as_deref(), Some("ePub"));
        assert_eq!(digital.state, BookState::Available);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);

        let mut library = Library::open(&path);
        library.add(dune()).unwrap();
        library.add(Book::new("1984", "Orwell", "1949")).unwrap();
        library.save().unwrap();

        library.remove("1984").unwrap();
        library.save().unwrap();

        let reloaded = Library::open(&path);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.find_exact("1984").is_none());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);

        let record = serde_json::to_string(&dune()).unwrap();
        fs::write(&path, format!("\n{}\n\n", record)).unwrap();

        let library = Library::open(&path);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_malformed_line_aborts_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);

        let record = serde_json::to_string(&dune()).unwrap();
        fs::write(&path, format!("{}\nnot a record\n", record)).unwrap();

        let library = Library::open(&path);
        assert!(library.is_empty(), "load is all-or-nothing");
    }
}
