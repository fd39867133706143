// 📚 Book Entity - Catalog entries with a plain/digital variant
//
// One common shape covers both variants: a digital edition is a book whose
// `format` field is present, and the wire record carries a `type`
// discriminator so each persisted line is self-describing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LibraryError;

// ============================================================================
// BOOK STATE
// ============================================================================

/// Loan state of a catalog entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookState {
    /// On the shelf, can be loaned out
    #[default]
    Available,
    /// Currently loaned out
    Loaned,
}

impl BookState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookState::Available => "Available",
            BookState::Loaned => "Loaned",
        }
    }
}

impl fmt::Display for BookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookState {
    type Err = LibraryError;

    /// Accepts exactly "Available" or "Loaned"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(BookState::Available),
            "Loaned" => Ok(BookState::Loaned),
            other => Err(LibraryError::InvalidState(other.to_string())),
        }
    }
}

// Persisted as the plain state string. Deserialization funnels through
// `FromStr` so a tampered state value in the store is rejected with the same
// InvalidState error as a bad direct assignment.
impl Serialize for BookState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// BOOK KIND
// ============================================================================

/// Variant discriminator for the wire record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookKind {
    /// Physical book, no format field
    Plain,
    /// Digital edition, carries a format (e.g. "PDF", "ePub")
    Digital,
}

impl BookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookKind::Plain => "plain",
            BookKind::Digital => "digital",
        }
    }
}

// ============================================================================
// BOOK ENTITY
// ============================================================================

/// One catalog entry
///
/// The title doubles as the catalog key (case-insensitive, enforced by the
/// store at insertion). The publication year is opaque text: it is stored
/// and displayed, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookRecord", into = "BookRecord")]
pub struct Book {
    pub title: String,
    pub author: String,
    pub publication_year: String,
    pub state: BookState,
    /// Present only for digital editions
    pub format: Option<String>,
}

impl Book {
    /// Create a plain book, initially available
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: impl Into<String>,
    ) -> Self {
        Book {
            title: title.into(),
            author: author.into(),
            publication_year: publication_year.into(),
            state: BookState::default(),
            format: None,
        }
    }

    /// Create a digital edition, initially available
    pub fn digital(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Book {
            format: Some(format.into()),
            ..Book::new(title, author, publication_year)
        }
    }

    /// Variant discriminator, derived from format presence
    pub fn kind(&self) -> BookKind {
        if self.format.is_some() {
            BookKind::Digital
        } else {
            BookKind::Plain
        }
    }

    pub fn is_digital(&self) -> bool {
        self.format.is_some()
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}, Author: {}, Year: {}, State: {}",
            self.title, self.author, self.publication_year, self.state
        )?;
        if let Some(format) = &self.format {
            write!(f, ", Format: {}", format)?;
        }
        Ok(())
    }
}

// ============================================================================
// WIRE RECORD
// ============================================================================

/// Line-oriented wire form of a catalog entry
///
/// One JSON object per line in the backing file. The `type` field selects
/// the variant; `format` is written only for digital records and is required
/// when reading one back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "type")]
    pub kind: BookKind,
    pub title: String,
    pub author: String,
    pub publication_year: String,
    pub state: BookState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        let kind = book.kind();
        BookRecord {
            kind,
            title: book.title,
            author: book.author,
            publication_year: book.publication_year,
            state: book.state,
            format: book.format,
        }
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = LibraryError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let format = match record.kind {
            BookKind::Digital => match record.format {
                Some(format) => Some(format),
                None => {
                    return Err(LibraryError::MalformedRecord(format!(
                        "digital book '{}' has no format",
                        record.title
                    )))
                }
            },
            // A stray format on a plain record is dropped
            BookKind::Plain => None,
        };

        Ok(Book {
            title: record.title,
            author: record.author,
            publication_year: record.publication_year,
            state: record.state,
            format,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
