//! Error types for the tocpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for tocpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while attaching an outline.
///
/// Everything here is fatal to the run; a rejected outline entry is not
/// an `Error` but a count in
/// [`AttachSummary`](crate::assemble::AttachSummary).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The outline table file extension is not a supported format.
    #[error("Unsupported outline table format: {0}")]
    UnsupportedTable(String),

    /// A required column is absent from the outline table.
    #[error("Column '{0}' not found in outline table")]
    MissingColumn(String),

    /// The requested worksheet does not exist in the workbook.
    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// A page cell was present but could not be coerced to an integer.
    #[error("Row {row}: invalid page number '{value}'")]
    InvalidPageNumber { row: usize, value: String },

    /// No outline entries survived normalization.
    #[error("No outline entries left after filtering")]
    EmptyOutline,

    /// Error reading the outline table content.
    #[error("Outline table read error: {0}")]
    Table(String),

    /// The input document is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    NotAPdf,

    /// Error parsing or writing PDF structure.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// A required PDF object is missing or malformed.
    #[error("Missing required object: {0}")]
    MissingObject(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Error::Io(e),
            _ => Error::Table(err.to_string()),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let msg = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            _ => Error::Table(msg),
        }
    }
}
