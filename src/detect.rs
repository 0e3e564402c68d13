//! Input format detection for outline tables and PDF documents.

use crate::error::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Supported outline table container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Excel workbook (`.xlsx`)
    Xlsx,
    /// Legacy Excel workbook (`.xls`)
    Xls,
    /// Comma-separated values (`.csv`)
    Csv,
    /// Tab-separated values (`.tsv`)
    Tsv,
}

impl TableFormat {
    /// Whether this format is a spreadsheet workbook (as opposed to
    /// delimited text).
    pub fn is_workbook(self) -> bool {
        matches!(self, TableFormat::Xlsx | TableFormat::Xls)
    }

    /// Field delimiter for delimited-text formats.
    pub fn delimiter(self) -> Option<u8> {
        match self {
            TableFormat::Csv => Some(b','),
            TableFormat::Tsv => Some(b'\t'),
            TableFormat::Xlsx | TableFormat::Xls => None,
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableFormat::Xlsx => "xlsx",
            TableFormat::Xls => "xls",
            TableFormat::Csv => "csv",
            TableFormat::Tsv => "tsv",
        };
        write!(f, "{}", name)
    }
}

/// Resolve the outline table format from a file extension.
///
/// Fails with [`Error::UnsupportedTable`] before any row is read.
///
/// # Example
/// ```
/// use tocpdf::detect::{table_format_from_path, TableFormat};
///
/// let format = table_format_from_path("toc.xlsx").unwrap();
/// assert_eq!(format, TableFormat::Xlsx);
/// ```
pub fn table_format_from_path<P: AsRef<Path>>(path: P) -> Result<TableFormat> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match ext.to_ascii_lowercase().as_str() {
        "xlsx" => Ok(TableFormat::Xlsx),
        "xls" => Ok(TableFormat::Xls),
        "csv" => Ok(TableFormat::Csv),
        "tsv" => Ok(TableFormat::Tsv),
        _ if ext.is_empty() => Err(Error::UnsupportedTable(path.display().to_string())),
        _ => Err(Error::UnsupportedTable(format!(".{}", ext))),
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Verify that a file starts with the PDF magic bytes.
///
/// A file that exists but is too short or carries a different header
/// fails with [`Error::NotAPdf`].
pub fn ensure_pdf<P: AsRef<Path>>(path: P) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 8];
    if reader.read_exact(&mut header).is_err() || !is_pdf_bytes(&header) {
        return Err(Error::NotAPdf);
    }
    Ok(())
}

/// Check if a file is a valid PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    ensure_pdf(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_format_extensions() {
        assert_eq!(table_format_from_path("a.xlsx").unwrap(), TableFormat::Xlsx);
        assert_eq!(table_format_from_path("a.xls").unwrap(), TableFormat::Xls);
        assert_eq!(table_format_from_path("a.csv").unwrap(), TableFormat::Csv);
        assert_eq!(table_format_from_path("a.tsv").unwrap(), TableFormat::Tsv);
    }

    #[test]
    fn test_table_format_case_insensitive() {
        assert_eq!(table_format_from_path("A.XLSX").unwrap(), TableFormat::Xlsx);
        assert_eq!(table_format_from_path("b.Csv").unwrap(), TableFormat::Csv);
    }

    #[test]
    fn test_table_format_unsupported() {
        let result = table_format_from_path("toc.txt");
        assert!(matches!(result, Err(Error::UnsupportedTable(ref e)) if e == ".txt"));
    }

    #[test]
    fn test_table_format_no_extension() {
        let result = table_format_from_path("toc");
        assert!(matches!(result, Err(Error::UnsupportedTable(_))));
    }

    #[test]
    fn test_workbook_split() {
        assert!(TableFormat::Xlsx.is_workbook());
        assert!(TableFormat::Xls.is_workbook());
        assert!(!TableFormat::Csv.is_workbook());
        assert_eq!(TableFormat::Tsv.delimiter(), Some(b'\t'));
        assert_eq!(TableFormat::Xlsx.delimiter(), None);
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\ntest"));
        assert!(!is_pdf_bytes(b"Not a PDF file"));
        assert!(!is_pdf_bytes(b""));
    }
}
