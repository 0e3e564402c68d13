//! Validated outline table rows.

use crate::error::{Error, Result};

/// One validated row of the outline table.
///
/// Rows are only produced by [`OutlineRow::from_cells`]: a row with any
/// missing or blank cell is dropped, and a page cell that is not an
/// integer is a hard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    /// Classification label (maps to a nesting level)
    pub klass: String,
    /// Bookmark label
    pub title: String,
    /// 1-based page number as written in the source table
    pub logical_page: i64,
}

impl OutlineRow {
    /// Build a row from raw cell values.
    ///
    /// Returns `Ok(None)` when any cell is missing or blank (the row is
    /// dropped), and [`Error::InvalidPageNumber`] when the page cell is
    /// present but not an integer. `row` is the 1-based position in the
    /// source table, used in error messages.
    pub fn from_cells(
        row: usize,
        page: Option<&str>,
        klass: Option<&str>,
        title: Option<&str>,
    ) -> Result<Option<Self>> {
        let (page, klass, title) = match (trimmed(page), trimmed(klass), trimmed(title)) {
            (Some(p), Some(k), Some(t)) => (p, k, t),
            _ => return Ok(None),
        };

        let logical_page = page.parse::<i64>().map_err(|_| Error::InvalidPageNumber {
            row,
            value: page.to_string(),
        })?;

        Ok(Some(Self {
            klass: klass.to_string(),
            title: title.to_string(),
            logical_page,
        }))
    }
}

fn trimmed(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}
