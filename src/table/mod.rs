//! Outline table loading and normalization.
//!
//! The loader turns a workbook or delimited file into an [`OutlineTable`]
//! of validated rows; [`OutlineTable::to_entries`] then normalizes those
//! rows into the bookmark entries the assembler consumes.
//!
//! # Example
//!
//! ```no_run
//! use tocpdf::model::LevelMap;
//! use tocpdf::table::{self, TableOptions};
//!
//! fn main() -> tocpdf::Result<()> {
//!     let table = table::load("toc.xlsx", &TableOptions::default())?;
//!     let entries = table.to_entries(20, &LevelMap::default());
//!     println!("{} entries planned", entries.len());
//!     Ok(())
//! }
//! ```

mod delimited;
mod options;
mod sheet;

pub use options::TableOptions;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{LevelMap, OutlineEntry, OutlineRow};
use std::path::Path;

/// A loaded outline table: validated rows in source order.
#[derive(Debug, Clone, Default)]
pub struct OutlineTable {
    /// Validated rows, in source order.
    pub rows: Vec<OutlineRow>,
}

impl OutlineTable {
    /// Number of validated rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Normalize rows into bookmark entries.
    ///
    /// For each row, in table order: the classification resolves to a
    /// nesting level through `levels`, and the 1-based logical page
    /// becomes a 0-based physical index via
    /// `logical_page - 1 + page_offset`. Rows whose index computes to a
    /// negative value are dropped; the document may legitimately start
    /// after the numbered pages. Order and duplicates are preserved.
    pub fn to_entries(&self, page_offset: i64, levels: &LevelMap) -> Vec<OutlineEntry> {
        let mut entries = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let page_index = row.logical_page - 1 + page_offset;
            if page_index < 0 {
                log::debug!(
                    "dropping '{}': page {} with offset {} lands before the document",
                    row.title,
                    row.logical_page,
                    page_offset
                );
                continue;
            }
            entries.push(OutlineEntry {
                title: row.title.clone(),
                page_index: page_index as usize,
                level: levels.level_for(&row.klass),
            });
        }
        entries
    }
}

/// Load an outline table, dispatching on the file extension.
///
/// Fails with [`Error::UnsupportedTable`] for unrecognized extensions and
/// [`Error::MissingColumn`] when a required column is absent, both before
/// any data row is processed.
pub fn load<P: AsRef<Path>>(path: P, options: &TableOptions) -> Result<OutlineTable> {
    let path = path.as_ref();
    let format = detect::table_format_from_path(path)?;

    let rows = if format.is_workbook() {
        sheet::load_rows(path, options)?
    } else {
        delimited::load_rows(path, format, options)?
    };

    log::debug!(
        "loaded {} outline rows from {} ({})",
        rows.len(),
        path.display(),
        format
    );
    Ok(OutlineTable { rows })
}

/// Resolve the positions of the three required columns in a header row.
///
/// Fails with [`Error::MissingColumn`] naming the first absent column.
pub(crate) fn resolve_columns(
    headers: &[String],
    options: &TableOptions,
) -> Result<(usize, usize, usize)> {
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    Ok((
        find(&options.page_col)?,
        find(&options.class_col)?,
        find(&options.title_col)?,
    ))
}
