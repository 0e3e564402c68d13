//! Delimited text loading via the csv crate.

use csv::ReaderBuilder;

use super::{resolve_columns, TableOptions};
use crate::detect::TableFormat;
use crate::error::Result;
use crate::model::OutlineRow;
use std::path::Path;

/// Load validated rows from a CSV or TSV file.
pub(crate) fn load_rows(
    path: &Path,
    format: TableFormat,
    options: &TableOptions,
) -> Result<Vec<OutlineRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(format.delimiter().unwrap_or(b','))
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let (page_ix, class_ix, title_ix) = resolve_columns(&headers, options)?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // 1-based position in the file, after the header row
        let row_num = idx + 2;

        if let Some(row) = OutlineRow::from_cells(
            row_num,
            record.get(page_ix),
            record.get(class_ix),
            record.get(title_ix),
        )? {
            rows.push(row);
        }
    }
    Ok(rows)
}
