//! Workbook loading via calamine.

use calamine::{open_workbook_auto, Data, Reader};

use super::{resolve_columns, TableOptions};
use crate::error::{Error, Result};
use crate::model::OutlineRow;
use std::path::Path;

/// Load validated rows from a spreadsheet workbook.
///
/// The first row of the selected sheet is the header row. Column
/// validation happens before any data row is touched.
pub(crate) fn load_rows(path: &Path, options: &TableOptions) -> Result<Vec<OutlineRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let sheet_name = match &options.sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(Error::SheetNotFound(name.clone()));
            }
            name.clone()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| Error::Table("workbook has no sheets".to_string()))?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut row_iter = range.rows();

    let header_row = row_iter
        .next()
        .ok_or_else(|| Error::MissingColumn(options.page_col.clone()))?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    let (page_ix, class_ix, title_ix) = resolve_columns(&headers, options)?;

    let mut rows = Vec::new();
    for (idx, row) in row_iter.enumerate() {
        // 1-based position in the sheet, after the header row
        let row_num = idx + 2;
        let page = row.get(page_ix).and_then(page_text);
        let klass = row.get(class_ix).and_then(cell_text);
        let title = row.get(title_ix).and_then(cell_text);

        if let Some(row) =
            OutlineRow::from_cells(row_num, page.as_deref(), klass.as_deref(), title.as_deref())?
        {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Text content of a cell; `None` for empty and error cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => {
            log::debug!("skipping error cell: {:?}", e);
            None
        }
    }
}

/// Page-cell variant: numeric cells truncate to an integer, the way the
/// page column of a spreadsheet is usually typed (12.0 means 12).
fn page_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.is_finite() => Some((*f as i64).to_string()),
        _ => cell_text(cell),
    }
}

/// Integral floats print without the trailing ".0".
fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}
