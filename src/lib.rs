//! # tocpdf
//!
//! Attach a hierarchical bookmark outline to an existing PDF, driven by
//! a spreadsheet or delimited table.
//!
//! The outline source is a table with three columns: a 1-based page
//! number, a classification label, and a title. Classifications map to
//! nesting levels (chapter, section, deepest), logical page numbers are
//! shifted by a constant offset into physical page indices, and every
//! page of the input is reproduced verbatim in the output with the
//! bookmark tree attached.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tocpdf::Tocpdf;
//!
//! fn main() -> tocpdf::Result<()> {
//!     let summary = Tocpdf::new()
//!         .with_page_offset(20)
//!         .run("book.pdf", "toc.xlsx", "book_with_toc.pdf")?;
//!     println!("added {} bookmarks ({} failed)", summary.added, summary.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Table formats**: XLSX/XLS workbooks and CSV/TSV delimited text
//! - **Three nesting levels**: configurable classification mapping,
//!   unknown labels sink to the deepest level
//! - **Verbatim pages**: original dimensions, untouched content streams
//! - **Resilient insertion**: per-entry demotion retry; one bad row
//!   never aborts a run

pub mod assemble;
pub mod detect;
pub mod error;
pub mod model;
pub mod table;

// Re-export commonly used types
pub use assemble::{add_outline, AttachOptions, AttachSummary};
pub use detect::TableFormat;
pub use error::{Error, Result};
pub use model::{LevelMap, OutlineEntry, OutlineRow, MAX_LEVEL, MIN_LEVEL};
pub use table::{OutlineTable, TableOptions};

use std::path::Path;

/// Attach the outline described by `table` to `input_pdf`, writing the
/// result to `output_pdf`, with all defaults.
///
/// # Example
///
/// ```no_run
/// let summary = tocpdf::attach_file("book.pdf", "toc.csv", "out.pdf").unwrap();
/// println!("{} bookmarks", summary.added);
/// ```
pub fn attach_file<P, Q, R>(input_pdf: P, table: Q, output_pdf: R) -> Result<AttachSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    Tocpdf::new().run(input_pdf, table, output_pdf)
}

/// Builder for the full attach pipeline.
///
/// # Example
///
/// ```no_run
/// use tocpdf::{LevelMap, Tocpdf};
///
/// let summary = Tocpdf::new()
///     .with_sheet("TOC")
///     .with_page_offset(20)
///     .with_levels(LevelMap::empty().with("part", 1).with("chapter", 2))
///     .with_toc_title("Contents")
///     .run("book.pdf", "toc.xlsx", "out.pdf")?;
/// # Ok::<(), tocpdf::Error>(())
/// ```
pub struct Tocpdf {
    table: TableOptions,
    attach: AttachOptions,
    levels: LevelMap,
    page_offset: i64,
}

impl Tocpdf {
    /// Create a new pipeline builder with defaults.
    pub fn new() -> Self {
        Self {
            table: TableOptions::default(),
            attach: AttachOptions::default(),
            levels: LevelMap::default(),
            page_offset: 0,
        }
    }

    /// Select a worksheet by name (workbook formats only).
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.table = self.table.with_sheet(sheet);
        self
    }

    /// Override the page-number column name.
    pub fn with_page_col(mut self, name: impl Into<String>) -> Self {
        self.table = self.table.with_page_col(name);
        self
    }

    /// Override the classification column name.
    pub fn with_class_col(mut self, name: impl Into<String>) -> Self {
        self.table = self.table.with_class_col(name);
        self
    }

    /// Override the title column name.
    pub fn with_title_col(mut self, name: impl Into<String>) -> Self {
        self.table = self.table.with_title_col(name);
        self
    }

    /// Set the logical-to-physical page offset (may be negative).
    pub fn with_page_offset(mut self, offset: i64) -> Self {
        self.page_offset = offset;
        self
    }

    /// Replace the classification-to-level mapping.
    pub fn with_levels(mut self, levels: LevelMap) -> Self {
        self.levels = levels;
        self
    }

    /// Override the synthetic root bookmark title.
    pub fn with_toc_title(mut self, title: impl Into<String>) -> Self {
        self.attach = self.attach.with_toc_title(title);
        self
    }

    /// Load the table and normalize it into bookmark entries, without
    /// touching the PDF.
    ///
    /// Fails with [`Error::EmptyOutline`] when nothing survives
    /// filtering, so a bookmark-free output is never produced silently.
    pub fn plan<P: AsRef<Path>>(&self, table: P) -> Result<Vec<OutlineEntry>> {
        let table = table::load(table, &self.table)?;
        let entries = table.to_entries(self.page_offset, &self.levels);
        if entries.is_empty() {
            return Err(Error::EmptyOutline);
        }
        Ok(entries)
    }

    /// Attach already-planned entries to a PDF.
    pub fn attach<P, R>(
        &self,
        input_pdf: P,
        entries: &[OutlineEntry],
        output_pdf: R,
    ) -> Result<AttachSummary>
    where
        P: AsRef<Path>,
        R: AsRef<Path>,
    {
        detect::ensure_pdf(input_pdf.as_ref())?;
        assemble::add_outline(input_pdf, output_pdf, entries, &self.attach)
    }

    /// Run the full pipeline: plan, verify the PDF, assemble, save.
    pub fn run<P, Q, R>(&self, input_pdf: P, table: Q, output_pdf: R) -> Result<AttachSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let entries = self.plan(table)?;
        self.attach(input_pdf, &entries, output_pdf)
    }
}

impl Default for Tocpdf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let pipeline = Tocpdf::default();
        assert_eq!(pipeline.page_offset, 0);
        assert_eq!(pipeline.table.page_col, "page");
        assert_eq!(pipeline.attach.toc_title, "Table of Contents");
    }

    #[test]
    fn test_builder_chained() {
        let pipeline = Tocpdf::new()
            .with_sheet("TOC")
            .with_page_col("pg")
            .with_class_col("kind")
            .with_title_col("label")
            .with_page_offset(-3)
            .with_toc_title("Contents");

        assert_eq!(pipeline.table.sheet.as_deref(), Some("TOC"));
        assert_eq!(pipeline.table.page_col, "pg");
        assert_eq!(pipeline.table.class_col, "kind");
        assert_eq!(pipeline.table.title_col, "label");
        assert_eq!(pipeline.page_offset, -3);
        assert_eq!(pipeline.attach.toc_title, "Contents");
    }

    #[test]
    fn test_plan_unsupported_extension() {
        let result = Tocpdf::new().plan("outline.txt");
        assert!(matches!(result, Err(Error::UnsupportedTable(_))));
    }
}
