//! Outline table loading options.

/// Options for loading an outline table.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Worksheet to read (workbook formats only; `None` = first sheet)
    pub sheet: Option<String>,

    /// Name of the page-number column
    pub page_col: String,

    /// Name of the classification column
    pub class_col: String,

    /// Name of the title column
    pub title_col: String,
}

impl TableOptions {
    /// Create new table options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a worksheet by name (workbook formats only).
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Override the page-number column name.
    pub fn with_page_col(mut self, name: impl Into<String>) -> Self {
        self.page_col = name.into();
        self
    }

    /// Override the classification column name.
    pub fn with_class_col(mut self, name: impl Into<String>) -> Self {
        self.class_col = name.into();
        self
    }

    /// Override the title column name.
    pub fn with_title_col(mut self, name: impl Into<String>) -> Self {
        self.title_col = name.into();
        self
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            page_col: "page".to_string(),
            class_col: "class".to_string(),
            title_col: "title".to_string(),
        }
    }
}
