//! Planned bookmark entries and the classification-to-level mapping.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shallowest outline nesting level (top-level chapter).
pub const MIN_LEVEL: u8 = 1;

/// Deepest supported outline nesting level.
pub const MAX_LEVEL: u8 = 3;

/// A planned bookmark: title, target page, nesting level.
///
/// `page_index` is the 0-based position in the PDF file, already offset
/// from the logical page number in the source table. Entries produced by
/// [`OutlineTable::to_entries`](crate::table::OutlineTable::to_entries)
/// always have `level` within `[MIN_LEVEL, MAX_LEVEL]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Bookmark label
    pub title: String,
    /// 0-based index of the target page in the PDF file
    pub page_index: usize,
    /// Nesting level (1 = chapter, 3 = deepest)
    pub level: u8,
}

impl OutlineEntry {
    /// Create an entry.
    pub fn new(title: impl Into<String>, page_index: usize, level: u8) -> Self {
        Self {
            title: title.into(),
            page_index,
            level,
        }
    }
}

/// Immutable mapping from classification labels to nesting levels.
///
/// Built once at startup and passed explicitly into normalization; any
/// label absent from the map sinks to the deepest level.
#[derive(Debug, Clone)]
pub struct LevelMap {
    levels: HashMap<String, u8>,
}

impl LevelMap {
    /// Empty mapping: every classification maps to the deepest level.
    pub fn empty() -> Self {
        Self {
            levels: HashMap::new(),
        }
    }

    /// Register a classification label. Levels outside `[1, 3]` are
    /// clamped.
    pub fn with(mut self, label: impl Into<String>, level: u8) -> Self {
        self.levels
            .insert(label.into(), level.clamp(MIN_LEVEL, MAX_LEVEL));
        self
    }

    /// Look up the level for a classification label.
    pub fn level_for(&self, klass: &str) -> u8 {
        self.levels.get(klass).copied().unwrap_or(MAX_LEVEL)
    }

    /// Number of registered labels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no labels are registered.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelMap {
    /// The built-in mapping: chapters (`章`) at level 1, sections (`節`)
    /// at level 2, columns at level 3.
    fn default() -> Self {
        Self::empty().with("章", 1).with("節", 2).with("column", 3)
    }
}
