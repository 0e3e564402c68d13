//! Page-walking bookmark assembly.
//!
//! The assembler re-emits every page of a source document into a new
//! output document, in strict page order, inserting bookmark entries at
//! the page each one targets. The output is append-only: a page is never
//! revisited once emitted, and the file is only written after the last
//! page, so a fatal error earlier in the pipeline leaves nothing behind.

use lopdf::{dictionary, Bookmark, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{OutlineEntry, MAX_LEVEL, MIN_LEVEL};

/// Page-tree attributes that children inherit from their ancestors.
const INHERITED_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Options for the assembly pass.
#[derive(Debug, Clone)]
pub struct AttachOptions {
    /// Title of the synthetic root bookmark inserted before all content
    pub toc_title: String,
}

impl AttachOptions {
    /// Create new attach options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the synthetic root bookmark title.
    pub fn with_toc_title(mut self, title: impl Into<String>) -> Self {
        self.toc_title = title.into();
        self
    }
}

impl Default for AttachOptions {
    fn default() -> Self {
        Self {
            toc_title: "Table of Contents".to_string(),
        }
    }
}

/// Counts reported after an assembly run.
///
/// The synthetic root bookmark is not counted; `added` and `failed`
/// cover only the caller's entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachSummary {
    /// Entries registered in the outline tree
    pub added: u32,
    /// Entries rejected twice (at their own level and at the deepest)
    pub failed: u32,
    /// Entries whose target page lies beyond the last page
    pub skipped: u32,
}

/// Why a single placement attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlacementError {
    /// Level outside the supported range
    InvalidLevel(u8),
    /// No open parent one level up
    MissingParent(u8),
    /// No open ancestor at any level
    NoAncestor,
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::InvalidLevel(level) => {
                write!(f, "level {} outside {}..={}", level, MIN_LEVEL, MAX_LEVEL)
            }
            PlacementError::MissingParent(level) => {
                write!(f, "no open parent for level {}", level)
            }
            PlacementError::NoAncestor => write!(f, "no open ancestor"),
        }
    }
}

/// Attach `entries` to the document at `input`, writing the result to
/// `output`.
///
/// Convenience wrapper around [`Assembler`]: loads the source, walks its
/// pages, and returns the summary counts.
pub fn add_outline<P, Q>(
    input: P,
    output: Q,
    entries: &[OutlineEntry],
    options: &AttachOptions,
) -> Result<AttachSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = Document::load(input.as_ref())?;
    let mut assembler = Assembler::new(source, options.clone());
    assembler.assemble(entries)?;
    assembler.finish(output.as_ref())
}

/// Streams source pages into a new document and registers bookmarks at
/// page boundaries.
///
/// Lifecycle: [`Assembler::new`] (copy shared objects, seed the root
/// bookmark), [`Assembler::assemble`] (per-page emit + insert), then
/// [`Assembler::finish`] (page tree, outline tree, save).
pub struct Assembler {
    source: Document,
    output: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    /// Most recently registered bookmark per level; index 0 = level 1.
    open: [Option<u32>; MAX_LEVEL as usize],
    added: u32,
    failed: u32,
    skipped: u32,
}

impl Assembler {
    /// Start an output document for `source`.
    ///
    /// Copies every source object except the catalog, the page tree and
    /// any existing outline into the output under its original id, so
    /// references inside page dictionaries stay valid and streams pass
    /// through without being decompressed. The synthetic root bookmark
    /// is seeded here, before any page, targeting the first page.
    pub fn new(source: Document, options: AttachOptions) -> Self {
        let mut output = Document::with_version(source.version.clone());

        for (id, object) in &source.objects {
            let kind = object
                .as_dict()
                .and_then(|dict| dict.get(b"Type"))
                .and_then(Object::as_name)
                .unwrap_or(b"");
            match kind {
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" => {}
                _ => {
                    output.objects.insert(*id, object.clone());
                }
            }
        }
        output.max_id = source.max_id;
        let pages_id = output.new_object_id();

        let first_page = source
            .get_pages()
            .into_values()
            .next()
            // fixed up by adjust_zero_pages() when the source has no pages
            .unwrap_or((0, 0));
        let root = output.add_bookmark(
            Bookmark::new(options.toc_title, [0.0; 3], 0, first_page),
            None,
        );

        let mut open = [None; MAX_LEVEL as usize];
        open[0] = Some(root);

        Self {
            source,
            output,
            pages_id,
            kids: Vec::new(),
            open,
            added: 0,
            failed: 0,
            skipped: 0,
        }
    }

    /// Walk the source pages in increasing order, emitting each page and
    /// then the entries that target it.
    ///
    /// Entries targeting a page beyond the last one are never reached by
    /// the walk; they are counted as skipped and logged, not failed.
    pub fn assemble(&mut self, entries: &[OutlineEntry]) -> Result<()> {
        let pages: Vec<ObjectId> = self.source.get_pages().into_values().collect();

        for (idx, page_id) in pages.iter().enumerate() {
            let emitted = self.emit_page(*page_id)?;
            for entry in entries.iter().filter(|e| e.page_index == idx) {
                self.insert_entry(emitted, entry);
            }
        }

        let out_of_range = entries
            .iter()
            .filter(|e| e.page_index >= pages.len())
            .count() as u32;
        if out_of_range > 0 {
            log::warn!(
                "{} outline entries target pages beyond the last page ({}) and were skipped",
                out_of_range,
                pages.len()
            );
        }
        self.skipped += out_of_range;
        Ok(())
    }

    /// Close the page tree and the outline, persist the document.
    ///
    /// This is the only place the output file is created.
    pub fn finish(mut self, output_path: &Path) -> Result<AttachSummary> {
        let page_count = self.kids.len();
        self.output.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => page_count as i64,
                "Kids" => std::mem::take(&mut self.kids),
            }),
        );

        let catalog_id = self.output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.output.trailer.set("Root", catalog_id);
        if let Ok(info) = self.source.trailer.get(b"Info") {
            self.output.trailer.set("Info", info.clone());
        }

        self.output.adjust_zero_pages();
        if let Some(outline_id) = self.output.build_outline() {
            if let Ok(Object::Dictionary(catalog)) = self.output.get_object_mut(catalog_id) {
                catalog.set("Outlines", Object::Reference(outline_id));
            }
        }

        self.output.save(output_path)?;
        log::info!("wrote {} pages to {}", page_count, output_path.display());

        Ok(AttachSummary {
            added: self.added,
            failed: self.failed,
            skipped: self.skipped,
        })
    }

    /// Reproduce one source page in the output at its original
    /// dimensions.
    fn emit_page(&mut self, page_id: ObjectId) -> Result<ObjectId> {
        let mut page = self
            .source
            .get_dictionary(page_id)
            .map_err(|_| Error::MissingObject(format!("page object {} {}", page_id.0, page_id.1)))?
            .clone();
        page.set("Parent", self.pages_id);

        // Attributes the page inherited from its source ancestors must
        // become explicit: those ancestors are not copied.
        for key in INHERITED_PAGE_KEYS {
            if !page.has(key) {
                if let Some(value) = self.inherited_attribute(page_id, key) {
                    page.set(key, value);
                }
            }
        }

        self.output.objects.insert(page_id, Object::Dictionary(page));
        self.kids.push(page_id.into());
        Ok(page_id)
    }

    /// Walk the source `Parent` chain looking for an inheritable value.
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = self.source.get_dictionary(page_id).ok()?;
        // depth guard against malformed circular page trees
        for _ in 0..32 {
            let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
            current = self.source.get_dictionary(parent).ok()?;
            if let Ok(value) = current.get(key) {
                return Some(value.clone());
            }
        }
        None
    }

    /// Insert one entry: try at its own level, retry once at the deepest
    /// level, then count the failure and move on.
    fn insert_entry(&mut self, page_id: ObjectId, entry: &OutlineEntry) {
        match self.place(page_id, entry, entry.level) {
            Ok(()) => self.added += 1,
            Err(first) => {
                log::debug!(
                    "entry '{}' rejected at level {}: {}",
                    entry.title,
                    entry.level,
                    first
                );
                match self.place_deepest(page_id, entry) {
                    Ok(()) => self.added += 1,
                    Err(second) => {
                        log::warn!("entry '{}' dropped: {}", entry.title, second);
                        self.failed += 1;
                    }
                }
            }
        }
    }

    /// One placement attempt at an exact level: level 1 entries are root
    /// siblings, deeper entries require an open parent one level up.
    fn place(
        &mut self,
        page_id: ObjectId,
        entry: &OutlineEntry,
        level: u8,
    ) -> std::result::Result<(), PlacementError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(PlacementError::InvalidLevel(level));
        }
        let parent = if level == MIN_LEVEL {
            None
        } else {
            Some(
                self.open[(level - 2) as usize].ok_or(PlacementError::MissingParent(level))?,
            )
        };
        self.register(page_id, entry, level, parent);
        Ok(())
    }

    /// The demotion retry: deepest level, under the nearest open
    /// ancestor.
    fn place_deepest(
        &mut self,
        page_id: ObjectId,
        entry: &OutlineEntry,
    ) -> std::result::Result<(), PlacementError> {
        let parent = self.open[..(MAX_LEVEL - 1) as usize]
            .iter()
            .rev()
            .find_map(|slot| *slot)
            .ok_or(PlacementError::NoAncestor)?;
        self.register(page_id, entry, MAX_LEVEL, Some(parent));
        Ok(())
    }

    /// Register the bookmark and update the open-ancestor slots: the new
    /// entry becomes the open parent at its level, and everything deeper
    /// is closed.
    fn register(&mut self, page_id: ObjectId, entry: &OutlineEntry, level: u8, parent: Option<u32>) {
        let id = self.output.add_bookmark(
            Bookmark::new(entry.title.clone(), [0.0; 3], 0, page_id),
            parent,
        );
        self.open[(level - 1) as usize] = Some(id);
        for slot in self.open[level as usize..].iter_mut() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    fn sample_doc(page_count: usize) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for i in 0..page_count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_root_bookmark_opens_level_one() {
        let assembler = Assembler::new(sample_doc(1), AttachOptions::default());
        assert!(assembler.open[0].is_some());
        assert!(assembler.open[1].is_none());
        assert!(assembler.open[2].is_none());
    }

    #[test]
    fn test_emit_page_materializes_inherited_attributes() {
        let mut assembler = Assembler::new(sample_doc(2), AttachOptions::default());
        let first = assembler.source.get_pages().into_values().next().unwrap();

        let emitted = assembler.emit_page(first).unwrap();
        let page = assembler.output.get_dictionary(emitted).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
        assert_eq!(
            page.get(b"Parent").unwrap().as_reference().unwrap(),
            assembler.pages_id
        );
    }

    #[test]
    fn test_placement_tracks_open_levels() {
        let mut assembler = Assembler::new(sample_doc(1), AttachOptions::default());
        let page = assembler.source.get_pages().into_values().next().unwrap();

        assembler.insert_entry(page, &OutlineEntry::new("Chapter", 0, 1));
        assembler.insert_entry(page, &OutlineEntry::new("Section", 0, 2));
        assembler.insert_entry(page, &OutlineEntry::new("Column", 0, 3));
        assert_eq!(assembler.added, 3);
        assert_eq!(assembler.failed, 0);
        assert!(assembler.open.iter().all(|slot| slot.is_some()));

        // a new chapter closes the deeper levels
        assembler.insert_entry(page, &OutlineEntry::new("Next chapter", 0, 1));
        assert!(assembler.open[1].is_none());
        assert!(assembler.open[2].is_none());
    }

    #[test]
    fn test_gap_jump_is_demoted_not_dropped() {
        let mut assembler = Assembler::new(sample_doc(1), AttachOptions::default());
        let page = assembler.source.get_pages().into_values().next().unwrap();

        assembler.insert_entry(page, &OutlineEntry::new("Chapter", 0, 1));
        // level 3 with no open level-2 parent: first attempt rejects,
        // the retry lands at the deepest level under the chapter
        assembler.insert_entry(page, &OutlineEntry::new("Column", 0, 3));
        assert_eq!(assembler.added, 2);
        assert_eq!(assembler.failed, 0);
        assert!(assembler.open[2].is_some());
        assert!(assembler.open[1].is_none());
    }

    #[test]
    fn test_malformed_level_is_demoted() {
        let mut assembler = Assembler::new(sample_doc(1), AttachOptions::default());
        let page = assembler.source.get_pages().into_values().next().unwrap();

        assembler.insert_entry(page, &OutlineEntry::new("Zero", 0, 0));
        assembler.insert_entry(page, &OutlineEntry::new("Nine", 0, 9));
        assert_eq!(assembler.added, 2);
        assert_eq!(assembler.failed, 0);
    }

    #[test]
    fn test_unplaceable_entry_counts_as_failed() {
        let mut assembler = Assembler::new(sample_doc(1), AttachOptions::default());
        let page = assembler.source.get_pages().into_values().next().unwrap();

        // no open ancestor at all: both attempts reject
        assembler.open = [None; MAX_LEVEL as usize];
        assembler.insert_entry(page, &OutlineEntry::new("Orphan", 0, 2));
        assert_eq!(assembler.added, 0);
        assert_eq!(assembler.failed, 1);
    }

    #[test]
    fn test_out_of_range_entries_are_skipped() {
        let mut assembler = Assembler::new(sample_doc(2), AttachOptions::default());
        let entries = vec![
            OutlineEntry::new("In range", 1, 1),
            OutlineEntry::new("Beyond", 7, 1),
        ];
        assembler.assemble(&entries).unwrap();
        assert_eq!(assembler.added, 1);
        assert_eq!(assembler.failed, 0);
        assert_eq!(assembler.skipped, 1);
    }
}
