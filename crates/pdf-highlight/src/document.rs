//! lopdf-backed [`HighlightDocument`]

use crate::annotate::{add_highlight_annotation, read_highlights, ExistingHighlight};
use crate::layout::{layout_pages, PageLayout};
use crate::search::find_rects;
use keypoint_highlighter::{DocumentError, HighlightDocument, HighlightError, PdfRect, Rgb};
use lopdf::{Document, ObjectId};
use std::cell::OnceCell;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// An open PDF with lazily computed page layouts
pub struct PdfDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
    /// Bytes the document was parsed from, for text extraction
    source: Vec<u8>,
    layouts: OnceCell<Vec<PageLayout>>,
}

impl PdfDocument {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HighlightError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            HighlightError::Load(format!("Failed to open PDF {}: {}", path.display(), e))
        })?;
        Self::load_mem(&bytes).map_err(|e| {
            HighlightError::Load(format!("Failed to open PDF {}: {}", path.display(), e))
        })
    }

    pub fn load_mem(bytes: &[u8]) -> Result<Self, DocumentError> {
        let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;
        Ok(Self::with_source(doc, bytes.to_vec()))
    }

    pub fn from_document(mut doc: Document) -> Result<Self, DocumentError> {
        let mut source = Vec::new();
        doc.save_to(&mut source)
            .map_err(|e| DocumentError::Corrupt(format!("Failed to serialize PDF: {}", e)))?;
        Ok(Self::with_source(doc, source))
    }

    fn with_source(doc: Document, source: Vec<u8>) -> Self {
        // get_pages is keyed by 1-based page number, so values come out in page order
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        debug!(pages = page_ids.len(), "Opened PDF");
        Self {
            doc,
            page_ids,
            source,
            layouts: OnceCell::new(),
        }
    }

    /// Highlight annotations currently on the document
    pub fn highlights(&self) -> Vec<ExistingHighlight> {
        read_highlights(&self.doc, &self.page_ids)
    }

    pub fn inner(&self) -> &Document {
        &self.doc
    }

    fn page_id(&self, page: usize) -> Result<ObjectId, DocumentError> {
        self.page_ids
            .get(page)
            .copied()
            .ok_or(DocumentError::PageOutOfRange {
                page,
                page_count: self.page_ids.len(),
            })
    }

    /// Text layout of one page; the first call lays out the whole document
    fn layout(&self, page: usize) -> Result<&PageLayout, DocumentError> {
        self.page_id(page)?;
        let layouts = self
            .layouts
            .get_or_init(|| layout_pages(&self.source, self.page_ids.len()));
        layouts.get(page).ok_or(DocumentError::PageOutOfRange {
            page,
            page_count: layouts.len(),
        })
    }
}

impl HighlightDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_text(&self, page: usize) -> Result<String, DocumentError> {
        Ok(self.layout(page)?.text())
    }

    fn search(&self, page: usize, needle: &str) -> Result<Vec<PdfRect>, DocumentError> {
        Ok(find_rects(self.layout(page)?, needle))
    }

    fn add_highlight(
        &mut self,
        page: usize,
        rect: &PdfRect,
        color: Rgb,
        opacity: f32,
    ) -> Result<(), DocumentError> {
        let page_id = self.page_id(page)?;
        add_highlight_annotation(&mut self.doc, page_id, rect, color, opacity)?;
        Ok(())
    }

    /// Writes to a temporary file next to `path`, then renames it into place
    fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        self.doc
            .save_to(tmp.as_file_mut())
            .map_err(|e| DocumentError::Corrupt(format!("Failed to serialize PDF: {}", e)))?;
        tmp.as_file_mut().flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| DocumentError::Io(e.error))?;
        debug!(path = %path.display(), "Saved PDF");
        Ok(())
    }
}
