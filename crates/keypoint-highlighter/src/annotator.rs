//! Applying highlight marks over found spans

use crate::document::{HighlightDocument, PdfRect};
use crate::error::DocumentError;
use crate::palette::{Palette, Rgb};

/// A span that could not be annotated
#[derive(Debug)]
pub struct SpanFailure {
    /// Index of the span within the batch
    pub span: usize,
    pub source: DocumentError,
}

/// Marks spans with the palette color of their keypoint
#[derive(Debug, Clone)]
pub struct HighlightAnnotator {
    palette: Palette,
    opacity: f32,
}

impl Default for HighlightAnnotator {
    fn default() -> Self {
        Self::new(Palette::default(), 1.0)
    }
}

impl HighlightAnnotator {
    pub fn new(palette: Palette, opacity: f32) -> Self {
        Self { palette, opacity }
    }

    pub fn color_for(&self, keypoint_index: usize) -> Rgb {
        self.palette.color_for(keypoint_index)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Highlight every span on `page` with `color`, returning how many were applied.
    ///
    /// Stops at the first span the document refuses.
    pub fn apply(
        &self,
        doc: &mut dyn HighlightDocument,
        page: usize,
        spans: &[PdfRect],
        color: Rgb,
    ) -> Result<usize, SpanFailure> {
        for (span, rect) in spans.iter().enumerate() {
            doc.add_highlight(page, rect, color, self.opacity)
                .map_err(|source| SpanFailure { span, source })?;
        }
        Ok(spans.len())
    }
}
