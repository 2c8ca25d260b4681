//! Document capability interface
//!
//! The highlighter never touches a concrete file format. Anything that can
//! report its pages' text, locate literal text as rectangles, attach a
//! colored highlight and save itself can be highlighted.

use crate::error::DocumentError;
use crate::palette::Rgb;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rectangle in PDF user space (points, origin bottom-left)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two opposite corners in any order
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let (left, right) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (bottom, top) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self::new(left, bottom, right - left, top - bottom)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &PdfRect) -> PdfRect {
        PdfRect::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.top().max(other.top()),
        )
    }
}

/// Operations the highlighter needs from a paginated document.
///
/// Page indices are 0-based.
pub trait HighlightDocument {
    fn page_count(&self) -> usize;

    /// Plain text of a page, in reading order
    fn page_text(&self, page: usize) -> Result<String, DocumentError>;

    /// Every occurrence of `needle` on the page, compared case-insensitively
    fn search(&self, page: usize, needle: &str) -> Result<Vec<PdfRect>, DocumentError>;

    /// Attach a highlight over `rect` and make it part of the page content
    fn add_highlight(
        &mut self,
        page: usize,
        rect: &PdfRect,
        color: Rgb,
        opacity: f32,
    ) -> Result<(), DocumentError>;

    /// Persist the whole document to `path`
    fn save(&mut self, path: &Path) -> Result<(), DocumentError>;
}
