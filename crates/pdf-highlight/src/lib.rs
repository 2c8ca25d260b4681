//! PDF backend for keypoint highlighting
//!
//! Implements [`keypoint_highlighter::HighlightDocument`] on top of lopdf:
//! page text and search come from glyph positions reported by pdf-extract,
//! and matches become `/Highlight` annotations with a multiply appearance
//! stream so they render the same in every viewer.
//!
//! ```no_run
//! use keypoint_highlighter::HighlightConfig;
//! use std::path::Path;
//!
//! let report = pdf_highlight::highlight_files(
//!     Path::new("report.pdf"),
//!     Path::new("keypoints.json"),
//!     Path::new("report_highlighted.pdf"),
//!     &HighlightConfig::default(),
//! )?;
//! println!("{}", report);
//! # Ok::<(), keypoint_highlighter::HighlightError>(())
//! ```

pub mod annotate;
pub mod document;
pub mod layout;
pub mod search;

pub use annotate::ExistingHighlight;
pub use document::PdfDocument;

use keypoint_highlighter::{
    load_keypoints, HighlightConfig, HighlightError, HighlightReport, Highlighter,
};
use std::path::Path;
use tracing::info;

/// Load a PDF and a keypoint file, highlight, and save to `output`
pub fn highlight_files(
    pdf: &Path,
    keypoints: &Path,
    output: &Path,
    config: &HighlightConfig,
) -> Result<HighlightReport, HighlightError> {
    let highlighter = Highlighter::from_config(config)?;
    let keypoints = load_keypoints(keypoints)?;
    let doc = PdfDocument::load(pdf)?;
    info!(
        pdf = %pdf.display(),
        keypoints = keypoints.len(),
        "Highlighting keypoints"
    );
    highlighter.run(doc, &keypoints, output)
}
