//! Page text layout
//!
//! pdf-extract walks each page's content stream and decodes every shown
//! character through the font's ToUnicode map, encoding and `/Differences`.
//! [`GlyphCollector`] records those characters with a bounding box in user
//! space. The plain page text is rebuilt from the glyphs, inserting spaces
//! at horizontal gaps and newlines at baseline changes.

use keypoint_highlighter::PdfRect;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Share of the font size above the baseline
const ASCENT: f64 = 0.8;
/// Share of the font size below the baseline
const DESCENT: f64 = 0.2;
/// Horizontal gap (in font-size units) read as a word break
const SPACE_GAP: f64 = 0.15;
/// Baseline shift (in font-size units) read as a line break
const LINE_SHIFT: f64 = 0.5;

/// A shown character with its box
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub rect: PdfRect,
    pub baseline: f64,
    pub font_size: f64,
    pub line: usize,
}

/// A character of the page text; synthesized separators have no glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutChar {
    pub ch: char,
    pub glyph: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub glyphs: Vec<Glyph>,
    pub chars: Vec<LayoutChar>,
}

impl PageLayout {
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// Build from raw glyphs in content order
    pub fn from_glyphs(mut glyphs: Vec<Glyph>) -> Self {
        let mut chars = Vec::with_capacity(glyphs.len());
        let mut line = 0;

        for idx in 0..glyphs.len() {
            if idx > 0 {
                let prev = &glyphs[idx - 1];
                let curr = &glyphs[idx];
                let size = prev.font_size.max(curr.font_size).max(1.0);
                let shifted = (curr.baseline - prev.baseline).abs() > LINE_SHIFT * size;
                let backward = curr.rect.x < prev.rect.x - LINE_SHIFT * size;

                if shifted || backward {
                    line += 1;
                    chars.push(LayoutChar {
                        ch: '\n',
                        glyph: None,
                    });
                } else if curr.rect.x - prev.rect.right() > SPACE_GAP * size
                    && !prev.ch.is_whitespace()
                    && !curr.ch.is_whitespace()
                {
                    chars.push(LayoutChar {
                        ch: ' ',
                        glyph: None,
                    });
                }
            }
            glyphs[idx].line = line;
            chars.push(LayoutChar {
                ch: glyphs[idx].ch,
                glyph: Some(idx),
            });
        }

        Self { glyphs, chars }
    }
}

/// [`OutputDev`] that keeps positioned characters per page
#[derive(Debug, Default)]
pub struct GlyphCollector {
    pages: Vec<Vec<Glyph>>,
    current: Option<usize>,
}

impl GlyphCollector {
    pub fn new(page_count: usize) -> Self {
        Self {
            pages: vec![Vec::new(); page_count],
            current: None,
        }
    }

    pub fn into_layouts(self) -> Vec<PageLayout> {
        self.pages.into_iter().map(PageLayout::from_glyphs).collect()
    }

    fn push(&mut self, glyph: Glyph) {
        if let Some(page) = self.current.and_then(|p| self.pages.get_mut(p)) {
            page.push(glyph);
        }
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        // Page numbers count from 1, in page tree order
        self.current = (page_num as usize).checked_sub(1);
        if let Some(page) = self.current {
            if page >= self.pages.len() {
                self.pages.resize(page + 1, Vec::new());
            }
        }
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.current = None;
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let chars = expand_ligatures(char);
        let size = font_size.abs() * (trm.m21 * trm.m21 + trm.m22 * trm.m22).sqrt();
        if chars.is_empty() || size <= 0.0 {
            return Ok(());
        }

        // `width` is in text space units; the matrix carries Tz and the CTM
        let x0 = trm.m31;
        let x1 = trm.m31 + width * font_size * trm.m11;
        let baseline = trm.m32;
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let step = (right - left) / chars.len() as f64;

        for (i, ch) in chars.into_iter().enumerate() {
            self.push(Glyph {
                ch,
                rect: PdfRect::new(
                    left + step * i as f64,
                    baseline - DESCENT * size,
                    step,
                    (ASCENT + DESCENT) * size,
                ),
                baseline,
                font_size: size,
                line: 0,
            });
        }
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Latin presentation-form ligatures spelled out, other text unchanged
fn expand_ligatures(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => out.extend(['f', 'f']),
            '\u{FB01}' => out.extend(['f', 'i']),
            '\u{FB02}' => out.extend(['f', 'l']),
            '\u{FB03}' => out.extend(['f', 'f', 'i']),
            '\u{FB04}' => out.extend(['f', 'f', 'l']),
            '\u{FB05}' | '\u{FB06}' => out.extend(['s', 't']),
            '\0' => {}
            other => out.push(other),
        }
    }
    out
}

/// Lay out every page of a serialized PDF
///
/// Always returns `page_count` layouts. Text extraction failures (including
/// panics inside pdf-extract on malformed input) leave the pages empty so
/// keypoints on them are reported as misses.
pub fn layout_pages(bytes: &[u8], page_count: usize) -> Vec<PageLayout> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        let doc = pdf_extract::Document::load_mem(bytes)
            .map_err(|e| format!("Failed to parse PDF for text extraction: {}", e))?;
        let mut collector = GlyphCollector::new(page_count);
        pdf_extract::output_doc(&doc, &mut collector)
            .map_err(|e| format!("Text extraction failed: {}", e))?;
        Ok::<_, String>(collector)
    }));

    let mut layouts = match result {
        Ok(Ok(collector)) => collector.into_layouts(),
        Ok(Err(e)) => {
            warn!(error = %e, "Page text unavailable");
            Vec::new()
        }
        Err(_) => {
            warn!("Text extraction panicked (malformed PDF)");
            Vec::new()
        }
    };
    layouts.resize_with(page_count, PageLayout::default);
    debug!(
        pages = page_count,
        glyphs = layouts.iter().map(|l| l.glyphs.len()).sum::<usize>(),
        "Laid out page text"
    );
    layouts
}
