//! Literal text search over a page layout
//!
//! Matching ignores case and treats any run of whitespace (including line
//! breaks) as a single space. A hit that wraps across lines produces one
//! rectangle per line.

use crate::layout::PageLayout;
use keypoint_highlighter::PdfRect;

/// Every non-overlapping occurrence of `needle`, as line rectangles
pub fn find_rects(layout: &PageLayout, needle: &str) -> Vec<PdfRect> {
    let needle: Vec<char> = normalize(needle.chars().map(|ch| (ch, None::<usize>)))
        .into_iter()
        .map(|(ch, _)| ch)
        .collect();
    let needle = trim_spaces(&needle);
    if needle.is_empty() {
        return Vec::new();
    }

    let haystack = normalize(layout.chars.iter().map(|c| (c.ch, c.glyph)));
    let mut rects = Vec::new();
    let mut start = 0;

    while start + needle.len() <= haystack.len() {
        let hit = haystack[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|((h, _), n)| h == n);
        if hit {
            let glyphs = haystack[start..start + needle.len()]
                .iter()
                .filter_map(|(_, glyph)| *glyph);
            rects.extend(line_rects(layout, glyphs));
            start += needle.len();
        } else {
            start += 1;
        }
    }

    rects
}

/// Lowercase and collapse whitespace, keeping the source glyph of each char
fn normalize<I>(chars: I) -> Vec<(char, Option<usize>)>
where
    I: Iterator<Item = (char, Option<usize>)>,
{
    let mut out: Vec<(char, Option<usize>)> = Vec::new();
    for (ch, glyph) in chars {
        if ch.is_whitespace() {
            if out.last().map_or(false, |(last, _)| *last != ' ') {
                out.push((' ', None));
            }
            continue;
        }
        for lower in ch.to_lowercase() {
            out.push((lower, glyph));
        }
    }
    out
}

fn trim_spaces(chars: &[char]) -> &[char] {
    let start = chars.iter().position(|c| *c != ' ').unwrap_or(chars.len());
    let end = chars.iter().rposition(|c| *c != ' ').map_or(start, |p| p + 1);
    &chars[start..end]
}

/// Union of glyph boxes, split wherever the line changes
fn line_rects(layout: &PageLayout, glyphs: impl Iterator<Item = usize>) -> Vec<PdfRect> {
    let mut rects: Vec<PdfRect> = Vec::new();
    let mut current_line = None;

    for idx in glyphs {
        let glyph = &layout.glyphs[idx];
        if current_line == Some(glyph.line) {
            if let Some(rect) = rects.last_mut() {
                *rect = rect.union(&glyph.rect);
                continue;
            }
        }
        rects.push(glyph.rect);
        current_line = Some(glyph.line);
    }

    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Glyph;
    use proptest::prelude::*;

    /// Monospaced glyphs 10pt wide on lines 20pt apart
    fn layout_of(lines: &[&str]) -> PageLayout {
        let mut glyphs = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let baseline = 700.0 - 20.0 * row as f64;
            for (col, ch) in line.chars().enumerate() {
                glyphs.push(Glyph {
                    ch,
                    rect: PdfRect::new(100.0 + 10.0 * col as f64, baseline - 2.0, 10.0, 10.0),
                    baseline,
                    font_size: 10.0,
                    line: 0,
                });
            }
        }
        PageLayout::from_glyphs(glyphs)
    }

    #[test]
    fn test_single_hit_rect() {
        let layout = layout_of(&["The revenue grew"]);
        let rects = find_rects(&layout, "revenue");
        assert_eq!(rects, vec![PdfRect::new(140.0, 698.0, 70.0, 10.0)]);
    }

    #[test]
    fn test_case_insensitive() {
        let layout = layout_of(&["SAFETY FIRST"]);
        assert_eq!(find_rects(&layout, "safety first").len(), 1);
    }

    #[test]
    fn test_all_occurrences_returned() {
        let layout = layout_of(&["abc abc", "abc"]);
        assert_eq!(find_rects(&layout, "ABC").len(), 3);
    }

    #[test]
    fn test_wrapped_hit_gives_one_rect_per_line() {
        let layout = layout_of(&["costs stayed", "flat overall"]);
        let rects = find_rects(&layout, "stayed   flat");
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], PdfRect::new(160.0, 698.0, 60.0, 10.0));
        assert_eq!(rects[1], PdfRect::new(100.0, 678.0, 40.0, 10.0));
    }

    #[test]
    fn test_missing_and_empty_needles() {
        let layout = layout_of(&["nothing to see"]);
        assert!(find_rects(&layout, "absent").is_empty());
        assert!(find_rects(&layout, "   ").is_empty());
        assert!(find_rects(&layout, "").is_empty());
    }

    #[test]
    fn test_needle_whitespace_trimmed() {
        let layout = layout_of(&["padded needle"]);
        assert_eq!(find_rects(&layout, "  needle  ").len(), 1);
    }

    proptest! {
        #[test]
        fn prop_any_substring_of_a_line_is_found(
            line in "[a-z]{1,8}( [a-z]{1,8}){0,5}",
            start in 0usize..40,
            len in 1usize..40,
        ) {
            let chars: Vec<char> = line.chars().collect();
            let start = start.min(chars.len() - 1);
            let end = (start + len).min(chars.len());
            let needle: String = chars[start..end].iter().collect();
            prop_assume!(!needle.trim().is_empty());

            let layout = layout_of(&[&line]);
            prop_assert!(!find_rects(&layout, &needle.to_uppercase()).is_empty());
        }
    }
}
