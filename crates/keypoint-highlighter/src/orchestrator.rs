//! Highlighting run over a whole keypoint list
//!
//! Keypoints are processed strictly in input order since palette colors and
//! report order follow the input index. Per-keypoint problems are recorded
//! and the run continues; only annotation, page access and save failures
//! abort it.

use crate::annotator::HighlightAnnotator;
use crate::config::HighlightConfig;
use crate::document::HighlightDocument;
use crate::error::HighlightError;
use crate::keypoints::Keypoint;
use crate::location::parse_location;
use crate::matcher::{MatchMethod, PageTextMatcher};
use crate::report::{HighlightReport, KeypointEntry, KeypointStatus, LocationProblem};
use crate::sentences::SentenceExtractor;
use std::path::Path;
use tracing::{info, warn};

pub struct Highlighter {
    extractor: SentenceExtractor,
    matcher: PageTextMatcher,
    annotator: HighlightAnnotator,
    preview_len: usize,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            extractor: SentenceExtractor::default(),
            matcher: PageTextMatcher::new(crate::config::RUN_MIN_SIMILARITY),
            annotator: HighlightAnnotator::default(),
            preview_len: crate::config::DEFAULT_PREVIEW_LEN,
        }
    }
}

impl Highlighter {
    pub fn from_config(config: &HighlightConfig) -> Result<Self, HighlightError> {
        config.validate()?;
        let palette = config.build_palette()?;
        let matcher = PageTextMatcher::with_fuzzy(config.min_similarity, config.fuzzy_prefix_len)
            .with_min_candidate_len(config.min_candidate_len);

        Ok(Self {
            extractor: SentenceExtractor::new(config.max_sentences, config.min_sentence_len),
            matcher,
            annotator: HighlightAnnotator::new(palette, config.opacity),
            preview_len: config.preview_len,
        })
    }

    /// Highlight every keypoint, then save the document to `output`.
    ///
    /// The document is consumed and released when the run ends, on success
    /// and on failure. The save happens even if nothing matched; callers
    /// must check [`HighlightReport::is_success`].
    pub fn run<D: HighlightDocument>(
        &self,
        mut doc: D,
        keypoints: &[Keypoint],
        output: &Path,
    ) -> Result<HighlightReport, HighlightError> {
        let page_count = doc.page_count();
        let mut report = HighlightReport::default();

        info!(
            keypoints = keypoints.len(),
            pages = page_count,
            "Processing keypoints"
        );

        for (index, keypoint) in keypoints.iter().enumerate() {
            let entry = self.process_keypoint(&mut doc, page_count, index, keypoint)?;
            report.record(entry);
        }

        doc.save(output).map_err(HighlightError::Save)?;
        report.output_path = Some(output.display().to_string());

        info!(
            processed = report.keypoints_processed,
            total = report.keypoints_total,
            highlights = report.highlights_total,
            output = %output.display(),
            "Highlighting finished"
        );
        if !report.is_success() {
            warn!(
                "No keypoints were highlighted. Check that page numbers in the keypoint file \
                 match the document pages and that keypoint text is quoted from the document"
            );
        }

        Ok(report)
    }

    fn process_keypoint<D: HighlightDocument>(
        &self,
        doc: &mut D,
        page_count: usize,
        index: usize,
        keypoint: &Keypoint,
    ) -> Result<KeypointEntry, HighlightError> {
        let mut entry = KeypointEntry {
            index,
            location: keypoint.location.clone(),
            page: None,
            color: None,
            search_terms: Vec::new(),
            status: KeypointStatus::NoSentences,
        };

        let page = match parse_location(&keypoint.location) {
            None => {
                warn!(keypoint = index + 1, location = %keypoint.location, "Invalid location");
                entry.status = KeypointStatus::InvalidLocation {
                    reason: LocationProblem::Unparseable,
                };
                return Ok(entry);
            }
            Some(page) if page == 0 || page > page_count => {
                warn!(
                    keypoint = index + 1,
                    page,
                    page_count,
                    "Page number outside document"
                );
                entry.page = Some(page);
                entry.status = KeypointStatus::InvalidLocation {
                    reason: LocationProblem::OutOfRange { page, page_count },
                };
                return Ok(entry);
            }
            Some(page) => page,
        };
        entry.page = Some(page);

        let sentences = self.extractor.extract(&keypoint.text);
        if sentences.is_empty() {
            warn!(keypoint = index + 1, "No valid sentences extracted");
            entry.status = KeypointStatus::NoSentences;
            return Ok(entry);
        }

        let outcome = self
            .matcher
            .find(&*doc, page - 1, &sentences)
            .map_err(|source| HighlightError::PageAccess {
                keypoint: index,
                page,
                source,
            })?;
        entry.search_terms = outcome.attempts.clone();

        if outcome.is_empty() {
            let search_preview = sentences
                .first()
                .map(|s| s.chars().take(self.preview_len).collect::<String>());
            warn!(
                keypoint = index + 1,
                location = %keypoint.location,
                searched = search_preview.as_deref().unwrap_or(""),
                "No matching text found"
            );
            entry.status = KeypointStatus::NoMatch { search_preview };
            return Ok(entry);
        }

        let color = self.annotator.color_for(index);
        let applied = self
            .annotator
            .apply(doc, page - 1, &outcome.spans, color)
            .map_err(|failure| HighlightError::Annotation {
                keypoint: index,
                span: failure.span,
                source: failure.source,
            })?;

        info!(
            keypoint = index + 1,
            location = %keypoint.location,
            spans = applied,
            "Highlights added"
        );
        entry.color = Some(color);
        entry.status = KeypointStatus::Highlighted {
            spans: applied,
            method: outcome.primary_method().unwrap_or(MatchMethod::Exact),
        };
        Ok(entry)
    }
}

/// Run with the default configuration
pub fn run<D: HighlightDocument>(
    doc: D,
    keypoints: &[Keypoint],
    output: &Path,
) -> Result<HighlightReport, HighlightError> {
    Highlighter::default().run(doc, keypoints, output)
}
