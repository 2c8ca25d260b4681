//! Keypoint-to-document highlighting
//!
//! Given a paginated document and a list of extracted keypoints, each tagged
//! with an approximate "Page N" location, find the best-matching text on
//! that page and mark it with a per-keypoint highlight color.
//!
//! The pipeline for one keypoint:
//! 1. [`location::parse_location`] picks the page
//! 2. [`sentences::SentenceExtractor`] turns the keypoint text into search candidates
//! 3. [`matcher::PageTextMatcher`] finds spans (exact → phrase → fuzzy)
//! 4. [`annotator::HighlightAnnotator`] marks them with `palette[index % len]`
//!
//! [`orchestrator::Highlighter`] runs this over every keypoint, saves the
//! document once and returns a [`report::HighlightReport`]. Document
//! formats plug in through [`document::HighlightDocument`].

pub mod annotator;
pub mod config;
pub mod document;
pub mod error;
pub mod keypoints;
pub mod location;
pub mod matcher;
pub mod orchestrator;
pub mod palette;
pub mod report;
pub mod sentences;
pub mod similarity;

pub use annotator::HighlightAnnotator;
pub use config::HighlightConfig;
pub use document::{HighlightDocument, PdfRect};
pub use error::{ConfigError, DocumentError, HighlightError};
pub use keypoints::{load_keypoints, parse_keypoints, Keypoint};
pub use location::parse_location;
pub use matcher::{MatchMethod, MatchOutcome, PageTextMatcher, SearchAttempt};
pub use orchestrator::{run, Highlighter};
pub use palette::{Palette, Rgb};
pub use report::{HighlightReport, KeypointEntry, KeypointStatus, LocationProblem};
pub use sentences::{extract_sentences, SentenceExtractor};
pub use similarity::similarity_ratio;
