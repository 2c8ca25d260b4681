//! Run report consumed by the CLI and service layers

use crate::matcher::{MatchMethod, SearchAttempt};
use crate::palette::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationProblem {
    /// No "Page N" token in the location string
    Unparseable,
    /// Page number is 0 or beyond the last page
    OutOfRange { page: usize, page_count: usize },
}

/// Outcome for a single keypoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeypointStatus {
    Highlighted { spans: usize, method: MatchMethod },
    InvalidLocation { reason: LocationProblem },
    NoSentences,
    NoMatch { search_preview: Option<String> },
}

impl KeypointStatus {
    pub fn is_highlighted(&self) -> bool {
        matches!(self, KeypointStatus::Highlighted { .. })
    }

    /// Stable label for grouping skips
    pub fn label(&self) -> &'static str {
        match self {
            KeypointStatus::Highlighted { .. } => "highlighted",
            KeypointStatus::InvalidLocation { .. } => "invalid_location",
            KeypointStatus::NoSentences => "no_sentences",
            KeypointStatus::NoMatch { .. } => "no_match",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeypointEntry {
    /// 0-based position in the input
    pub index: usize,
    pub location: String,
    /// 1-indexed page, when the location parsed
    pub page: Option<usize>,
    pub color: Option<Rgb>,
    pub search_terms: Vec<SearchAttempt>,
    #[serde(flatten)]
    pub status: KeypointStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HighlightReport {
    pub keypoints_total: usize,
    pub keypoints_processed: usize,
    pub keypoints_skipped: usize,
    pub highlights_total: usize,
    pub output_path: Option<String>,
    pub entries: Vec<KeypointEntry>,
}

impl HighlightReport {
    pub(crate) fn record(&mut self, entry: KeypointEntry) {
        self.keypoints_total += 1;
        if let KeypointStatus::Highlighted { spans, .. } = entry.status {
            self.keypoints_processed += 1;
            self.highlights_total += spans;
        } else {
            self.keypoints_skipped += 1;
        }
        self.entries.push(entry);
    }

    /// A run with zero highlighted keypoints is a soft failure even though
    /// the output was saved
    pub fn is_success(&self) -> bool {
        self.keypoints_processed > 0
    }

    /// Count of non-highlighted keypoints per status label
    pub fn skipped_by_reason(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| !e.status.is_highlighted()) {
            *counts.entry(entry.status.label()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for HighlightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Keypoints processed: {}/{}",
            self.keypoints_processed, self.keypoints_total
        )?;
        writeln!(f, "Highlights added: {}", self.highlights_total)?;
        for (reason, count) in self.skipped_by_reason() {
            writeln!(f, "Skipped ({}): {}", reason, count)?;
        }
        if let Some(path) = &self.output_path {
            writeln!(f, "Output: {}", path)?;
        }
        Ok(())
    }
}
