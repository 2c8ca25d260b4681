//! Highlighting configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! min_similarity = 0.4
//! opacity = 0.6
//! palette = [[1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
//! ```

use crate::error::ConfigError;
use crate::matcher::{DEFAULT_FUZZY_PREFIX_LEN, DEFAULT_MIN_CANDIDATE_LEN};
use crate::palette::{Palette, Rgb, DEFAULT_COLORS};
use crate::sentences::{DEFAULT_MAX_SENTENCES, DEFAULT_MIN_SENTENCE_LEN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Similarity threshold used by a run; looser than the matcher's own
/// default to favor recall
pub const RUN_MIN_SIMILARITY: f64 = 0.4;

pub const DEFAULT_PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightConfig {
    pub min_similarity: f64,
    pub palette: Vec<Rgb>,
    /// Annotation opacity in (0, 1]
    pub opacity: f32,
    pub max_sentences: usize,
    pub min_sentence_len: usize,
    pub min_candidate_len: usize,
    pub fuzzy_prefix_len: usize,
    /// Length of the search-term preview kept for unmatched keypoints
    pub preview_len: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            min_similarity: RUN_MIN_SIMILARITY,
            palette: DEFAULT_COLORS.to_vec(),
            opacity: 1.0,
            max_sentences: DEFAULT_MAX_SENTENCES,
            min_sentence_len: DEFAULT_MIN_SENTENCE_LEN,
            min_candidate_len: DEFAULT_MIN_CANDIDATE_LEN,
            fuzzy_prefix_len: DEFAULT_FUZZY_PREFIX_LEN,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}

impl HighlightConfig {
    /// Load and validate a TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::Read(format!("{}: {}", path.display(), e))
        })?;
        content.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(ConfigError::Invalid(format!(
                "min_similarity must be within [0, 1], got {}",
                self.min_similarity
            )));
        }
        if !(self.opacity > 0.0 && self.opacity <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "opacity must be within (0, 1], got {}",
                self.opacity
            )));
        }
        if self.max_sentences == 0 {
            return Err(ConfigError::Invalid("max_sentences must be at least 1".into()));
        }
        if self.fuzzy_prefix_len == 0 {
            return Err(ConfigError::Invalid("fuzzy_prefix_len must be at least 1".into()));
        }
        self.build_palette().map(|_| ())
    }

    pub fn build_palette(&self) -> Result<Palette, ConfigError> {
        Palette::new(self.palette.clone())
    }
}

impl std::str::FromStr for HighlightConfig {
    type Err = ConfigError;

    /// Parse and validate TOML
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: HighlightConfig =
            toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
