//! Candidate sentence extraction from free-form keypoint text
//!
//! Keypoint text arrives from an LLM extraction step and is usually
//! markdown: bold headers, bullets, numbered items and a preamble such as
//! "Here is the extracted information:". Only plain sentences that are
//! likely to appear verbatim on the page are useful as search terms.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Bold headers such as `**Key Points:**` (marker and content)
    static ref BOLD_PATTERN: Regex = Regex::new(r"\*\*[^*]+\*\*").unwrap();

    /// `* ` bullets at line start
    static ref STAR_BULLET_PATTERN: Regex = Regex::new(r"(?m)^\*\s+").unwrap();

    /// Dashes, bullets, digits and dots at line start
    static ref LINE_MARKER_PATTERN: Regex = Regex::new(r"(?m)^[\s\-•\d\.]+").unwrap();

    /// Meta preamble up to the first colon on the same line
    static ref PREAMBLE_PATTERN: Regex = Regex::new(r"(?i)Here is the extracted.*?:").unwrap();

    static ref NONE_MENTIONED_PATTERN: Regex = Regex::new(r"(?i)None mentioned").unwrap();

    static ref TERMINATOR_PATTERN: Regex = Regex::new(r"[.!?]+").unwrap();

    static ref WHITESPACE_PATTERN: Regex = Regex::new(r"\s+").unwrap();

    static ref LEADING_NON_WORD_PATTERN: Regex = Regex::new(r"^[^\w]+").unwrap();

    /// `3:` style list labels
    static ref NUMBERED_ITEM_PATTERN: Regex = Regex::new(r"^\d+\s*:").unwrap();
}

/// Lowercase prefixes that mark a line as boilerplate rather than content
pub const BOILERPLATE_PREFIXES: &[&str] = &[
    "here is",
    "none",
    "technical details",
    "key points",
    "important facts",
];

pub const DEFAULT_MAX_SENTENCES: usize = 5;

/// Sentences must be strictly longer than this many characters
pub const DEFAULT_MIN_SENTENCE_LEN: usize = 15;

/// Turns keypoint text into a short, ordered list of search candidates
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceExtractor {
    pub max_sentences: usize,
    pub min_len: usize,
}

impl Default for SentenceExtractor {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            min_len: DEFAULT_MIN_SENTENCE_LEN,
        }
    }
}

impl SentenceExtractor {
    pub fn new(max_sentences: usize, min_len: usize) -> Self {
        Self {
            max_sentences,
            min_len,
        }
    }

    /// Extract at most `max_sentences` cleaned sentences, in input order.
    ///
    /// Empty input yields an empty list.
    pub fn extract(&self, keypoint_text: &str) -> Vec<String> {
        if keypoint_text.trim().is_empty() {
            return Vec::new();
        }

        let text = strip_markup(keypoint_text);

        TERMINATOR_PATTERN
            .split(&text)
            .map(clean_sentence)
            .filter(|s| self.is_candidate(s))
            .take(self.max_sentences)
            .collect()
    }

    fn is_candidate(&self, sentence: &str) -> bool {
        if sentence.chars().count() <= self.min_len {
            return false;
        }
        let lower = sentence.to_lowercase();
        if BOILERPLATE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return false;
        }
        !NUMBERED_ITEM_PATTERN.is_match(sentence)
    }
}

/// Extract sentences with the default limits
pub fn extract_sentences(keypoint_text: &str) -> Vec<String> {
    SentenceExtractor::default().extract(keypoint_text)
}

fn strip_markup(text: &str) -> String {
    let text = BOLD_PATTERN.replace_all(text, "");
    let text = STAR_BULLET_PATTERN.replace_all(&text, "");
    let text = LINE_MARKER_PATTERN.replace_all(&text, "");
    let text = PREAMBLE_PATTERN.replace_all(&text, "");
    NONE_MENTIONED_PATTERN.replace_all(&text, "").into_owned()
}

fn clean_sentence(raw: &str) -> String {
    let collapsed = WHITESPACE_PATTERN.replace_all(raw.trim(), " ");
    LEADING_NON_WORD_PATTERN
        .replace(&collapsed, "")
        .trim_end()
        .to_string()
}
