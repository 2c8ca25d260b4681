//! Locating candidate sentences on a page
//!
//! Each candidate goes through an ordered list of strategies and the first
//! one that yields rectangles wins for that candidate:
//!
//! | Tier   | Search term                                             |
//! |--------|---------------------------------------------------------|
//! | Exact  | the candidate itself                                    |
//! | Phrase | 3-word windows at word offsets 0, 1, 2                  |
//! | Fuzzy  | first 50 chars of a page sentence similar enough to it  |
//!
//! Spans from every candidate of a keypoint accumulate.

use crate::document::{HighlightDocument, PdfRect};
use crate::error::DocumentError;
use crate::similarity::similarity_ratio;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

lazy_static! {
    static ref TERMINATOR_PATTERN: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// Threshold used when the matcher is built with defaults
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.6;

/// Candidates shorter than this are not searched at all
pub const DEFAULT_MIN_CANDIDATE_LEN: usize = 10;

/// Page sentences must be strictly longer than this to be fuzzy targets
pub const PAGE_SENTENCE_MIN_LEN: usize = 20;

pub const DEFAULT_FUZZY_PREFIX_LEN: usize = 50;

const PHRASE_WORDS: usize = 3;
const PHRASE_OFFSETS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Phrase,
    Fuzzy,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::Exact => write!(f, "exact"),
            MatchMethod::Phrase => write!(f, "phrase"),
            MatchMethod::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// One literal search issued against the page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchAttempt {
    pub term: String,
    pub method: MatchMethod,
    pub hits: usize,
}

/// Everything found for one keypoint on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub spans: Vec<PdfRect>,
    /// Searches in the order they were issued
    pub attempts: Vec<SearchAttempt>,
    /// Winning tier for each candidate that matched
    pub methods: Vec<MatchMethod>,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Tier of the first candidate that matched
    pub fn primary_method(&self) -> Option<MatchMethod> {
        self.methods.first().copied()
    }
}

/// Per-call state shared by the strategies
pub struct SearchContext<'a> {
    doc: &'a dyn HighlightDocument,
    page: usize,
    page_sentences: Option<Vec<String>>,
    attempts: Vec<SearchAttempt>,
}

impl<'a> SearchContext<'a> {
    fn new(doc: &'a dyn HighlightDocument, page: usize) -> Self {
        Self {
            doc,
            page,
            page_sentences: None,
            attempts: Vec::new(),
        }
    }

    /// Literal search on the page, recorded in the trace
    pub fn search(
        &mut self,
        term: &str,
        method: MatchMethod,
    ) -> Result<Vec<PdfRect>, DocumentError> {
        let rects = self.doc.search(self.page, term)?;
        debug!(page = self.page + 1, %method, hits = rects.len(), term, "search");
        self.attempts.push(SearchAttempt {
            term: term.to_string(),
            method,
            hits: rects.len(),
        });
        Ok(rects)
    }

    /// Sentences of the page text, extracted once per call
    pub fn page_sentences(&mut self) -> Result<&[String], DocumentError> {
        if self.page_sentences.is_none() {
            let text = self.doc.page_text(self.page)?;
            self.page_sentences = Some(split_page_sentences(&text));
        }
        Ok(self.page_sentences.as_deref().unwrap_or_default())
    }
}

/// A single tier of the matching ladder
pub trait MatchStrategy {
    fn method(&self) -> MatchMethod;

    /// `Ok(None)` means this tier found nothing and the next one should run
    fn attempt(
        &self,
        ctx: &mut SearchContext<'_>,
        candidate: &str,
    ) -> Result<Option<Vec<PdfRect>>, DocumentError>;
}

pub struct ExactSearch;

impl MatchStrategy for ExactSearch {
    fn method(&self) -> MatchMethod {
        MatchMethod::Exact
    }

    fn attempt(
        &self,
        ctx: &mut SearchContext<'_>,
        candidate: &str,
    ) -> Result<Option<Vec<PdfRect>>, DocumentError> {
        let rects = ctx.search(candidate, self.method())?;
        Ok(non_empty(rects))
    }
}

pub struct PhraseWindowSearch;

impl MatchStrategy for PhraseWindowSearch {
    fn method(&self) -> MatchMethod {
        MatchMethod::Phrase
    }

    fn attempt(
        &self,
        ctx: &mut SearchContext<'_>,
        candidate: &str,
    ) -> Result<Option<Vec<PdfRect>>, DocumentError> {
        let words: Vec<&str> = candidate.split_whitespace().collect();
        if words.len() < PHRASE_WORDS {
            return Ok(None);
        }

        let windows = PHRASE_OFFSETS.min(words.len() - PHRASE_WORDS + 1);
        for start in 0..windows {
            let phrase = words[start..start + PHRASE_WORDS].join(" ");
            let rects = ctx.search(&phrase, self.method())?;
            if !rects.is_empty() {
                return Ok(Some(rects));
            }
        }
        Ok(None)
    }
}

pub struct FuzzySentenceSearch {
    pub min_similarity: f64,
    pub prefix_len: usize,
}

impl MatchStrategy for FuzzySentenceSearch {
    fn method(&self) -> MatchMethod {
        MatchMethod::Fuzzy
    }

    fn attempt(
        &self,
        ctx: &mut SearchContext<'_>,
        candidate: &str,
    ) -> Result<Option<Vec<PdfRect>>, DocumentError> {
        // Page order, no re-ranking by score
        let similar: Vec<String> = ctx
            .page_sentences()?
            .iter()
            .filter(|sentence| similarity_ratio(candidate, sentence) >= self.min_similarity)
            .map(|sentence| char_prefix(sentence, self.prefix_len))
            .collect();

        for prefix in similar {
            let rects = ctx.search(&prefix, self.method())?;
            if !rects.is_empty() {
                return Ok(Some(rects));
            }
        }
        Ok(None)
    }
}

/// Tiered matcher over a page's text
pub struct PageTextMatcher {
    strategies: Vec<Box<dyn MatchStrategy>>,
    min_candidate_len: usize,
}

impl Default for PageTextMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SIMILARITY)
    }
}

impl PageTextMatcher {
    /// Exact, then phrase windows, then fuzzy at `min_similarity`
    pub fn new(min_similarity: f64) -> Self {
        Self::with_fuzzy(min_similarity, DEFAULT_FUZZY_PREFIX_LEN)
    }

    /// The standard tiers, with the fuzzy tier searching `prefix_len` chars
    pub fn with_fuzzy(min_similarity: f64, prefix_len: usize) -> Self {
        Self::with_strategies(vec![
            Box::new(ExactSearch),
            Box::new(PhraseWindowSearch),
            Box::new(FuzzySentenceSearch {
                min_similarity,
                prefix_len,
            }),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self {
            strategies,
            min_candidate_len: DEFAULT_MIN_CANDIDATE_LEN,
        }
    }

    pub fn with_min_candidate_len(mut self, len: usize) -> Self {
        self.min_candidate_len = len;
        self
    }

    pub fn methods(&self) -> Vec<MatchMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    /// Find spans for `candidates` on `page` (0-based)
    pub fn find(
        &self,
        doc: &dyn HighlightDocument,
        page: usize,
        candidates: &[String],
    ) -> Result<MatchOutcome, DocumentError> {
        let mut ctx = SearchContext::new(doc, page);
        let mut spans = Vec::new();
        let mut methods = Vec::new();

        for candidate in candidates {
            if candidate.chars().count() < self.min_candidate_len {
                debug!(candidate = candidate.as_str(), "Candidate too short to search");
                continue;
            }

            for strategy in &self.strategies {
                if let Some(rects) = strategy.attempt(&mut ctx, candidate)? {
                    spans.extend(rects);
                    methods.push(strategy.method());
                    break;
                }
            }
        }

        Ok(MatchOutcome {
            spans,
            attempts: ctx.attempts,
            methods,
        })
    }
}

/// Split page text into trimmed sentences longer than 20 characters
pub fn split_page_sentences(text: &str) -> Vec<String> {
    TERMINATOR_PATTERN
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > PAGE_SENTENCE_MIN_LEN)
        .map(str::to_string)
        .collect()
}

fn char_prefix(s: &str, len: usize) -> String {
    s.chars().take(len).collect::<String>().trim_end().to_string()
}

fn non_empty(rects: Vec<PdfRect>) -> Option<Vec<PdfRect>> {
    if rects.is_empty() {
        None
    } else {
        Some(rects)
    }
}
