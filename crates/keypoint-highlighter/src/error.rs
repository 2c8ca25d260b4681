use thiserror::Error;

/// Failure reported by a document backend
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Page {page} does not exist (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("Document structure is corrupt: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to read configuration: {0}")]
    Read(String),
}

/// Hard failures that abort a highlighting run.
///
/// Per-keypoint problems (bad location, nothing to search, no match) are
/// never errors; they are recorded in the report instead.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Failed to load input: {0}")]
    Load(String),

    #[error("Failed to annotate span {span} of keypoint {keypoint}: {source}")]
    Annotation {
        keypoint: usize,
        span: usize,
        #[source]
        source: DocumentError,
    },

    #[error("Failed to read page {page} for keypoint {keypoint}: {source}")]
    PageAccess {
        keypoint: usize,
        page: usize,
        #[source]
        source: DocumentError,
    },

    #[error("Failed to save output: {0}")]
    Save(#[source] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
