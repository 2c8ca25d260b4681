//! Keypoint input records
//!
//! The extraction pipeline writes `{"contextual_keypoints": [...]}`; a bare
//! array of records is accepted as well. Missing or `null` fields read as
//! empty strings so one sloppy record never sinks the whole file.

use crate::error::HighlightError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

/// One extracted fact with its approximate source location
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Keypoint {
    /// Free text that usually contains "Page N"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,

    /// Free-form, often markdown-formatted keypoint text
    #[serde(
        default,
        rename = "keypoints",
        alias = "text",
        deserialize_with = "null_as_empty"
    )]
    pub text: String,
}

impl Keypoint {
    pub fn new(location: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            text: text.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

const WRAPPER_KEY: &str = "contextual_keypoints";

fn invalid(detail: impl std::fmt::Display) -> HighlightError {
    HighlightError::Load(format!("Invalid keypoint JSON: {}", detail))
}

/// Parse a keypoint list from JSON text
///
/// An object without a keypoint list (or with a `null` one) means there is
/// nothing to highlight.
pub fn parse_keypoints(json: &str) -> Result<Vec<Keypoint>, HighlightError> {
    let records = match serde_json::from_str(json).map_err(invalid)? {
        Value::Array(records) => Value::Array(records),
        Value::Object(mut map) => match map.remove(WRAPPER_KEY) {
            Some(Value::Null) => return Ok(Vec::new()),
            Some(records) => records,
            None => {
                if !map.is_empty() {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    warn!(?keys, "No \"{}\" list in keypoint file", WRAPPER_KEY);
                }
                return Ok(Vec::new());
            }
        },
        _ => return Err(invalid("expected an object or an array of records")),
    };
    serde_json::from_value(records).map_err(invalid)
}

/// Read and parse a keypoint list file
pub fn load_keypoints(path: &Path) -> Result<Vec<Keypoint>, HighlightError> {
    let json = fs::read_to_string(path).map_err(|e| {
        HighlightError::Load(format!(
            "Failed to read keypoint file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_keypoints(&json)
}
