//! Codec for the list-valued columns of an application (`permissions`,
//! `features`).
//!
//! Each column is an ordered list of short strings persisted as one JSON
//! text value. Decoding is strict here; the lenient "corrupt data reads as an
//! empty list" policy lives in the `Application` accessors, which map every
//! `DecodeError` to an empty list.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored list is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored JSON is not a list of strings")]
    NotAList,
}

/// Decodes stored list text. Absent or blank text is an empty list.
pub fn decode(stored: Option<&str>) -> Result<Vec<String>, DecodeError> {
    let text = match stored {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Ok(Vec::new()),
    };

    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(DecodeError::NotAList),
            })
            .collect(),
        _ => Err(DecodeError::NotAList),
    }
}

/// Encodes an ordered list for storage. Order and duplicates are kept verbatim.
pub fn encode(items: &[String]) -> String {
    // Serializing a slice of strings cannot fail.
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Encodes an arbitrary submitted value, returning `None` when it is not a
/// list of strings. Callers treat `None` as "leave the stored value alone".
pub fn encode_value(value: &Value) -> Option<String> {
    let items = value.as_array()?;
    let strings: Option<Vec<String>> = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect();
    strings.map(|s| encode(&s))
}
