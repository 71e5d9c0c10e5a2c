//! Pull a JSON object out of a chatty model reply.
//!
//! Models wrap JSON in prose or markdown fences even when told not to. The
//! scanner walks from each `{` to its balancing `}`, skipping braces inside
//! string literals, and returns the first candidate that parses.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use spendwise_common::{CategoryDraft, SpendwiseError, TransactionDraft};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No JSON object found in model response")]
    NoJsonObject { raw: String },

    #[error("Invalid JSON in model response: {message}")]
    InvalidJson { raw: String, message: String },

    #[error("Invalid draft in model response: {message}")]
    InvalidDraft { raw: String, message: String },
}

impl ExtractError {
    /// The model reply that failed to yield a record.
    pub fn raw(&self) -> &str {
        match self {
            ExtractError::NoJsonObject { raw }
            | ExtractError::InvalidJson { raw, .. }
            | ExtractError::InvalidDraft { raw, .. } => raw,
        }
    }
}

/// Byte range of the balanced object starting at `start`, which must index a `{`.
fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Candidate objects tried before giving up on a reply.
const MAX_CANDIDATES: usize = 32;

/// Parse the first balanced JSON object embedded in `text`.
///
/// At most [`MAX_CANDIDATES`] opening braces are tried, so a reply full of
/// stray braces costs a bounded number of linear scans.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractError> {
    let mut first_error: Option<String> = None;
    let mut search_from = 0;

    for _ in 0..MAX_CANDIDATES {
        let Some(offset) = text[search_from..].find('{') else {
            break;
        };
        let start = search_from + offset;
        if let Some(end) = balanced_object_end(text, start) {
            match serde_json::from_str::<Value>(&text[start..=end]) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    first_error.get_or_insert_with(|| e.to_string());
                }
            }
        }
        search_from = start + 1;
    }

    match first_error {
        Some(message) => Err(ExtractError::InvalidJson {
            raw: text.to_string(),
            message,
        }),
        None => Err(ExtractError::NoJsonObject {
            raw: text.to_string(),
        }),
    }
}

pub fn parse_category_draft(text: &str) -> Result<CategoryDraft, ExtractError> {
    parse_draft(text, CategoryDraft::validate)
}

pub fn parse_transaction_draft(text: &str) -> Result<TransactionDraft, ExtractError> {
    parse_draft(text, TransactionDraft::validate)
}

fn parse_draft<T: DeserializeOwned>(
    text: &str,
    validate: impl Fn(&T) -> Result<(), SpendwiseError>,
) -> Result<T, ExtractError> {
    let mut value = extract_json_object(text)?;
    normalize_entry_type(&mut value);

    let invalid = |message: String| ExtractError::InvalidDraft {
        raw: text.to_string(),
        message,
    };
    let draft: T = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    validate(&draft).map_err(|e| invalid(e.to_string()))?;
    Ok(draft)
}

/// `"Expense "` and `"EXPENSE"` mean the same thing as `"expense"`.
fn normalize_entry_type(value: &mut Value) {
    if let Some(Value::String(entry_type)) = value.get_mut("type") {
        *entry_type = entry_type.trim().to_lowercase();
    }
}
