//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! boundary validation so every constructor rejects malformed input the same
//! way.

use crate::{EngineError, ResultEngine};

/// Trim a required text field, rejecting empty input.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blank input to an empty string.
pub(crate) fn normalize_optional(value: &str) -> String {
    value.trim().to_string()
}
