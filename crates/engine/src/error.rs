//! The module contains the errors the engine can throw.

use thiserror::Error;

/// Engine custom errors.
///
/// Every variant is recovered locally: the offending operation is rejected
/// and prior state stays untouched. Nothing here is fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
