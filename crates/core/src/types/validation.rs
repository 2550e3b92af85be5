//! Validation errors for client-supplied data.

use thiserror::Error;

/// Errors raised when client input would corrupt the document.
///
/// These are always the caller's fault and map to `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// An id is too long or contains forbidden characters.
    #[error("invalid id '{id}': {reason}")]
    InvalidId {
        /// The rejected id.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A price is negative.
    #[error("price cannot be negative")]
    NegativePrice,

    /// A price is NaN, infinite, or out of decimal range.
    #[error("price must be a finite number")]
    NonFinitePrice,

    /// A payload that must be a JSON object was something else.
    #[error("{what} must be a JSON object")]
    NotAnObject {
        /// Description of the expected payload.
        what: &'static str,
    },

    /// A patch tried to change an entity id.
    #[error("id cannot be changed (was '{current}', got '{requested}')")]
    ImmutableId {
        /// The id the entity already has.
        current: String,
        /// The id the patch asked for.
        requested: String,
    },
}

/// Reject empty or whitespace-only text.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}
