//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Malformed numeric input is *not* an error (see [`crate::coerce`]); these
/// variants cover contract violations at the edges of the model, such as a
/// field name the document does not define.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field name is not defined for the target document.
    #[error("unknown field `{field}` for {document}")]
    UnknownField {
        document: &'static str,
        field: String,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn unknown_field(document: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            document,
            field: field.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
