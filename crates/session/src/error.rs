use thiserror::Error;

use crate::edit::DocumentType;

/// Rejected UI input. Raised before anything reaches a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown field `{field}` for {document}")]
    UnknownField { document: DocumentType, field: String },

    #[error("`{field}` is an item field of {document} and needs an item index")]
    MissingIndex { document: DocumentType, field: String },

    #[error("unknown document type `{0}`")]
    UnknownDocument(String),
}
