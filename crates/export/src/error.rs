use thiserror::Error;

/// Failure while turning a document payload into file bytes.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("pdf encoding failed: {0}")]
    Pdf(String),

    #[error("xlsx encoding failed: {0}")]
    Xlsx(String),

    #[error("staging io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("export artifact was not written: {0}")]
    MissingArtifact(String),

    #[error("export task failed: {0}")]
    Task(String),

    #[error("an export is already in progress")]
    Busy,
}

pub type ExportResult<T> = Result<T, ExportError>;
