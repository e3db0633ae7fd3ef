//! Export results and the plumbing around them: busy flag, staging files.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use docforge_export::ExportError;

/// Finished export, ready to hand to the browser as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// What the UI is told after an export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    Ready(ExportArtifact),
    Failed { message: String },
}

impl ExportOutcome {
    pub fn artifact(&self) -> Option<&ExportArtifact> {
        match self {
            Self::Ready(artifact) => Some(artifact),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.artifact().is_some()
    }
}

/// Holds the session's "export in progress" flag; released on drop, whatever
/// the outcome.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Write `bytes` to `dir/filename`, read them back and remove the file.
/// The file never outlives the call, also on failure.
pub(crate) async fn stage(
    dir: &Path,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<Vec<u8>, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);

    let staged = round_trip(&path, &bytes).await;
    if staged.is_err() && tokio::fs::try_exists(&path).await.unwrap_or(false) {
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove staging file");
        }
    }
    staged
}

async fn round_trip(path: &Path, bytes: &[u8]) -> Result<Vec<u8>, ExportError> {
    tokio::fs::write(path, bytes).await?;
    if !tokio::fs::try_exists(path).await? {
        return Err(ExportError::MissingArtifact(path.display().to_string()));
    }
    let read = tokio::fs::read(path).await?;
    tokio::fs::remove_file(path).await?;
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = BusyGuard::acquire(&flag).unwrap();
        assert!(matches!(BusyGuard::acquire(&flag), Err(ExportError::Busy)));
        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(BusyGuard::acquire(&flag).is_ok());
    }

    #[tokio::test]
    async fn staging_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = stage(dir.path(), "Cotizacion_1_abcdef.pdf", b"%PDF-1.3".to_vec())
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.3");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unusable_staging_dir_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = stage(&blocker, "a.pdf", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
