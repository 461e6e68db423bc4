mod directory;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

use std::path::{Path, PathBuf};

pub use directory::{DirectoryLoader, LoadReport, SkippedFile};
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
pub use text::TextLoader;

use super::DocumentError;

/// Canonical path of `path`, after checking it is at most `limit` bytes.
async fn resolve_within_limit(path: &Path, limit: u64) -> Result<PathBuf, DocumentError> {
    let path = tokio::fs::canonicalize(path).await?;
    let size = tokio::fs::metadata(&path).await?.len();
    if size > limit {
        return Err(DocumentError::FileTooLarge { size, limit });
    }
    Ok(path)
}
