use std::path::PathBuf;

/// Why a course file could not be turned into documents or stored.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("course directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("unsupported file type: .{0}")]
    UnsupportedFormat(String),

    #[error("file is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("file is not valid UTF-8 text")]
    NotUtf8,

    #[cfg(feature = "pdf")]
    #[error("could not extract PDF text: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("embedding failed: {0}")]
    Embedding(#[from] scholar_llm::LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] crate::error::MemoryError),
}
