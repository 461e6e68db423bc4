use std::collections::HashMap;

/// Key in [`DocumentMetadata::extra`] holding a 1-based page number.
pub const PAGE_KEY: &str = "page";

#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Canonical path of the file the document was loaded from.
    pub source: String,
    pub content_type: String,
    pub extra: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub text: String,
    pub metadata: DocumentMetadata,
    pub chunk_index: usize,
}

impl Chunk {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.metadata.source
    }
}
