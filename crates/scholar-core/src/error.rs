#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("document error: {0}")]
    Document(#[from] scholar_memory::document::DocumentError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] scholar_memory::VectorStoreError),

    #[error("index storage error: {0}")]
    Memory(#[from] scholar_memory::MemoryError),

    #[error("LLM error: {0}")]
    Llm(#[from] scholar_llm::LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed index entry {id}: {message}")]
    InvalidPayload { id: String, message: String },
}
