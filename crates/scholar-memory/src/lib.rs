//! Course document loading, chunking and vector storage.

pub mod document;
pub mod error;
pub mod in_memory_store;
pub mod sqlite_store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod vector_store;

pub use error::MemoryError;
pub use in_memory_store::InMemoryVectorStore;
pub use sqlite_store::SqliteVectorStore;
pub use vector_store::{ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError};
