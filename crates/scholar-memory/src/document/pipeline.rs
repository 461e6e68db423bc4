use std::collections::HashMap;
use std::sync::Arc;

use scholar_llm::provider::EmbedFuture;
use serde_json::json;

use super::{Document, DocumentError, TextSplitter};
use crate::error::MemoryError;
use crate::vector_store::{VectorPoint, VectorStore};

/// Split -> embed -> store, one document at a time.
pub struct IngestionPipeline {
    splitter: TextSplitter,
    store: Arc<dyn VectorStore>,
    collection: String,
    embed_fn: Box<dyn Fn(&str) -> EmbedFuture + Send + Sync>,
}

impl IngestionPipeline {
    pub fn new(
        splitter: TextSplitter,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        embed_fn: Box<dyn Fn(&str) -> EmbedFuture + Send + Sync>,
    ) -> Self {
        Self {
            splitter,
            store,
            collection: collection.into(),
            embed_fn,
        }
    }

    /// Ingest a document and return the number of chunks stored.
    ///
    /// The collection is created on the first stored chunk. Point ids are
    /// `<source>::<chunk_index>`, so re-ingesting a document overwrites it.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or storage fails; nothing from this
    /// document is stored in that case.
    pub async fn ingest(&self, document: Document) -> Result<usize, DocumentError> {
        self.ingest_from(document, 0).await
    }

    /// Ingest documents in order and return the total chunk count.
    ///
    /// Documents sharing a source (the pages of one PDF) are numbered as one
    /// sequence, so chunk indices stay unique per source.
    ///
    /// # Errors
    ///
    /// Stops at the first embedding or storage failure.
    pub async fn ingest_all(&self, documents: Vec<Document>) -> Result<usize, DocumentError> {
        let mut next_index: HashMap<String, usize> = HashMap::new();
        let mut total = 0;
        for doc in documents {
            let first = next_index.get(&doc.metadata.source).copied().unwrap_or(0);
            let source = doc.metadata.source.clone();
            let stored = self.ingest_from(doc, first).await?;
            next_index.insert(source, first + stored);
            total += stored;
        }
        Ok(total)
    }

    async fn ingest_from(
        &self,
        document: Document,
        first_index: usize,
    ) -> Result<usize, DocumentError> {
        let chunks = self.splitter.split(&document);
        if chunks.is_empty() {
            tracing::debug!(source = %document.metadata.source, "document produced no chunks");
            return Ok(0);
        }

        let mut points = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let index = first_index + chunk.chunk_index;
            let vector = (self.embed_fn)(&chunk.text).await?;
            let mut payload: HashMap<String, serde_json::Value> = chunk
                .metadata
                .extra
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            payload.extend([
                ("source".to_owned(), json!(chunk.source())),
                ("content_type".to_owned(), json!(chunk.metadata.content_type)),
                ("chunk_index".to_owned(), json!(index)),
                ("text".to_owned(), json!(chunk.text)),
            ]);
            points.push(VectorPoint {
                id: format!("{}::{index}", chunk.source()),
                vector,
                payload,
            });
        }

        let vector_size = points.first().map_or(0, |p| p.vector.len() as u64);
        self.store
            .ensure_collection(&self.collection, vector_size)
            .await
            .map_err(|e| DocumentError::Storage(MemoryError::VectorStore(e)))?;

        let count = points.len();
        self.store
            .upsert(&self.collection, points)
            .await
            .map_err(|e| DocumentError::Storage(MemoryError::VectorStore(e)))?;

        tracing::debug!(source = %document.metadata.source, chunks = count, "ingested document");
        Ok(count)
    }
}
