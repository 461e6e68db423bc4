use scholar_llm::LlmProvider;
use scholar_memory::ScoredVectorPoint;
use scholar_memory::document::PAGE_KEY;
use serde::Serialize;

use crate::error::PipelineError;
use crate::index::CourseIndex;

/// A chunk returned by similarity search, with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
    /// 1-based page for chunks cut from a paged source such as a PDF.
    pub page: Option<u32>,
    pub score: f32,
}

impl RetrievedChunk {
    /// Inline citation tag, `[source:<path>::<index>]`.
    #[must_use]
    pub fn citation(&self) -> String {
        format!("[source:{}::{}]", self.source, self.chunk_index)
    }

    pub(crate) fn from_point(point: ScoredVectorPoint) -> Result<Self, PipelineError> {
        let invalid = |message: &str| PipelineError::InvalidPayload {
            id: point.id.clone(),
            message: message.to_owned(),
        };

        let text = point
            .payload
            .get("text")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| invalid("missing text"))?
            .to_owned();
        let source = point
            .payload
            .get("source")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| invalid("missing source"))?
            .to_owned();
        let chunk_index = point
            .payload
            .get("chunk_index")
            .and_then(serde_json::Value::as_u64)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| invalid("missing chunk_index"))?;
        let page = match point.payload.get(PAGE_KEY) {
            None => None,
            Some(value) => Some(
                value
                    .as_str()
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(|| invalid("malformed page"))?,
            ),
        };

        Ok(Self {
            text,
            source,
            chunk_index,
            page,
            score: point.score,
        })
    }
}

/// Embeds a question and looks up the nearest chunks in a [`CourseIndex`].
pub struct Retriever<E: LlmProvider> {
    index: CourseIndex,
    embedder: E,
}

impl<E: LlmProvider> Retriever<E> {
    #[must_use]
    pub fn new(index: CourseIndex, embedder: E) -> Self {
        Self { index, embedder }
    }

    /// Up to `k` chunks, most similar first. Ties keep insertion order.
    ///
    /// Returns an empty list without calling the embedder when `k` is zero or
    /// the index holds nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the query or searching the index fails.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, PipelineError> {
        if k == 0 || self.index.is_empty().await? {
            return Ok(Vec::new());
        }
        let vector = self.embedder.embed(query).await?;
        let chunks = self.index.search(vector, k).await?;
        tracing::debug!(count = chunks.len(), "retrieved chunks");
        Ok(chunks)
    }
}
