use scholar_llm::LlmProvider;
use scholar_llm::provider::{Message, Role};

use crate::error::PipelineError;
use crate::format::{check_format, reminder};
use crate::prompt::assemble_prompt;
use crate::retriever::{RetrievedChunk, Retriever};

/// Retrieve, assemble, generate.
///
/// One question produces exactly one retrieval and, unless strict format
/// checking is on, exactly one model call.
pub struct AnswerGenerator<C: LlmProvider, E: LlmProvider> {
    chat: C,
    retriever: Retriever<E>,
    top_k: usize,
    max_format_retries: Option<u32>,
}

impl<C: LlmProvider, E: LlmProvider> AnswerGenerator<C, E> {
    #[must_use]
    pub fn new(chat: C, retriever: Retriever<E>, top_k: usize) -> Self {
        Self {
            chat,
            retriever,
            top_k,
            max_format_retries: None,
        }
    }

    /// Check the answer layout and re-ask up to `max_retries` times.
    #[must_use]
    pub fn with_strict_format(mut self, max_retries: u32) -> Self {
        self.max_format_retries = Some(max_retries);
        self
    }

    /// Retrieve context for `question` and build the final prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    pub async fn prepare(
        &self,
        question: &str,
    ) -> Result<(String, Vec<RetrievedChunk>), PipelineError> {
        let chunks = self.retriever.retrieve(question, self.top_k).await?;
        let prompt = assemble_prompt(&chunks, question);
        Ok((prompt, chunks))
    }

    /// Answer `question` from the indexed course material.
    ///
    /// The model's text is returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or the model call fails.
    pub async fn answer(&self, question: &str) -> Result<String, PipelineError> {
        tracing::info!("running RAG for question");
        let (prompt, chunks) = self.prepare(question).await?;

        let mut messages = vec![Message::user(prompt)];
        let mut answer = self.chat.chat(&messages).await?;

        let Some(max_retries) = self.max_format_retries else {
            return Ok(answer);
        };

        let require_citation = !chunks.is_empty();
        for attempt in 1..=max_retries {
            let report = check_format(&answer);
            if report.is_compliant(require_citation) {
                break;
            }
            tracing::warn!(
                attempt,
                missing = ?report.missing_sections,
                "answer does not follow the required format, asking again"
            );
            messages.push(Message::new(Role::Assistant, answer));
            messages.push(Message::user(reminder(&report, require_citation)));
            answer = self.chat.chat(&messages).await?;
        }
        Ok(answer)
    }
}
