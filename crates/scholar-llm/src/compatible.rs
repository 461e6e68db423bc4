use std::fmt;

use crate::error::LlmError;
use crate::openai::OpenAiProvider;
use crate::provider::{LlmProvider, Message};

/// OpenAI-compatible endpoint under its own name (Groq, Together, vLLM, ...).
pub struct CompatibleProvider {
    inner: OpenAiProvider,
    provider_name: String,
}

impl CompatibleProvider {
    #[must_use]
    pub fn new(
        provider_name: String,
        api_key: String,
        base_url: String,
        model: String,
        max_tokens: u32,
        embedding_model: Option<String>,
    ) -> Self {
        let inner = OpenAiProvider::new(api_key, base_url, model, max_tokens, embedding_model)
            .with_label(provider_name.clone());
        Self {
            inner,
            provider_name,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.inner.model()
    }
}

impl fmt::Debug for CompatibleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatibleProvider")
            .field("provider_name", &self.provider_name)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Clone for CompatibleProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            provider_name: self.provider_name.clone(),
        }
    }
}

impl LlmProvider for CompatibleProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.inner.chat(messages).await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.inner.embed(text).await
    }

    fn supports_embeddings(&self) -> bool {
        self.inner.supports_embeddings()
    }

    fn name(&self) -> &str {
        &self.provider_name
    }
}
