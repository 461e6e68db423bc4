//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::provider::{LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub supports_embeddings: bool,
    /// When non-zero, `embed` returns a deterministic hashed bag-of-words vector
    /// of this dimension instead of `embedding`.
    pub hashed_dim: usize,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            seen: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 384],
            supports_embeddings: false,
            hashed_dim: 0,
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hashed_embeddings(mut self, dim: usize) -> Self {
        self.supports_embeddings = true;
        self.hashed_dim = dim;
        self
    }

    /// Return `embedding` for every input.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.supports_embeddings = true;
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn with_failing_embeddings(mut self) -> Self {
        self.supports_embeddings = true;
        self.fail_embed = true;
        self
    }

    /// Every message list passed to `chat`, in call order.
    #[must_use]
    pub fn seen_messages(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, crate::LlmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        if self.fail_chat {
            return Err(crate::LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, crate::LlmError> {
        if !self.supports_embeddings {
            return Err(crate::LlmError::EmbedUnsupported {
                provider: "mock".into(),
            });
        }
        if self.fail_embed {
            return Err(crate::LlmError::Other("mock embedding error".into()));
        }
        if self.hashed_dim > 0 {
            return Ok(hashed_bag_of_words(text, self.hashed_dim));
        }
        Ok(self.embedding.clone())
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn hashed_bag_of_words(text: &str, dim: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dim];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        // FNV-1a, stable across runs
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in word.to_lowercase().bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
        v[(h % dim as u64) as usize] += 1.0;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let p = MockProvider::with_responses(vec!["one".into(), "two".into()]);
        assert_eq!(p.chat(&[Message::user("a")]).await.unwrap(), "one");
        assert_eq!(p.chat(&[Message::user("b")]).await.unwrap(), "two");
        assert_eq!(p.chat(&[Message::user("c")]).await.unwrap(), "mock response");
        assert_eq!(p.seen_messages().len(), 3);
        assert_eq!(p.seen_messages()[1][0].content, "b");
    }

    #[tokio::test]
    async fn failing_records_then_errors() {
        let p = MockProvider::failing();
        assert!(p.chat(&[Message::user("a")]).await.is_err());
        assert_eq!(p.seen_messages().len(), 1);
    }

    #[tokio::test]
    async fn embed_unsupported_by_default() {
        let p = MockProvider::default();
        assert!(p.embed("x").await.is_err());
    }

    #[test]
    fn hashed_vectors_are_unit_length_and_case_insensitive() {
        let a = hashed_bag_of_words("Photosynthesis converts light", 32);
        let b = hashed_bag_of_words("photosynthesis CONVERTS light", 32);
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn hashed_vector_of_empty_text_is_zero() {
        let v = hashed_bag_of_words("   ", 8);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
