use super::{Config, Secret};

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SCHOLAR_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid SCHOLAR_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("SCHOLAR_LLM_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("SCHOLAR_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("SCHOLAR_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Ok(v) = std::env::var("SCHOLAR_EMBEDDING_BASE_URL") {
            self.embedding.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("SCHOLAR_SOURCE_DIR") {
            self.index.source_dir = v.into();
        }
        if let Ok(v) = std::env::var("SCHOLAR_PERSIST_DIR") {
            self.index.persist_dir = v.into();
        }
        if let Ok(v) = std::env::var("SCHOLAR_CHUNK_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                self.index.chunk_size = n;
            } else {
                tracing::warn!("ignoring invalid SCHOLAR_CHUNK_SIZE value: {v}");
            }
        }
        if let Ok(v) = std::env::var("SCHOLAR_CHUNK_OVERLAP") {
            if let Ok(n) = v.parse::<usize>() {
                self.index.chunk_overlap = n;
            } else {
                tracing::warn!("ignoring invalid SCHOLAR_CHUNK_OVERLAP value: {v}");
            }
        }
        if let Ok(v) = std::env::var("SCHOLAR_TOP_K") {
            if let Ok(n) = v.parse::<usize>() {
                self.retrieval.top_k = n;
            } else {
                tracing::warn!("ignoring invalid SCHOLAR_TOP_K value: {v}");
            }
        }
        if let Ok(v) = std::env::var("SCHOLAR_STRICT_FORMAT") {
            if let Ok(enabled) = v.parse::<bool>() {
                self.answer.strict_format = enabled;
            } else {
                tracing::warn!("ignoring invalid SCHOLAR_STRICT_FORMAT value: {v}");
            }
        }
    }

    /// Read API keys from the environment.
    pub(crate) fn resolve_secrets(&mut self) {
        if let Ok(v) = std::env::var("SCHOLAR_OPENAI_API_KEY")
            && !v.is_empty()
        {
            self.secrets.openai_api_key = Some(Secret::new(v));
        }
        if let Some(ref entry) = self.llm.compatible {
            let env_key = format!("SCHOLAR_COMPATIBLE_{}_API_KEY", entry.name.to_uppercase());
            if let Ok(v) = std::env::var(&env_key)
                && !v.is_empty()
            {
                self.secrets
                    .compatible_api_keys
                    .insert(entry.name.clone(), Secret::new(v));
            }
        }
    }
}
