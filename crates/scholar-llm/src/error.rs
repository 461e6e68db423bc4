#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rate limited")]
    RateLimited,

    #[error("{provider} API request failed (status {status})")]
    Api { provider: String, status: u16 },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: String },

    #[error("embedding not supported by {provider}")]
    EmbedUnsupported { provider: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status() {
        let err = LlmError::Api {
            provider: "groq".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "groq API request failed (status 503)");
    }

    #[test]
    fn embed_unsupported_display() {
        let err = LlmError::EmbedUnsupported {
            provider: "openai".into(),
        };
        assert_eq!(err.to_string(), "embedding not supported by openai");
    }
}
