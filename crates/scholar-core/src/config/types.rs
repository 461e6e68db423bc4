use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sensitive value whose `Debug` and `Display` never print the contents.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub answer: AnswerConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

fn default_agent_name() -> String {
    "rag_agent".into()
}

fn default_agent_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_agent_description() -> String {
    "RAG-based study assistant that helps answer questions from course materials.".into()
}

/// Metadata published to a hosting agent runtime.
#[derive(Debug, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_agent_model")]
    pub model: String,
    #[serde(default = "default_agent_description")]
    pub description: String,
    /// Replaces the built-in agent instruction when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            model: default_agent_model(),
            description: default_agent_description(),
            instruction: None,
        }
    }
}

/// LLM provider backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    OpenAi,
    Compatible,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Compatible => "compatible",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

fn default_url_for(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Ollama => OLLAMA_BASE_URL,
        // compatible providers take their URL from [llm.compatible]
        ProviderKind::OpenAi | ProviderKind::Compatible => OPENAI_BASE_URL,
    }
}

fn default_chat_model() -> String {
    "llama3.1:8b".into()
}

fn default_max_tokens() -> u32 {
    4096
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    /// Endpoint override; defaults depend on the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible: Option<CompatibleConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            base_url: None,
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            compatible: None,
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| default_url_for(self.provider))
    }
}

/// OpenAI-compatible endpoint such as Groq.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompatibleConfig {
    pub name: String,
    pub base_url: String,
    pub model: String,
}

fn default_embedding_model() -> String {
    "all-minilm".into()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            base_url: None,
            model: default_embedding_model(),
        }
    }
}

impl EmbeddingConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| default_url_for(self.provider))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// `index.db` under `persist_dir`.
    #[default]
    Sqlite,
    Memory,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("./course_docs")
}

fn default_persist_dir() -> PathBuf {
    PathBuf::from("./data/index")
}

fn default_collection() -> String {
    "course_docs".into()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_max_file_size() -> u64 {
    scholar_memory::document::DEFAULT_MAX_FILE_SIZE
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".into()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Wiped and rebuilt on every start.
    #[serde(default = "default_persist_dir")]
    pub persist_dir: PathBuf,
    #[serde(default)]
    pub backend: IndexBackend,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            persist_dir: default_persist_dir(),
            backend: IndexBackend::Sqlite,
            collection: default_collection(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            max_file_size: default_max_file_size(),
            extensions: default_extensions(),
        }
    }
}

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_max_format_retries() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerConfig {
    /// Check the answer's section layout and re-ask once with a reminder on failure.
    #[serde(default)]
    pub strict_format: bool,
    #[serde(default = "default_max_format_retries")]
    pub max_format_retries: u32,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            strict_format: false,
            max_format_retries: default_max_format_retries(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub openai_api_key: Option<Secret>,
    pub compatible_api_keys: HashMap<String, Secret>,
}
