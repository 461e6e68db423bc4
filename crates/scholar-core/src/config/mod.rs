mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides and secrets.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.resolve_secrets();
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.index.chunk_size == 0 {
            bail!("index.chunk_size must be greater than zero");
        }
        if self.index.chunk_overlap >= self.index.chunk_size {
            bail!(
                "index.chunk_overlap ({}) must be smaller than index.chunk_size ({})",
                self.index.chunk_overlap,
                self.index.chunk_size
            );
        }
        if self.retrieval.top_k == 0 {
            bail!("retrieval.top_k must be greater than zero");
        }
        if self.index.extensions.is_empty() {
            bail!("index.extensions must list at least one file extension");
        }
        self.validate_provider("llm", self.llm.provider)?;
        self.validate_provider("embedding", self.embedding.provider)?;
        Ok(())
    }

    fn validate_provider(&self, section: &str, kind: ProviderKind) -> anyhow::Result<()> {
        match kind {
            ProviderKind::Ollama => {}
            ProviderKind::OpenAi => {
                if self.secrets.openai_api_key.is_none() {
                    bail!("{section}.provider = \"openai\" requires SCHOLAR_OPENAI_API_KEY");
                }
            }
            ProviderKind::Compatible => {
                let entry = self.llm.compatible.as_ref().with_context(|| {
                    format!("{section}.provider = \"compatible\" requires an [llm.compatible] section")
                })?;
                if !self.secrets.compatible_api_keys.contains_key(&entry.name) {
                    bail!(
                        "compatible provider '{}' requires SCHOLAR_COMPATIBLE_{}_API_KEY",
                        entry.name,
                        entry.name.to_uppercase()
                    );
                }
            }
        }
        Ok(())
    }

    /// Instruction text for the agent descriptor.
    #[must_use]
    pub fn agent_instruction(&self) -> &str {
        self.agent
            .instruction
            .as_deref()
            .unwrap_or(crate::agent::DEFAULT_INSTRUCTION)
    }
}
