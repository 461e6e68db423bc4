//! Wiring from [`Config`] to a ready [`AnswerGenerator`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use scholar_llm::any::AnyProvider;
use scholar_llm::compatible::CompatibleProvider;
use scholar_llm::ollama::OllamaProvider;
use scholar_llm::openai::OpenAiProvider;

use crate::answer::AnswerGenerator;
use crate::config::{CompatibleConfig, Config, ProviderKind};
use crate::index::{BuildReport, build_index};
use crate::retriever::Retriever;

/// Priority: `--config` > `SCHOLAR_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("SCHOLAR_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

fn compatible_entry(config: &Config) -> anyhow::Result<&CompatibleConfig> {
    config
        .llm
        .compatible
        .as_ref()
        .context("llm.compatible config section required for compatible provider")
}

fn compatible_key(config: &Config, name: &str) -> anyhow::Result<String> {
    Ok(config
        .secrets
        .compatible_api_keys
        .get(name)
        .with_context(|| format!("SCHOLAR_COMPATIBLE_{}_API_KEY not set", name.to_uppercase()))?
        .expose()
        .to_owned())
}

fn openai_key(config: &Config) -> anyhow::Result<String> {
    Ok(config
        .secrets
        .openai_api_key
        .as_ref()
        .context("SCHOLAR_OPENAI_API_KEY not set")?
        .expose()
        .to_owned())
}

/// Chat model used for answer generation.
///
/// # Errors
///
/// Returns an error if the selected provider is missing its config section or API key.
pub fn create_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    let llm = &config.llm;
    match llm.provider {
        ProviderKind::Ollama => Ok(AnyProvider::Ollama(
            OllamaProvider::new(
                llm.base_url(),
                llm.model.clone(),
                config.embedding.model.clone(),
            ),
        )),
        ProviderKind::OpenAi => Ok(AnyProvider::OpenAi(
            OpenAiProvider::new(
                openai_key(config)?,
                llm.base_url().to_owned(),
                llm.model.clone(),
                llm.max_tokens,
                None,
            ),
        )),
        ProviderKind::Compatible => {
            let entry = compatible_entry(config)?;
            Ok(AnyProvider::Compatible(
                CompatibleProvider::new(
                    entry.name.clone(),
                    compatible_key(config, &entry.name)?,
                    entry.base_url.clone(),
                    entry.model.clone(),
                    llm.max_tokens,
                    None,
                ),
            ))
        }
    }
}

/// Embedding model shared by index build and query embedding.
///
/// # Errors
///
/// Returns an error if the selected provider is missing its config section or API key.
pub fn create_embedder(config: &Config) -> anyhow::Result<AnyProvider> {
    let embedding = &config.embedding;
    match embedding.provider {
        ProviderKind::Ollama => Ok(AnyProvider::Ollama(OllamaProvider::new(
            embedding.base_url(),
            config.llm.model.clone(),
            embedding.model.clone(),
        ))),
        ProviderKind::OpenAi => Ok(AnyProvider::OpenAi(OpenAiProvider::new(
            openai_key(config)?,
            embedding.base_url().to_owned(),
            config.llm.model.clone(),
            config.llm.max_tokens,
            Some(embedding.model.clone()),
        ))),
        ProviderKind::Compatible => {
            let entry = compatible_entry(config)?;
            Ok(AnyProvider::Compatible(CompatibleProvider::new(
                entry.name.clone(),
                compatible_key(config, &entry.name)?,
                entry.base_url.clone(),
                entry.model.clone(),
                config.llm.max_tokens,
                Some(embedding.model.clone()),
            )))
        }
    }
}

pub async fn health_check(provider: &AnyProvider) {
    if let AnyProvider::Ollama(ollama) = provider {
        match ollama.health_check().await {
            Ok(()) => tracing::info!("ollama health check passed"),
            Err(e) => tracing::warn!("ollama health check failed: {e:#}"),
        }
    }
}

/// Validate the config, rebuild the index and return a generator over it.
///
/// # Errors
///
/// Returns an error if the config is invalid, a provider cannot be created,
/// or the index build fails.
pub async fn build_generator(
    config: &Config,
) -> anyhow::Result<(AnswerGenerator<AnyProvider, AnyProvider>, BuildReport)> {
    config.validate()?;
    let chat = create_provider(config)?;
    let embedder = create_embedder(config)?;
    health_check(&embedder).await;

    let (index, report) = build_index(&config.index, &embedder)
        .await
        .context("failed to build course index")?;
    tracing::info!(
        chunks = report.chunks_created,
        skipped = report.skipped.len(),
        "index ready in {:.1}s",
        report.duration.as_secs_f64()
    );

    let mut generator =
        AnswerGenerator::new(chat, Retriever::new(index, embedder), config.retrieval.top_k);
    if config.answer.strict_format {
        generator = generator.with_strict_format(config.answer.max_format_retries);
    }
    Ok((generator, report))
}
