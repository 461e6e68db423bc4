use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use scholar_llm::any::AnyProvider;
use scholar_memory::document::{
    DirectoryLoader, IngestionPipeline, SkippedFile, SplitterConfig, TextSplitter,
};
use scholar_memory::{InMemoryVectorStore, SqliteVectorStore, VectorStore};

use crate::config::{IndexBackend, IndexConfig};
use crate::error::PipelineError;
use crate::retriever::RetrievedChunk;

/// File name of the SQLite index inside `persist_dir`.
pub const INDEX_DB_FILE: &str = "index.db";

/// Summary of one index build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub files_seen: usize,
    pub documents_loaded: usize,
    pub chunks_created: usize,
    pub skipped: Vec<SkippedFile>,
    pub duration: Duration,
}

/// Searchable chunk collection built from the course documents.
#[derive(Clone)]
pub struct CourseIndex {
    store: Arc<dyn VectorStore>,
    collection: String,
}

impl std::fmt::Debug for CourseIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseIndex")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl CourseIndex {
    #[must_use]
    pub fn new(store: Arc<dyn VectorStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Number of stored chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub async fn len(&self) -> Result<usize, PipelineError> {
        if !self.store.collection_exists(&self.collection).await? {
            return Ok(0);
        }
        Ok(self.store.count(&self.collection).await?)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub async fn is_empty(&self) -> Result<bool, PipelineError> {
        Ok(self.len().await? == 0)
    }

    /// The `k` chunks most similar to `vector`, best first.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails or a stored entry is malformed.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, PipelineError> {
        if k == 0 || !self.store.collection_exists(&self.collection).await? {
            return Ok(Vec::new());
        }
        let points = self
            .store
            .search(&self.collection, vector, k as u64)
            .await?;
        points.into_iter().map(RetrievedChunk::from_point).collect()
    }
}

async fn open_store(config: &IndexConfig) -> Result<Arc<dyn VectorStore>, PipelineError> {
    match config.backend {
        IndexBackend::Memory => Ok(Arc::new(InMemoryVectorStore::new())),
        IndexBackend::Sqlite => {
            if tokio::fs::try_exists(&config.persist_dir).await? {
                tracing::info!(path = %config.persist_dir.display(), "clearing existing index");
                tokio::fs::remove_dir_all(&config.persist_dir).await?;
            }
            tokio::fs::create_dir_all(&config.persist_dir).await?;
            let db_path: PathBuf = config.persist_dir.join(INDEX_DB_FILE);
            let store = SqliteVectorStore::open(&db_path).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Load every document under `source_dir`, chunk, embed and store it.
///
/// Any index previously written to `persist_dir` is discarded first. Files
/// that fail to load are skipped and listed in the report; an embedding
/// failure aborts the build.
///
/// # Errors
///
/// Returns an error if the source directory is missing, the store cannot be
/// opened, or embedding fails.
pub async fn build_index(
    config: &IndexConfig,
    embedder: &AnyProvider,
) -> Result<(CourseIndex, BuildReport), PipelineError> {
    let started = Instant::now();
    let store = open_store(config).await?;

    let loader =
        DirectoryLoader::new(&config.extensions).with_max_file_size(config.max_file_size);
    let (documents, load_report) = loader.load_all(&config.source_dir).await?;
    tracing::info!("loaded {} documents", documents.len());

    let splitter = TextSplitter::new(SplitterConfig {
        chunk_size: config.chunk_size,
        chunk_overlap: config.chunk_overlap,
    });
    let pipeline = IngestionPipeline::new(
        splitter,
        Arc::clone(&store),
        config.collection.clone(),
        Box::new(embedder.embed_fn()),
    );
    let chunks_created = pipeline.ingest_all(documents).await?;
    tracing::info!("created {chunks_created} chunks");

    let report = BuildReport {
        files_seen: load_report.files_seen,
        documents_loaded: load_report.documents_loaded,
        chunks_created,
        skipped: load_report.skipped,
        duration: started.elapsed(),
    };
    Ok((CourseIndex::new(store, config.collection.clone()), report))
}
