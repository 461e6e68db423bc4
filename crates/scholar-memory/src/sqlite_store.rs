use std::collections::HashMap;
use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::MemoryError;
use crate::vector_store::{
    BoxFuture, ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError, cosine_similarity,
    rank,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS collections (
    name TEXT PRIMARY KEY,
    vector_size INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS points (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL REFERENCES collections(name) ON DELETE CASCADE,
    id TEXT NOT NULL,
    vector BLOB NOT NULL,
    payload TEXT NOT NULL,
    UNIQUE (collection, id)
);
";

/// Vector store persisted in a single `SQLite` file.
///
/// Vectors are kept as little-endian `f32` blobs and scored in process; the
/// course corpora this serves are small enough that a linear scan is fine.
#[derive(Debug, Clone)]
pub struct SqliteVectorStore {
    pool: SqlitePool,
}

impl SqliteVectorStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot be created.
    pub async fn open(path: &Path) -> Result<Self, MemoryError> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        tracing::debug!(path = %path.display(), "opened sqlite vector store");
        Ok(Self { pool })
    }
}

fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|x| x.to_le_bytes()).collect()
}

fn decode_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

impl VectorStore for SqliteVectorStore {
    fn ensure_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let size = i64::try_from(vector_size)
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            sqlx::query("INSERT OR IGNORE INTO collections (name, vector_size) VALUES (?, ?)")
                .bind(&collection)
                .bind(size)
                .execute(&self.pool)
                .await
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            Ok(())
        })
    }

    fn collection_exists(&self, collection: &str) -> BoxFuture<'_, Result<bool, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let row: Option<(String,)> =
                sqlx::query_as("SELECT name FROM collections WHERE name = ?")
                    .bind(&collection)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| VectorStoreError::Connection(e.to_string()))?;
            Ok(row.is_some())
        })
    }

    fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            if !self.collection_exists(&collection).await? {
                return Err(VectorStoreError::Upsert(format!(
                    "collection {collection} not found"
                )));
            }

            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| VectorStoreError::Upsert(e.to_string()))?;
            for p in points {
                let payload = serde_json::to_string(&p.payload)
                    .map_err(|e| VectorStoreError::Serialization(e.to_string()))?;
                // ON CONFLICT keeps the original seq, so ranking ties stay in first-insert order
                sqlx::query(
                    "INSERT INTO points (collection, id, vector, payload) VALUES (?, ?, ?, ?) \
                     ON CONFLICT (collection, id) DO UPDATE SET \
                     vector = excluded.vector, payload = excluded.payload",
                )
                .bind(&collection)
                .bind(&p.id)
                .bind(encode_vector(&p.vector))
                .bind(payload)
                .execute(&mut *tx)
                .await
                .map_err(|e| VectorStoreError::Upsert(e.to_string()))?;
            }
            tx.commit()
                .await
                .map_err(|e| VectorStoreError::Upsert(e.to_string()))?;
            Ok(())
        })
    }

    fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            if !self.collection_exists(&collection).await? {
                return Err(VectorStoreError::Search(format!(
                    "collection {collection} not found"
                )));
            }

            let rows: Vec<(String, Vec<u8>, String)> = sqlx::query_as(
                "SELECT id, vector, payload FROM points WHERE collection = ? ORDER BY seq",
            )
            .bind(&collection)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| VectorStoreError::Search(e.to_string()))?;

            let mut scored = Vec::with_capacity(rows.len());
            for (id, blob, payload) in rows {
                let payload: HashMap<String, serde_json::Value> = serde_json::from_str(&payload)
                    .map_err(|e| VectorStoreError::Serialization(e.to_string()))?;
                scored.push(ScoredVectorPoint {
                    id,
                    score: cosine_similarity(&vector, &decode_vector(&blob)),
                    payload,
                });
            }
            Ok(rank(scored, limit))
        })
    }

    fn count(&self, collection: &str) -> BoxFuture<'_, Result<usize, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM points WHERE collection = ?")
                .bind(&collection)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| VectorStoreError::Search(e.to_string()))?;
            usize::try_from(n).map_err(|e| VectorStoreError::Search(e.to_string()))
        })
    }
}
