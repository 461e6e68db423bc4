use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("collection error: {0}")]
    Collection(String),
    #[error("upsert error: {0}")]
    Upsert(String),
    #[error("search error: {0}")]
    Search(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ScoredVectorPoint {
    pub id: String,
    pub score: f32,
    pub payload: HashMap<String, serde_json::Value>,
}

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbour store over named collections.
///
/// `search` returns at most `limit` points ordered by descending cosine
/// similarity; equal scores keep insertion order.
pub trait VectorStore: Send + Sync {
    fn ensure_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>>;

    fn collection_exists(&self, collection: &str) -> BoxFuture<'_, Result<bool, VectorStoreError>>;

    fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>>;

    fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>>;

    fn count(&self, collection: &str) -> BoxFuture<'_, Result<usize, VectorStoreError>>;
}

/// Cosine similarity in `[-1, 1]`; zero when either vector has zero norm.
///
/// Accumulates in `f64` so large components do not overflow. A non-finite
/// result (NaN or infinite input) scores as negative infinity.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let cos = dot / (norm_a.sqrt() * norm_b.sqrt());
    if cos.is_finite() {
        #[allow(clippy::cast_possible_truncation)]
        let cos = cos.clamp(-1.0, 1.0) as f32;
        cos
    } else {
        f32::NEG_INFINITY
    }
}

/// Stable descending sort by score, then truncate to `limit`.
///
/// NaN scores sink to the bottom.
pub(crate) fn rank(mut scored: Vec<ScoredVectorPoint>, limit: u64) -> Vec<ScoredVectorPoint> {
    for p in &mut scored {
        if p.score.is_nan() {
            p.score = f32::NEG_INFINITY;
        }
    }
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, score: f32) -> ScoredVectorPoint {
        ScoredVectorPoint {
            id: id.into(),
            score,
            payload: HashMap::new(),
        }
    }

    #[test]
    fn cosine_identical_is_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let out = rank(
            vec![scored("a", 0.5), scored("b", 0.9), scored("c", 0.5), scored("d", 0.5)],
            3,
        );
        let ids: Vec<_> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn cosine_large_components_do_not_overflow() {
        let v = [1e30f32, 1e30];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_nan_component_scores_lowest() {
        assert_eq!(
            cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]),
            f32::NEG_INFINITY
        );
    }

    #[test]
    fn rank_with_nan_scores_does_not_panic() {
        let points: Vec<_> = (0..64u8)
            .map(|i| {
                let score = if i % 3 == 0 { f32::NAN } else { f32::from(i) / 64.0 };
                scored(&format!("p{i}"), score)
            })
            .collect();
        let out = rank(points, 10);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|p| p.score.is_finite()));
        assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(out[0].id, "p62");
    }

    #[test]
    fn rank_nan_scores_trail_finite_ones() {
        let out = rank(
            vec![scored("nan", f32::NAN), scored("low", -0.9), scored("high", 0.2)],
            3,
        );
        let ids: Vec<_> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["high", "low", "nan"]);
        assert_eq!(out[2].score, f32::NEG_INFINITY);
    }

    #[test]
    fn rank_zero_limit_is_empty() {
        assert!(rank(vec![scored("a", 1.0)], 0).is_empty());
    }
}
