//! Common types for ragwire-vector.

use crate::distance::DistanceMetric;

/// Unique identifier for a vector in a collection.
pub type VectorId = String;

/// Result of a vector search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// ID of the matched vector.
    pub id: VectorId,
    /// Similarity score, higher is more similar.
    pub score: f32,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(id: impl Into<VectorId>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Statistics about a collection.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionStats {
    /// Number of live vectors.
    pub vector_count: usize,
    /// Dimensionality of vectors.
    pub dimensions: usize,
    /// Distance metric used.
    pub metric: DistanceMetric,
    /// Index kind name (`flat` or `hnsw`).
    pub index: &'static str,
    /// Slots left behind by deletes and overwrites.
    pub tombstones: usize,
    /// Approximate memory held by stored vectors and ids.
    pub memory_bytes: usize,
}
