//! Vector collection.
//!
//! A collection holds vectors of one dimensionality, compared with one
//! distance metric, searched either exactly or through an HNSW graph.

use crate::config::IndexKind;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::index::HnswGraph;
use crate::types::{CollectionStats, SearchResult, VectorId};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A collection of vectors with string ids.
///
/// Vectors live in insertion-ordered slots. Deleting or overwriting an id
/// leaves a tombstone behind, so slot order is always insertion order and
/// equal scores come back in the order they were inserted.
pub struct Collection {
    dimensions: usize,
    metric: DistanceMetric,
    kind: IndexKind,
    inner: RwLock<Inner>,
}

struct Slot {
    id: VectorId,
    vector: Vec<f32>,
}

struct Inner {
    slots: Vec<Option<Slot>>,
    by_id: HashMap<VectorId, usize>,
    graph: Option<HnswGraph>,
    tombstones: usize,
}

impl Inner {
    fn put(&mut self, id: &str, vector: &[f32]) -> usize {
        if let Some(old) = self.by_id.remove(id) {
            self.slots[old] = None;
            self.tombstones += 1;
        }

        let slot = self.slots.len();
        self.slots.push(Some(Slot {
            id: id.to_string(),
            vector: vector.to_vec(),
        }));
        self.by_id.insert(id.to_string(), slot);
        slot
    }
}

impl Collection {
    /// Create an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if `dimensions` is zero or the index configuration
    /// is invalid for the metric.
    pub fn new(dimensions: usize, metric: DistanceMetric, kind: IndexKind) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::InvalidVector("Dimensions must be > 0".to_string()));
        }

        let graph = match &kind {
            IndexKind::Flat => None,
            IndexKind::Hnsw(config) => Some(HnswGraph::new(metric, config)?),
        };

        debug!(dimensions, %metric, index = kind.name(), "Created collection");

        Ok(Self {
            dimensions,
            metric,
            kind,
            inner: RwLock::new(Inner {
                slots: Vec::new(),
                by_id: HashMap::new(),
                graph,
                tombstones: 0,
            }),
        })
    }

    /// Vector dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Distance metric.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Index kind.
    pub fn index_kind(&self) -> &IndexKind {
        &self.kind
    }

    /// Number of live vectors.
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Whether the collection holds no live vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a vector with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().by_id.contains_key(id)
    }

    /// Insert a vector. An existing id is overwritten.
    pub fn insert(&self, id: &str, vector: &[f32]) -> Result<()> {
        self.validate(id, vector)?;

        let mut inner = self.inner.write();
        let slot = inner.put(id, vector);
        if let Some(graph) = &inner.graph {
            graph.insert(vector, slot);
        }

        trace!(id, slot, "Inserted vector");
        Ok(())
    }

    /// Insert many vectors. Nothing is inserted if any vector is invalid.
    ///
    /// Returns the number of vectors inserted.
    pub fn insert_batch<'a, I>(&self, vectors: I) -> Result<usize>
    where
        I: IntoIterator<Item = (&'a str, &'a [f32])>,
    {
        let vectors: Vec<(&str, &[f32])> = vectors.into_iter().collect();
        for (id, vector) in &vectors {
            self.validate(id, vector)?;
        }

        let mut inner = self.inner.write();
        let mut batch = Vec::with_capacity(vectors.len());
        for (id, vector) in &vectors {
            let slot = inner.put(id, vector);
            batch.push((vector.to_vec(), slot));
        }

        if let (Some(graph), IndexKind::Hnsw(config)) = (&inner.graph, &self.kind) {
            graph.insert_batch(&batch, config.parallel_construction);
        }

        debug!(count = batch.len(), "Inserted batch");
        Ok(batch.len())
    }

    /// Delete a vector. Returns `false` when the id was unknown.
    pub fn delete(&self, id: &str) -> bool {
        let mut inner = self.inner.write();
        let Some(slot) = inner.by_id.remove(id) else {
            return false;
        };
        inner.slots[slot] = None;
        inner.tombstones += 1;
        trace!(id, slot, "Deleted vector");
        true
    }

    /// Get a copy of a stored vector.
    pub fn get(&self, id: &str) -> Option<Vec<f32>> {
        let inner = self.inner.read();
        let slot = *inner.by_id.get(id)?;
        inner.slots[slot].as_ref().map(|s| s.vector.clone())
    }

    /// Find the `limit` most similar vectors, best first.
    pub fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.check_query(query)?;

        let inner = self.inner.read();
        if limit == 0 || inner.by_id.is_empty() {
            return Ok(Vec::new());
        }

        let candidates: Vec<usize> = match (&inner.graph, &self.kind) {
            (Some(graph), IndexKind::Hnsw(config)) => {
                // Dead slots still sit in the graph; ask for enough to cover them.
                let want = limit + inner.tombstones;
                let mut slots = graph.search(query, want, config.ef_search.max(want));
                slots.sort_unstable();
                slots.dedup();
                slots
            }
            _ => (0..inner.slots.len()).collect(),
        };

        let mut scored: Vec<(usize, f32)> = candidates
            .into_iter()
            .filter_map(|slot| {
                let entry = inner.slots.get(slot)?.as_ref()?;
                Some((slot, self.metric.similarity(query, &entry.vector)))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .filter_map(|(slot, score)| {
                let entry = inner.slots[slot].as_ref()?;
                Some(SearchResult::new(entry.id.clone(), score))
            })
            .collect())
    }

    /// Like [`search`](Self::search), dropping results scored below `min_score`.
    pub fn search_with_threshold(
        &self,
        query: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        Ok(self
            .search(query, limit)?
            .into_iter()
            .filter(|r| r.score >= min_score)
            .collect())
    }

    /// Collection statistics.
    pub fn stats(&self) -> CollectionStats {
        let inner = self.inner.read();
        let memory_bytes = inner
            .slots
            .iter()
            .flatten()
            .map(|s| s.vector.len() * std::mem::size_of::<f32>() + s.id.len())
            .sum();

        CollectionStats {
            vector_count: inner.by_id.len(),
            dimensions: self.dimensions,
            metric: self.metric,
            index: self.kind.name(),
            tombstones: inner.tombstones,
            memory_bytes,
        }
    }

    fn validate(&self, id: &str, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidVector(format!(
                "Vector '{}' contains NaN or Inf",
                id
            )));
        }
        Ok(())
    }

    fn check_query(&self, query: &[f32]) -> Result<()> {
        if query.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidVector(
                "Query contains NaN or Inf".to_string(),
            ));
        }
        Ok(())
    }
}
