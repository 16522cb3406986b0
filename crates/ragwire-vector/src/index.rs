//! HNSW graph wrapper.
//!
//! The graph only generates candidates; it is keyed by the collection's slot
//! numbers and knows nothing about string ids or deletions.

use crate::config::HnswConfig;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use anndists::dist::distances::{DistCosine, DistL1, DistL2};
use hnsw_rs::hnsw::Hnsw;

const MAX_LAYER: usize = 16;

/// Metric-specific HNSW graph.
pub(crate) enum HnswGraph {
    Cosine(Hnsw<'static, f32, DistCosine>),
    Euclidean(Hnsw<'static, f32, DistL2>),
    Manhattan(Hnsw<'static, f32, DistL1>),
}

macro_rules! dispatch {
    ($graph:expr, $hnsw:ident => $body:expr) => {
        match $graph {
            HnswGraph::Cosine($hnsw) => $body,
            HnswGraph::Euclidean($hnsw) => $body,
            HnswGraph::Manhattan($hnsw) => $body,
        }
    };
}

impl HnswGraph {
    pub(crate) fn new(metric: DistanceMetric, config: &HnswConfig) -> Result<Self> {
        config.validate()?;

        let graph = match metric {
            DistanceMetric::Cosine => HnswGraph::Cosine(Hnsw::new(
                config.m,
                config.max_elements,
                MAX_LAYER,
                config.ef_construction,
                DistCosine {},
            )),
            DistanceMetric::Euclidean => HnswGraph::Euclidean(Hnsw::new(
                config.m,
                config.max_elements,
                MAX_LAYER,
                config.ef_construction,
                DistL2 {},
            )),
            DistanceMetric::Manhattan => HnswGraph::Manhattan(Hnsw::new(
                config.m,
                config.max_elements,
                MAX_LAYER,
                config.ef_construction,
                DistL1 {},
            )),
            // hnsw_rs' dot distance assumes unit vectors.
            DistanceMetric::DotProduct => {
                return Err(Error::Configuration(
                    "dot_product metric requires a flat index".to_string(),
                ));
            }
        };

        Ok(graph)
    }

    pub(crate) fn insert(&self, vector: &[f32], slot: usize) {
        dispatch!(self, hnsw => hnsw.insert((vector, slot)))
    }

    pub(crate) fn insert_batch(&self, batch: &[(Vec<f32>, usize)], parallel: bool) {
        if parallel {
            let refs: Vec<(&Vec<f32>, usize)> = batch.iter().map(|(v, s)| (v, *s)).collect();
            dispatch!(self, hnsw => hnsw.parallel_insert(&refs))
        } else {
            for (vector, slot) in batch {
                self.insert(vector, *slot);
            }
        }
    }

    /// Slots of the `limit` nearest graph points, nearest first.
    pub(crate) fn search(&self, query: &[f32], limit: usize, ef_search: usize) -> Vec<usize> {
        let neighbours = dispatch!(self, hnsw => hnsw.search(query, limit, ef_search));
        neighbours.into_iter().map(|n| n.d_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_returns_nearest_slot_first() {
        let graph = HnswGraph::new(DistanceMetric::Euclidean, &HnswConfig::default()).unwrap();
        graph.insert(&[0.0, 0.0], 0);
        graph.insert(&[10.0, 10.0], 1);
        graph.insert(&[1.0, 1.0], 2);

        let slots = graph.search(&[9.0, 9.0], 2, 16);
        assert_eq!(slots.first(), Some(&1));
    }

    #[test]
    fn test_dot_product_graph_rejected() {
        let result = HnswGraph::new(DistanceMetric::DotProduct, &HnswConfig::default());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
