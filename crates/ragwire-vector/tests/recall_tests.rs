//! HNSW recall against exact search on random data.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ragwire_vector::{Collection, DistanceMetric, HnswConfig, IndexKind};
use std::collections::HashSet;

const DIMENSIONS: usize = 32;
const POINTS: usize = 500;
const QUERIES: usize = 20;
const K: usize = 10;

fn random_vector(rng: &mut StdRng) -> Vec<f32> {
    (0..DIMENSIONS).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn recall(metric: DistanceMetric) -> f32 {
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<(String, Vec<f32>)> = (0..POINTS)
        .map(|i| (format!("p{}", i), random_vector(&mut rng)))
        .collect();

    let exact = Collection::new(DIMENSIONS, metric, IndexKind::Flat).unwrap();
    let approx = Collection::new(
        DIMENSIONS,
        metric,
        IndexKind::Hnsw(HnswConfig::accurate()),
    )
    .unwrap();
    for (id, vector) in &data {
        exact.insert(id, vector).unwrap();
    }
    let batch: Vec<(&str, &[f32])> = data
        .iter()
        .map(|(id, v)| (id.as_str(), v.as_slice()))
        .collect();
    approx.insert_batch(batch).unwrap();

    let mut hits = 0;
    for _ in 0..QUERIES {
        let query = random_vector(&mut rng);
        let truth: HashSet<String> = exact
            .search(&query, K)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        hits += approx
            .search(&query, K)
            .unwrap()
            .into_iter()
            .filter(|r| truth.contains(&r.id))
            .count();
    }
    hits as f32 / (QUERIES * K) as f32
}

#[test]
fn test_cosine_recall() {
    let r = recall(DistanceMetric::Cosine);
    assert!(r >= 0.8, "cosine recall too low: {r}");
}

#[test]
fn test_euclidean_recall() {
    let r = recall(DistanceMetric::Euclidean);
    assert!(r >= 0.8, "euclidean recall too low: {r}");
}

#[test]
fn test_results_sorted_by_score() {
    let mut rng = StdRng::seed_from_u64(11);
    let col = Collection::new(DIMENSIONS, DistanceMetric::Manhattan, IndexKind::Flat).unwrap();
    for i in 0..100 {
        col.insert(&format!("m{}", i), &random_vector(&mut rng)).unwrap();
    }

    let results = col.search(&random_vector(&mut rng), 25).unwrap();
    assert_eq!(results.len(), 25);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}
