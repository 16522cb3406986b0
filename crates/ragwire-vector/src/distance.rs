//! Distance metrics for vector similarity.

use std::fmt;

/// Distance metric used to compare vectors in a collection.
///
/// Scores reported by a collection are always similarities, so **higher is
/// closer** regardless of the metric:
///
/// - **Cosine**: cosine of the angle, in `[-1, 1]`.
/// - **Euclidean**: `1 / (1 + l2)`, in `(0, 1]`.
/// - **DotProduct**: raw inner product.
/// - **Manhattan**: `1 / (1 + l1)`, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DistanceMetric {
    /// Cosine similarity. Magnitude is ignored.
    #[default]
    Cosine,
    /// Euclidean (L2) distance.
    Euclidean,
    /// Inner product.
    DotProduct,
    /// Manhattan (L1) distance.
    Manhattan,
}

impl DistanceMetric {
    /// Similarity between two vectors of equal length (higher = more similar).
    #[inline]
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

        match self {
            DistanceMetric::Cosine => cosine_similarity(a, b),
            DistanceMetric::Euclidean => 1.0 / (1.0 + euclidean_distance(a, b)),
            DistanceMetric::DotProduct => dot_product(a, b),
            DistanceMetric::Manhattan => 1.0 / (1.0 + manhattan_distance(a, b)),
        }
    }

    /// Raw distance between two vectors (lower = more similar).
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

        match self {
            DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::DotProduct => -dot_product(a, b),
            DistanceMetric::Manhattan => manhattan_distance(a, b),
        }
    }

    /// Name of this metric as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::DotProduct => "dot_product",
            DistanceMetric::Manhattan => "manhattan",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" | "cos" => Ok(DistanceMetric::Cosine),
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "dot" | "dot_product" | "inner" => Ok(DistanceMetric::DotProduct),
            "manhattan" | "l1" => Ok(DistanceMetric::Manhattan),
            _ => Err(format!(
                "Unknown distance metric: {}. Use: cosine, euclidean, dot_product, manhattan",
                s
            )),
        }
    }
}

#[inline]
fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denom = (norm_a * norm_b).sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

#[inline]
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[inline]
fn manhattan_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_ignores_magnitude() {
        let sim = DistanceMetric::Cosine.similarity(&[1.0, 1.0], &[3.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let sim = DistanceMetric::Cosine.similarity(&[0.0, 0.0], &[1.0, 0.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_cosine_opposite() {
        let sim = DistanceMetric::Cosine.similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_euclidean_similarity_of_identical_is_one() {
        let v = [0.3, -2.0, 5.5];
        assert!((DistanceMetric::Euclidean.similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_euclidean_distance() {
        let dist = DistanceMetric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((dist - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_manhattan_distance() {
        let dist = DistanceMetric::Manhattan.distance(&[0.0, 0.0, 0.0], &[1.0, -2.0, 3.0]);
        assert!((dist - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_dot_product() {
        let sim = DistanceMetric::DotProduct.similarity(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        assert!((sim - 32.0).abs() < 1e-5);
    }

    #[test]
    fn test_metric_round_trips_through_name() {
        for metric in [
            DistanceMetric::Cosine,
            DistanceMetric::Euclidean,
            DistanceMetric::DotProduct,
            DistanceMetric::Manhattan,
        ] {
            assert_eq!(metric.name().parse::<DistanceMetric>().unwrap(), metric);
        }
        assert!("hamming".parse::<DistanceMetric>().is_err());
    }
}
