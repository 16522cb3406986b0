//! # ragwire-vector
//!
//! In-memory vector collections backing ragwire retrievers.
//!
//! ## Features
//!
//! - **Pure Rust**: No native dependencies
//! - **Exact or approximate**: brute-force `Flat` scan or an HNSW graph
//! - **Thread-safe**: collections can be shared behind an `Arc`
//! - **Multiple Distance Metrics**: Cosine, Euclidean (L2), Dot Product, Manhattan (L1)
//!
//! ## Quick Start
//!
//! ```rust
//! use ragwire_vector::{Collection, DistanceMetric, IndexKind};
//!
//! let col = Collection::new(3, DistanceMetric::Cosine, IndexKind::Flat)?;
//! col.insert("doc1", &[1.0, 0.0, 0.0])?;
//! col.insert("doc2", &[0.0, 1.0, 0.0])?;
//!
//! let results = col.search(&[0.9, 0.1, 0.0], 1)?;
//! assert_eq!(results[0].id, "doc1");
//! # Ok::<(), ragwire_vector::Error>(())
//! ```
//!
//! Scores are similarities for every metric: higher means closer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod distance;
pub mod error;
mod index;
pub mod types;

pub use collection::Collection;
pub use config::{HnswConfig, IndexKind};
pub use distance::DistanceMetric;
pub use error::{Error, Result};
pub use types::{CollectionStats, SearchResult, VectorId};
