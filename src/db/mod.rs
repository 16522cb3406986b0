//! Vector storage.
//!
//! Retrievers keep their documents in an [`InMemoryVectorStore`], backed by a
//! `ragwire-vector` collection with either an exact (`Flat`) or an
//! approximate (`Hnsw`) index. Nothing is persisted.

pub mod vectorstore;

pub use vectorstore::{InMemoryVectorStore, StoreOptions};
