//! Mock implementations for testing.
//!
//! Embedding models that never touch the network, shared by the
//! integration tests.

use async_trait::async_trait;
use ragwire::embeddings::Embeddings;
use ragwire::types::{AppError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Dimensionality of [`MockEmbeddings`] vectors.
pub const MOCK_DIMENSIONS: usize = 256;

/// Deterministic bag-of-words embeddings.
///
/// Every lowercase alphanumeric token is hashed (FNV-1a) into one of
/// [`MOCK_DIMENSIONS`] buckets, so texts sharing words end up close under
/// cosine similarity.
///
/// # Examples
///
/// ```ignore
/// let embeddings = MockEmbeddings::new();
/// let failing = MockEmbeddings::failing();
/// assert_eq!(embeddings.document_calls(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockEmbeddings {
    should_fail: bool,
    document_calls: Arc<AtomicUsize>,
}

impl MockEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model whose every call returns an embedding error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of `embed_documents` calls so far, queries included.
    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn embed_text(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; MOCK_DIMENSIONS];
        for token in tokens(text) {
            vector[bucket(&token)] += 1.0;
        }
        vector
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn bucket(token: &str) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % MOCK_DIMENSIONS as u64) as usize
}

#[async_trait]
impl Embeddings for MockEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(AppError::Embedding("Mock embedding failure".to_string()));
        }
        Ok(texts.iter().map(|t| Self::embed_text(t)).collect())
    }

    fn model_name(&self) -> &str {
        "mock-bag-of-words"
    }
}
