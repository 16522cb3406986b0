use crate::db::InMemoryVectorStore;
use crate::runnable::Runnable;
use crate::types::{AppError, Document, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Anything that returns documents relevant to a query.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>>;
}

/// Search parameters for a [`VectorStoreRetriever`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchKwargs {
    /// Maximum number of documents returned
    #[serde(default = "default_k")]
    pub k: usize,
    /// Drop documents scoring below this similarity
    #[serde(default)]
    pub score_threshold: Option<f32>,
}

fn default_k() -> usize {
    4
}

impl Default for SearchKwargs {
    fn default() -> Self {
        Self {
            k: default_k(),
            score_threshold: None,
        }
    }
}

impl SearchKwargs {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }
}

/// Retrieves the top-k documents of an [`InMemoryVectorStore`].
#[derive(Debug, Clone)]
pub struct VectorStoreRetriever {
    store: Arc<InMemoryVectorStore>,
    search_kwargs: SearchKwargs,
}

impl VectorStoreRetriever {
    /// # Errors
    ///
    /// `AppError::InvalidInput` when `search_kwargs.k` is zero.
    pub fn new(store: Arc<InMemoryVectorStore>, search_kwargs: SearchKwargs) -> Result<Self> {
        if search_kwargs.k == 0 {
            return Err(AppError::InvalidInput(
                "retriever k must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            store,
            search_kwargs,
        })
    }

    pub fn store(&self) -> &Arc<InMemoryVectorStore> {
        &self.store
    }

    pub fn search_kwargs(&self) -> &SearchKwargs {
        &self.search_kwargs
    }
}

#[async_trait]
impl Retriever for VectorStoreRetriever {
    #[instrument(skip(self), fields(k = self.search_kwargs.k))]
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        let scored = self
            .store
            .similarity_search_with_score(query, self.search_kwargs.k)
            .await?;

        let documents: Vec<Document> = scored
            .into_iter()
            .filter(|s| {
                self.search_kwargs
                    .score_threshold
                    .map_or(true, |threshold| s.score >= threshold)
            })
            .map(|s| s.document)
            .collect();

        debug!(returned = documents.len(), "Retrieved documents");
        Ok(documents)
    }
}

#[async_trait]
impl Runnable for VectorStoreRetriever {
    /// Retrieved documents as a JSON array.
    async fn invoke(&self, input: &str) -> Result<Value> {
        let documents = self.retrieve(input).await?;
        serde_json::to_value(documents)
            .map_err(|e| AppError::Internal(format!("Failed to serialize documents: {}", e)))
    }
}
