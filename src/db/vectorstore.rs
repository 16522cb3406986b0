//! In-memory vector store
//!
//! Couples an [`Embeddings`] model with a [`ragwire_vector::Collection`] and
//! keeps the full [`Document`]s next to their vectors.
//!
//! ```text
//!   texts ──embed_documents──▶ vectors ──insert_batch──▶ Collection
//!     │                                                     │
//!     └──────────── documents (by id) ◀──── ids ◀── search ─┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use ragwire::db::{InMemoryVectorStore, StoreOptions};
//!
//! let store = InMemoryVectorStore::from_texts(texts, embedding, StoreOptions::default()).await?;
//! let hits = store.similarity_search("refund policy", 4).await?;
//! ```

use crate::embeddings::Embeddings;
use crate::rag::retriever::{SearchKwargs, VectorStoreRetriever};
use crate::types::{AppError, Document, Result, ScoredDocument};
use parking_lot::RwLock;
use ragwire_vector::{Collection, CollectionStats, DistanceMetric, IndexKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Similarity metric and index structure for a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreOptions {
    pub metric: DistanceMetric,
    pub index: IndexKind,
}

impl StoreOptions {
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.index = index;
        self
    }
}

/// Documents and their embeddings, searchable by similarity to a query.
///
/// The vector collection is created on the first non-empty insert, once the
/// embedding dimensionality is known. Searching a store that has never
/// received a document returns no results.
pub struct InMemoryVectorStore {
    embedding: Arc<dyn Embeddings>,
    options: StoreOptions,
    collection: RwLock<Option<Collection>>,
    documents: RwLock<HashMap<String, Document>>,
}

impl std::fmt::Debug for InMemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorStore")
            .field("model", &self.embedding.model_name())
            .field("options", &self.options)
            .field("len", &self.len())
            .finish()
    }
}

impl InMemoryVectorStore {
    /// An empty store.
    pub fn new(embedding: Arc<dyn Embeddings>, options: StoreOptions) -> Self {
        Self {
            embedding,
            options,
            collection: RwLock::new(None),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store from raw texts, one document per text.
    pub async fn from_texts(
        texts: Vec<String>,
        embedding: Arc<dyn Embeddings>,
        options: StoreOptions,
    ) -> Result<Self> {
        let documents = texts.into_iter().map(Document::new).collect();
        Self::from_documents(documents, embedding, options).await
    }

    /// Build a store from documents. All contents are embedded in a single
    /// `embed_documents` call.
    pub async fn from_documents(
        documents: Vec<Document>,
        embedding: Arc<dyn Embeddings>,
        options: StoreOptions,
    ) -> Result<Self> {
        let store = Self::new(embedding, options);
        store.add_documents(documents).await?;
        Ok(store)
    }

    /// Embed and insert documents, returning their ids in input order.
    ///
    /// A document whose id is already stored replaces the earlier one.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedding.embed_documents(&texts).await?;
        if vectors.len() != documents.len() {
            return Err(AppError::Embedding(format!(
                "Expected {} embeddings, got {}",
                documents.len(),
                vectors.len()
            )));
        }

        {
            let mut collection = self.collection.write();
            if collection.is_none() {
                let dimensions = vectors[0].len();
                debug!(dimensions, metric = %self.options.metric, "Creating collection");
                *collection = Some(Collection::new(
                    dimensions,
                    self.options.metric,
                    self.options.index.clone(),
                )?);
            }
            if let Some(collection) = collection.as_ref() {
                collection.insert_batch(
                    documents
                        .iter()
                        .zip(&vectors)
                        .map(|(doc, vector)| (doc.id.as_str(), vector.as_slice())),
                )?;
            }
        }

        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let mut stored = self.documents.write();
        for doc in documents {
            stored.insert(doc.id.clone(), doc);
        }

        debug!(total = stored.len(), "Added documents");
        Ok(ids)
    }

    /// The `k` documents most similar to `query`.
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        Ok(self
            .similarity_search_with_score(query, k)
            .await?
            .into_iter()
            .map(|scored| scored.document)
            .collect())
    }

    /// The `k` documents most similar to `query` with their scores, best
    /// first. Equal scores keep insertion order.
    #[instrument(skip(self))]
    pub async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedding.embed_query(query).await?;

        let hits = match self.collection.read().as_ref() {
            Some(collection) => collection.search(&query_vector, k)?,
            None => return Ok(Vec::new()),
        };

        let documents = self.documents.read();
        let results: Vec<ScoredDocument> = hits
            .into_iter()
            .filter_map(|hit| {
                documents.get(&hit.id).map(|doc| ScoredDocument {
                    document: doc.clone(),
                    score: hit.score,
                })
            })
            .collect();

        debug!(hits = results.len(), "Similarity search");
        Ok(results)
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn embedding(&self) -> &Arc<dyn Embeddings> {
        &self.embedding
    }

    /// Statistics of the underlying collection, `None` before the first insert.
    pub fn stats(&self) -> Option<CollectionStats> {
        self.collection.read().as_ref().map(Collection::stats)
    }

    /// Wrap the store in a retriever.
    pub fn as_retriever(self, search_kwargs: SearchKwargs) -> Result<VectorStoreRetriever> {
        VectorStoreRetriever::new(Arc::new(self), search_kwargs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Maps a text to a fixed vector by its first word.
    struct KeywordEmbeddings;

    fn keyword_vector(text: &str) -> Vec<f32> {
        match text.split_whitespace().next().unwrap_or_default() {
            "cats" => vec![1.0, 0.0, 0.0],
            "dogs" => vec![0.0, 1.0, 0.0],
            "birds" => vec![0.0, 0.0, 1.0],
            _ => vec![0.5, 0.5, 0.5],
        }
    }

    #[async_trait]
    impl Embeddings for KeywordEmbeddings {
        async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| keyword_vector(t)).collect())
        }

        fn model_name(&self) -> &str {
            "keyword"
        }
    }

    fn texts() -> Vec<String> {
        ["cats purr", "dogs bark", "birds sing"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_from_texts_and_search() {
        let store = InMemoryVectorStore::from_texts(
            texts(),
            Arc::new(KeywordEmbeddings),
            StoreOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(store.len(), 3);
        let docs = store.similarity_search("dogs", 1).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "dogs bark");
    }

    #[tokio::test]
    async fn test_scores_descend() {
        let store = InMemoryVectorStore::from_texts(
            texts(),
            Arc::new(KeywordEmbeddings),
            StoreOptions::default().with_metric(DistanceMetric::Euclidean),
        )
        .await
        .unwrap();

        let results = store.similarity_search_with_score("birds", 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].document.content, "birds sing");
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
        // Equidistant neighbours keep insertion order
        assert_eq!(results[1].document.content, "cats purr");
        assert_eq!(results[2].document.content, "dogs bark");
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryVectorStore::from_texts(
            Vec::new(),
            Arc::new(KeywordEmbeddings),
            StoreOptions::default(),
        )
        .await
        .unwrap();

        assert!(store.is_empty());
        assert!(store.stats().is_none());
        assert!(store.similarity_search("cats", 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_documents_later() {
        let store = InMemoryVectorStore::new(Arc::new(KeywordEmbeddings), StoreOptions::default());
        let ids = store
            .add_documents(vec![Document::new("cats nap")])
            .await
            .unwrap();

        assert_eq!(ids.len(), 1);
        assert_eq!(store.stats().map(|s| s.dimensions), Some(3));
        let docs = store.similarity_search("cats", 4).await.unwrap();
        assert_eq!(docs[0].id, ids[0]);
    }

    #[tokio::test]
    async fn test_k_larger_than_store() {
        let store = InMemoryVectorStore::from_texts(
            texts(),
            Arc::new(KeywordEmbeddings),
            StoreOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(store.similarity_search("cats", 10).await.unwrap().len(), 3);
        assert!(store.similarity_search("cats", 0).await.unwrap().is_empty());
    }
}
