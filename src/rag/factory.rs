//! Retriever construction from files and URLs.

use super::chunker::RecursiveCharacterSplitter;
use super::retriever::{SearchKwargs, VectorStoreRetriever};
use crate::db::{InMemoryVectorStore, StoreOptions};
use crate::embeddings::{EmbeddingProvider, Embeddings};
use crate::loaders::{WebLoader, is_markdown_path, load_markdown};
use crate::runnable::{RunnableParallel, RunnablePassthrough};
use crate::types::{AppError, Result};
use crate::utils::toml_config::RagwireConfig;
use ragwire_vector::DistanceMetric;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Builds retrievers and question/context runnables.
///
/// Without an injected embedding model the one described by
/// `config.embeddings` is used (OpenAI `text-embedding-ada-002` by default).
///
/// # Example
///
/// ```rust,ignore
/// let factory = RetrieverFactory::default();
/// let retriever = factory.create_retriever_from_file("docs/faq.md", None).await?;
/// let docs = retriever.retrieve("How do refunds work?").await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RetrieverFactory {
    config: RagwireConfig,
}

impl RetrieverFactory {
    pub fn new(config: RagwireConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RagwireConfig {
        &self.config
    }

    fn default_embedding(&self) -> Result<Arc<dyn Embeddings>> {
        let provider = EmbeddingProvider::from_config(&self.config.embeddings)?;
        debug!(provider = provider.name(), "Using configured embedding provider");
        provider.create()
    }

    fn search_kwargs(&self) -> SearchKwargs {
        SearchKwargs {
            k: self.config.retrieval.k,
            score_threshold: self.config.retrieval.score_threshold,
        }
    }

    fn store_options(&self, metric: DistanceMetric) -> StoreOptions {
        StoreOptions::default()
            .with_metric(metric)
            .with_index(self.config.retrieval.index_kind())
    }

    /// Index a markdown file, one document per heading section.
    ///
    /// # Errors
    ///
    /// - `AppError::UnsupportedFileType` if the path is not `.md` / `.markdown`
    ///   (checked before any embedding model is built)
    /// - `AppError::Io` if the file cannot be read
    #[instrument(skip(self, path, embedding), fields(path = %path.as_ref().display()))]
    pub async fn create_retriever_from_file<P: AsRef<Path>>(
        &self,
        path: P,
        embedding: Option<Arc<dyn Embeddings>>,
    ) -> Result<VectorStoreRetriever> {
        let path = path.as_ref();
        if !is_markdown_path(path) {
            return Err(AppError::UnsupportedFileType(path.display().to_string()));
        }

        let embedding = match embedding {
            Some(embedding) => embedding,
            None => self.default_embedding()?,
        };

        let documents = load_markdown(path, self.config.markdown.max_heading_level).await?;
        let sections = documents.len();

        let store = InMemoryVectorStore::from_documents(
            documents,
            embedding,
            self.store_options(DistanceMetric::Cosine),
        )
        .await?;

        info!(sections, "Built markdown retriever");
        store.as_retriever(self.search_kwargs())
    }

    /// Fetch a web page, split it into chunks and index them, embedding with
    /// the configured provider.
    pub async fn create_retriever_from_url(&self, url: &str) -> Result<VectorStoreRetriever> {
        let embedding = self.default_embedding()?;
        self.create_retriever_from_url_with(url, embedding).await
    }

    /// [`create_retriever_from_url`](Self::create_retriever_from_url) with an
    /// explicit embedding model.
    #[instrument(skip(self, embedding))]
    pub async fn create_retriever_from_url_with(
        &self,
        url: &str,
        embedding: Arc<dyn Embeddings>,
    ) -> Result<VectorStoreRetriever> {
        let web = &self.config.web;
        let splitter = RecursiveCharacterSplitter::new(web.chunk_size, web.chunk_overlap)?;

        let mut loader = WebLoader::new(url)
            .with_user_agent(web.user_agent.clone())
            .with_timeout(Duration::from_secs(web.timeout_secs));
        if let Some(selector) = &web.selector {
            loader = loader.with_selector(selector.clone());
        }

        let pages = loader.load().await?;
        let chunks = splitter.split_documents(&pages);
        let chunk_count = chunks.len();

        let store = InMemoryVectorStore::from_documents(
            chunks,
            embedding,
            self.store_options(DistanceMetric::Euclidean),
        )
        .await?;

        info!(chunks = chunk_count, "Built web retriever");
        store.as_retriever(self.search_kwargs())
    }

    /// Markdown retriever wrapped in the standard parallel: `"context"` holds
    /// the retrieved documents, `"question"` the input unchanged.
    pub async fn create_runnable_from_file<P: AsRef<Path>>(
        &self,
        path: P,
        embedding: Option<Arc<dyn Embeddings>>,
    ) -> Result<RunnableParallel> {
        let retriever = self.create_retriever_from_file(path, embedding).await?;
        Ok(question_and_context(retriever))
    }

    /// Web retriever wrapped in the standard `"context"` + `"question"` parallel.
    pub async fn create_runnable_from_url(
        &self,
        url: &str,
        embedding: Option<Arc<dyn Embeddings>>,
    ) -> Result<RunnableParallel> {
        let retriever = match embedding {
            Some(embedding) => self.create_retriever_from_url_with(url, embedding).await?,
            None => self.create_retriever_from_url(url).await?,
        };
        Ok(question_and_context(retriever))
    }
}

fn question_and_context(retriever: VectorStoreRetriever) -> RunnableParallel {
    RunnableParallel::new()
        .with_step("context", Arc::new(retriever))
        .with_step("question", Arc::new(RunnablePassthrough))
}
