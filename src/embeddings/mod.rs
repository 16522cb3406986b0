//! Embedding model abstractions and provider management
//!
//! Every retriever needs an [`Embeddings`] implementation to turn text into
//! vectors. Three backends are available:
//! - **OpenAI**: the `/embeddings` endpoint of OpenAI or any compatible API (default)
//! - **Ollama**: the `/api/embed` endpoint of a local Ollama server
//! - **FastEmbed**: local ONNX models, behind the `local-embeddings` feature
//!
//! Callers usually go through [`EmbeddingProvider`], built from the
//! `[embeddings]` section of `ragwire.toml`.

pub mod ollama;
pub mod openai;

#[cfg(feature = "local-embeddings")]
pub mod local;

pub use ollama::OllamaEmbeddings;
pub use openai::OpenAIEmbeddings;

use crate::types::{AppError, Result};
use crate::utils::toml_config::EmbeddingsConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// Text embedding model.
///
/// Implementations must return exactly one vector per input text, in input
/// order, and must not make a request for an empty input.
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// Embed a batch of texts
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single search query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_documents(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::Embedding("Empty embedding response".to_string()))
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
///
/// | Provider | Requires | Notes |
/// |----------|----------|-------|
/// | OpenAI | API key | Default, same as a bare factory |
/// | Ollama | running server | Local, no key |
/// | FastEmbed | `local-embeddings` feature | In-process ONNX |
#[derive(Debug, Clone)]
pub enum EmbeddingProvider {
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        batch_size: usize,
    },
    Ollama {
        base_url: String,
        model: String,
    },
    FastEmbed {
        model: String,
    },
}

impl EmbeddingProvider {
    /// Resolve a provider from configuration, reading secrets from the environment
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the OpenAI key variable is unset.
    pub fn from_config(config: &EmbeddingsConfig) -> Result<Self> {
        match config {
            EmbeddingsConfig::OpenAI {
                api_key_env,
                api_base,
                model,
                batch_size,
            } => {
                let api_key = std::env::var(api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        AppError::Configuration(format!(
                            "OpenAI embeddings need an API key: set the {} environment variable",
                            api_key_env
                        ))
                    })?;
                Ok(EmbeddingProvider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                    batch_size: *batch_size,
                })
            }
            EmbeddingsConfig::Ollama { base_url, model } => Ok(EmbeddingProvider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
            EmbeddingsConfig::FastEmbed { model } => Ok(EmbeddingProvider::FastEmbed {
                model: model.clone(),
            }),
        }
    }

    /// OpenAI with default model and endpoint, key from `OPENAI_API_KEY`
    pub fn default_openai() -> Result<Self> {
        Self::from_config(&EmbeddingsConfig::default())
    }

    /// Create an embedding model instance for this provider
    pub fn create(&self) -> Result<Arc<dyn Embeddings>> {
        match self {
            EmbeddingProvider::OpenAI {
                api_key,
                api_base,
                model,
                batch_size,
            } => Ok(Arc::new(
                OpenAIEmbeddings::new(api_key.clone(), api_base.clone(), model.clone())
                    .with_batch_size(*batch_size),
            )),
            EmbeddingProvider::Ollama { base_url, model } => Ok(Arc::new(
                OllamaEmbeddings::new(base_url.clone(), model.clone()),
            )),
            #[cfg(feature = "local-embeddings")]
            EmbeddingProvider::FastEmbed { model } => {
                Ok(Arc::new(local::FastEmbedEmbeddings::new(model)?))
            }
            #[cfg(not(feature = "local-embeddings"))]
            EmbeddingProvider::FastEmbed { model } => Err(AppError::Configuration(format!(
                "FastEmbed model '{}' requested but ragwire was built without the \
                 `local-embeddings` feature",
                model
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingProvider::OpenAI { .. } => "OpenAI",
            EmbeddingProvider::Ollama { .. } => "Ollama",
            EmbeddingProvider::FastEmbed { .. } => "FastEmbed",
        }
    }
}

/// Ensure a backend returned one vector per input.
pub(crate) fn check_count(expected: usize, vectors: &[Vec<f32>]) -> Result<()> {
    if vectors.len() != expected {
        return Err(AppError::Embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            vectors.len()
        )));
    }
    Ok(())
}
