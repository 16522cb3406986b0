use super::{Embeddings, check_count};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use std::sync::Arc;

/// In-process ONNX embeddings via fastembed
pub struct FastEmbedEmbeddings {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
}

fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    match name {
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "sentence-transformers/all-MiniLM-L6-v2" | "all-minilm-l6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        other => Err(AppError::Configuration(format!(
            "Unsupported fastembed model: {}. Use: BAAI/bge-small-en-v1.5, \
             BAAI/bge-base-en-v1.5, sentence-transformers/all-MiniLM-L6-v2",
            other
        ))),
    }
}

impl FastEmbedEmbeddings {
    /// Load the model, downloading it on first use
    pub fn new(model_name: &str) -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(resolve_model(model_name)?).with_show_download_progress(true),
        )
        .map_err(|e| AppError::Embedding(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name: model_name.to_string(),
        })
    }
}

#[async_trait]
impl Embeddings for FastEmbedEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let owned = texts.to_vec();
        let vectors = tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
            model.lock().embed(refs, None)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Embedding task failed: {}", e)))?
        .map_err(|e| AppError::Embedding(e.to_string()))?;

        check_count(texts.len(), &vectors)?;
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
