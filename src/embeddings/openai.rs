use super::{Embeddings, check_count};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Embeddings through the OpenAI `/embeddings` endpoint (or a compatible API)
pub struct OpenAIEmbeddings {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAIEmbeddings {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            batch_size: 1000,
        }
    }

    /// Maximum number of texts sent per request (at least 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: batch,
            })
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, body
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Invalid OpenAI response: {}", e)))?;

        // The API may answer out of order; `index` is authoritative.
        parsed.data.sort_by_key(|d| d.index);
        let indices: Vec<usize> = parsed.data.iter().map(|d| d.index).collect();
        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();
        check_count(batch.len(), &vectors)?;
        if let Some(position) = indices.iter().enumerate().position(|(i, &index)| i != index) {
            return Err(AppError::Embedding(format!(
                "OpenAI response indices are not 0..{}: expected {} at position {}, got {}",
                batch.len(),
                position,
                position,
                indices[position]
            )));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl Embeddings for OpenAIEmbeddings {
    #[instrument(skip(self, texts), fields(model = %self.model, count = texts.len()))]
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        debug!(count = vectors.len(), "Embedded texts");
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
