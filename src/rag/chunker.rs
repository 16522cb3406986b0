use crate::types::{AppError, Document, Result};
use text_splitter::{Characters, ChunkConfig, TextSplitter};

/// Default maximum characters per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 4000;
/// Default characters shared between neighbouring chunks
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits long text into overlapping chunks, preferring the largest semantic
/// boundary that fits (paragraphs, then lines, sentences, words, characters).
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    splitter: TextSplitter<Characters>,
}

impl std::fmt::Debug for RecursiveCharacterSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecursiveCharacterSplitter")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .finish()
    }
}

impl RecursiveCharacterSplitter {
    /// # Errors
    ///
    /// `AppError::InvalidInput` if `chunk_size` is zero or `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AppError::InvalidInput(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(AppError::InvalidInput(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        let config = ChunkConfig::new(chunk_size)
            .with_overlap(chunk_overlap)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        Ok(Self {
            chunk_size,
            chunk_overlap,
            splitter: TextSplitter::new(config),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.splitter.chunks(text).map(str::to_string).collect()
    }

    /// Split every document; chunks inherit the parent's metadata and get a
    /// fresh id plus their position in `chunk_index`.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .enumerate()
                    .map(move |(i, chunk)| {
                        let mut metadata = doc.metadata.clone();
                        metadata.chunk_index = Some(i);
                        Document::new(chunk).with_metadata(metadata)
                    })
            })
            .collect()
    }
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        let config = ChunkConfig::new(DEFAULT_CHUNK_SIZE)
            .with_overlap(DEFAULT_CHUNK_OVERLAP)
            .unwrap_or_else(|_| ChunkConfig::new(DEFAULT_CHUNK_SIZE));
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            splitter: TextSplitter::new(config),
        }
    }
}
