//! # ragwire
//!
//! Retrievers over a single markdown file or web page, in a few lines.
//!
//! ## Overview
//!
//! ragwire can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `ragwire` binary
//! 2. **As a library** - Build retrievers and runnables in your own project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use ragwire::{RetrieverFactory, Retriever};
//!
//! #[tokio::main]
//! async fn main() -> ragwire::Result<()> {
//!     // Embeds with OpenAI, key from OPENAI_API_KEY
//!     let factory = RetrieverFactory::default();
//!
//!     let retriever = factory.create_retriever_from_file("docs/faq.md", None).await?;
//!     for doc in retriever.retrieve("How long do refunds take?").await? {
//!         println!("{}", doc.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Question and context
//!
//! ```rust,ignore
//! let chain = factory.create_runnable_from_file("docs/faq.md", None).await?;
//! let out = chain.invoke_question("How long do refunds take?").await?;
//! // out.question == "How long do refunds take?", out.context == top-k sections
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-embeddings` | In-process ONNX embeddings via fastembed |
//!
//! ## Modules
//!
//! - [`loaders`] - Markdown section splitting and web page extraction
//! - [`embeddings`] - Embedding models (OpenAI, Ollama, FastEmbed)
//! - [`db`] - In-memory vector store
//! - [`rag`] - Chunking, retrievers and the retriever factory
//! - [`runnable`] - Composable steps and the question/context parallel
//! - [`utils`] - `ragwire.toml` configuration and logging setup
//! - [`types`] - Documents and errors

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line argument definitions and terminal output.
pub mod cli;
/// Vector storage for retrievers.
pub mod db;
/// Embedding model clients.
pub mod embeddings;
/// Document loaders (markdown, web).
pub mod loaders;
/// Chunking, retrieval and the retriever factory.
pub mod rag;
/// Composable pipeline steps.
pub mod runnable;
/// Core types (documents, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{InMemoryVectorStore, StoreOptions};
pub use embeddings::{EmbeddingProvider, Embeddings};
pub use rag::{
    RecursiveCharacterSplitter, Retriever, RetrieverFactory, SearchKwargs, VectorStoreRetriever,
};
pub use runnable::{QuestionAndContext, Runnable, RunnableParallel, RunnablePassthrough};
pub use types::{AppError, Document, DocumentMetadata, Result, ScoredDocument};
pub use utils::toml_config::RagwireConfig;
