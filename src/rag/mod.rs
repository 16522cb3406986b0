//! Retrieval pipeline
//!
//! Turns a source into something that answers "which passages are relevant
//! to this question?".
//!
//! # Module Structure
//!
//! - [`rag::chunker`](crate::rag::chunker) - Recursive character splitting of long pages
//! - [`rag::retriever`](crate::rag::retriever) - The [`Retriever`] trait and vector store retriever
//! - [`rag::factory`](crate::rag::factory) - One-call construction from a file or URL
//!
//! # Pipeline
//!
//! 1. **Load** - markdown sections from a file, or the visible text of a page
//! 2. **Split** - web pages are split into overlapping chunks
//! 3. **Embed** - every document is embedded in one batch
//! 4. **Index** - vectors go into an in-memory collection
//! 5. **Retrieve** - the query is embedded and the top-k documents returned
//!
//! # Example
//!
//! ```ignore
//! use ragwire::rag::{RetrieverFactory, Retriever};
//!
//! let factory = RetrieverFactory::default();
//! let retriever = factory.create_retriever_from_url("https://example.com/faq").await?;
//! let docs = retriever.retrieve("Do you ship abroad?").await?;
//! ```

pub mod chunker;
pub mod factory;
pub mod retriever;

pub use chunker::RecursiveCharacterSplitter;
pub use factory::RetrieverFactory;
pub use retriever::{Retriever, SearchKwargs, VectorStoreRetriever};
