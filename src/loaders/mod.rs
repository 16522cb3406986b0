//! Document loaders: turn a source (file path or URL) into [`Document`]s.
//!
//! [`Document`]: crate::types::Document

pub mod markdown;
pub mod web;

pub use markdown::{
    MarkdownSection, is_markdown_path, load_markdown, parse_markdown, split_markdown,
};
pub use web::{WebLoader, html_to_document};
