//! Markdown section splitting.
//!
//! A section runs from a heading to the next heading at the same or a
//! shallower split level. Headings are found with pulldown-cmark, so `#`
//! lines inside fenced code never start a section.

use crate::types::{Document, DocumentMetadata, Result};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::path::Path;
use tracing::{debug, instrument};

/// One section of a markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownSection {
    /// Plain text of the heading, `None` for text before the first heading
    pub heading: Option<String>,
    pub level: Option<u8>,
    /// Raw markdown of the section, heading line included, trimmed
    pub text: String,
}

/// Whether the path names a markdown file (`.md` / `.markdown`, any case).
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

fn level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

struct SectionStart {
    offset: usize,
    level: u8,
    heading: String,
}

/// Split markdown text into sections at headings of level `<= max_level`.
///
/// Text before the first heading becomes a section without a heading.
/// Whitespace-only sections are dropped, so an empty input yields nothing.
pub fn split_markdown(text: &str, max_level: u8) -> Vec<MarkdownSection> {
    let mut starts: Vec<SectionStart> = Vec::new();
    let mut current: Option<SectionStart> = None;

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                let level = level_number(level);
                if level <= max_level {
                    // Container markers such as `> ` belong to the heading's line.
                    let line_start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
                    current = Some(SectionStart {
                        offset: line_start,
                        level,
                        heading: String::new(),
                    });
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some(start) = current.as_mut() {
                    start.heading.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(start) = current.as_mut() {
                    start.heading.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(start) = current.take() {
                    starts.push(start);
                }
            }
            _ => {}
        }
    }

    let mut sections = Vec::with_capacity(starts.len() + 1);
    let first = starts.first().map(|s| s.offset).unwrap_or(text.len());
    push_section(&mut sections, None, None, &text[..first]);

    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map(|s| s.offset).unwrap_or(text.len());
        push_section(
            &mut sections,
            Some(start.heading.trim().to_string()),
            Some(start.level),
            &text[start.offset..end],
        );
    }

    sections
}

fn push_section(
    sections: &mut Vec<MarkdownSection>,
    heading: Option<String>,
    level: Option<u8>,
    raw: &str,
) {
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    sections.push(MarkdownSection {
        heading,
        level,
        text: text.to_string(),
    });
}

/// Read a markdown file and return the text of every section.
pub fn parse_markdown<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(split_markdown(&content, 6)
        .into_iter()
        .map(|s| s.text)
        .collect())
}

/// Read a markdown file into one [`Document`] per section.
///
/// Metadata carries the file path as `source`, the section heading, and the
/// file's first level-1 heading as `title`.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_markdown(path: &Path, max_level: u8) -> Result<Vec<Document>> {
    let content = tokio::fs::read_to_string(path).await?;
    let sections = split_markdown(&content, max_level);

    let title = sections
        .iter()
        .find(|s| s.level == Some(1))
        .and_then(|s| s.heading.clone());
    let source = path.display().to_string();

    let documents: Vec<Document> = sections
        .into_iter()
        .enumerate()
        .map(|(i, section)| {
            let metadata = DocumentMetadata {
                title: title.clone(),
                section: section.heading,
                chunk_index: Some(i),
                ..DocumentMetadata::from_source(source.clone())
            };
            Document::new(section.text).with_metadata(metadata)
        })
        .collect();

    debug!(sections = documents.len(), "Split markdown file");
    Ok(documents)
}
