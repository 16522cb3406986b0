//! Web page loading.

use crate::types::{AppError, Document, DocumentMetadata, Result};
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that end the current line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "details",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section",
    "summary", "table", "td", "th", "tr", "ul",
];

/// Fetches a single page and extracts its visible text as one [`Document`].
///
/// # Example
///
/// ```rust,ignore
/// let docs = WebLoader::new("https://example.com/faq")
///     .with_selector("main")
///     .load()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct WebLoader {
    url: String,
    selector: Option<String>,
    user_agent: String,
    timeout: Duration,
}

impl WebLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            selector: None,
            user_agent: concat!("ragwire/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Only extract text from elements matching this CSS selector
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the page and return its text.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidInput` for a malformed or non-http(s) URL, or a bad selector
    /// - `AppError::Fetch` for network failures and non-success statuses
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn load(&self) -> Result<Vec<Document>> {
        let parsed = reqwest::Url::parse(&self.url)
            .map_err(|e| AppError::InvalidInput(format!("Invalid URL '{}': {}", self.url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::InvalidInput(format!(
                "Unsupported URL scheme '{}': only http and https can be loaded",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()?;

        let response = client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!(
                "GET {} returned {}",
                self.url, status
            )));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");

        let document = html_to_document(&body, &self.url, self.selector.as_deref())?;
        info!(chars = document.content.len(), "Extracted page text");
        Ok(vec![document])
    }
}

/// Extract the visible text of an HTML page.
///
/// Text comes from every element matching `selector`, or from `<body>` (the
/// whole document if there is none). Script, style and noscript content is
/// skipped. Inline markup stays on one line; block elements such as `p`,
/// `li` and `br` start a new one. Whitespace within a line is collapsed.
pub fn html_to_document(html: &str, source: &str, selector: Option<&str>) -> Result<Document> {
    let page = Html::parse_document(html);

    let roots: Vec<ElementRef> = match selector {
        Some(css) => {
            let sel = parse_selector(css)?;
            page.select(&sel).collect()
        }
        None => {
            let body = parse_selector("body")?;
            match page.select(&body).next() {
                Some(el) => vec![el],
                None => vec![page.root_element()],
            }
        }
    };

    let mut lines = Vec::new();
    for root in roots {
        let mut line = String::new();
        collect_text(root, &mut line, &mut lines);
        flush_line(&mut line, &mut lines);
    }

    let mut metadata = DocumentMetadata::from_source(source);
    metadata.title = select_first(&page, "title")?
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());
    if let Some(lang) = select_first(&page, "html")?.and_then(|el| el.value().attr("lang")) {
        metadata
            .extra
            .insert("language".to_string(), lang.to_string());
    }

    Ok(Document::new(lines.join("\n")).with_metadata(metadata))
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::InvalidInput(format!("Invalid CSS selector '{}': {}", css, e)))
}

fn select_first<'a>(page: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = parse_selector(css)?;
    Ok(page.select(&sel).next())
}

fn collect_text(element: ElementRef, line: &mut String, lines: &mut Vec<String>) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }
    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        flush_line(line, lines);
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => line.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, line, lines);
                }
            }
            _ => {}
        }
    }
    if block {
        flush_line(line, lines);
    }
}

fn flush_line(line: &mut String, lines: &mut Vec<String>) {
    let text = collapse_whitespace(line);
    if !text.is_empty() {
        lines.push(text);
    }
    line.clear();
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>  Store   Hours </title>
  <style>body { color: red; }</style>
</head>
<body>
  <nav>Home | About</nav>
  <main>
    <h1>Opening hours</h1>
    <p>Monday to   Friday,
       9am to 5pm.</p>
    <script>console.log("tracking");</script>
    <noscript>Enable JavaScript</noscript>
  </main>
</body>
</html>"#;

    #[test]
    fn test_extracts_body_text() {
        let doc = html_to_document(PAGE, "https://shop.test/hours", None).unwrap();

        assert_eq!(
            doc.content,
            "Home | About\nOpening hours\nMonday to Friday, 9am to 5pm."
        );
        assert_eq!(doc.metadata.source, "https://shop.test/hours");
        assert_eq!(doc.metadata.title.as_deref(), Some("Store Hours"));
        assert_eq!(doc.metadata.extra.get("language").map(String::as_str), Some("en"));
    }

    #[test]
    fn test_inline_markup_stays_on_one_line() {
        let doc = html_to_document("<p>Call <a>us</a> to<b>day</b>.</p>", "u", None).unwrap();
        assert_eq!(doc.content, "Call us today.");
    }

    #[test]
    fn test_block_elements_break_lines() {
        let html = r#"<body>
            <ul><li>Free <em>express</em> shipping</li><li>30-day returns</li></ul>
            <div>Line one<br>Line <span>two</span></div>
            <table><tr><td>Mon</td><td>9-5</td></tr></table>
        </body>"#;
        let doc = html_to_document(html, "u", None).unwrap();
        assert_eq!(
            doc.content,
            "Free express shipping\n30-day returns\nLine one\nLine two\nMon\n9-5"
        );
    }

    #[test]
    fn test_selector_restricts_text() {
        let doc = html_to_document(PAGE, "u", Some("main p")).unwrap();
        assert_eq!(doc.content, "Monday to Friday, 9am to 5pm.");
    }

    #[test]
    fn test_selector_without_match_is_empty() {
        let doc = html_to_document(PAGE, "u", Some("article")).unwrap();
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let result = html_to_document(PAGE, "u", Some("p[[["));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_fragment_without_markup() {
        let doc = html_to_document("plain words", "u", None).unwrap();
        assert_eq!(doc.content, "plain words");
        assert!(doc.metadata.title.is_none());
        assert!(doc.metadata.extra.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let result = WebLoader::new("file:///etc/passwd").load().await;
        assert!(matches!(result, Err(AppError::InvalidInput(msg)) if msg.contains("file")));
    }

    #[tokio::test]
    async fn test_rejects_malformed_url() {
        let result = WebLoader::new("not a url").load().await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
