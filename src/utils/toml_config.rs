//! TOML-based configuration for ragwire
//!
//! Every section of `ragwire.toml` is optional and every field has a default,
//! so an empty file (or no file at all) yields a working configuration that
//! embeds with OpenAI, exactly like a bare `RetrieverFactory::default()`.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [embeddings]
//! provider = "ollama"
//! model = "nomic-embed-text"
//!
//! [web]
//! chunk_size = 2000
//! chunk_overlap = 100
//!
//! [retrieval]
//! k = 6
//! index = "hnsw"
//! ```
//!
//! Secrets are never stored in the file: providers reference the name of an
//! environment variable (`api_key_env`), which may also come from `.env`.

use ragwire_vector::HnswConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root configuration structure loaded from ragwire.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagwireConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    #[serde(default)]
    pub markdown: MarkdownConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Embeddings Configuration =============

/// Embedding backend. `provider` defaults to `openai` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "EmbeddingsSection", into = "EmbeddingsSection")]
pub enum EmbeddingsConfig {
    OpenAI {
        /// Environment variable containing the API key
        api_key_env: String,
        api_base: String,
        model: String,
        /// Maximum number of texts per request
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

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ProviderKind {
    #[default]
    OpenAI,
    Ollama,
    FastEmbed,
}

/// On-disk shape of `[embeddings]`; fields a provider doesn't use are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
struct EmbeddingsSection {
    #[serde(default)]
    provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    batch_size: Option<usize>,
}

impl From<EmbeddingsSection> for EmbeddingsConfig {
    fn from(section: EmbeddingsSection) -> Self {
        match section.provider {
            ProviderKind::OpenAI => EmbeddingsConfig::OpenAI {
                api_key_env: section.api_key_env.unwrap_or_else(default_openai_key_env),
                api_base: section.api_base.unwrap_or_else(default_openai_base),
                model: section.model.unwrap_or_else(default_openai_model),
                batch_size: section.batch_size.unwrap_or_else(default_batch_size),
            },
            ProviderKind::Ollama => EmbeddingsConfig::Ollama {
                base_url: section.base_url.unwrap_or_else(default_ollama_url),
                model: section.model.unwrap_or_else(default_ollama_model),
            },
            ProviderKind::FastEmbed => EmbeddingsConfig::FastEmbed {
                model: section.model.unwrap_or_else(default_fastembed_model),
            },
        }
    }
}

impl From<EmbeddingsConfig> for EmbeddingsSection {
    fn from(config: EmbeddingsConfig) -> Self {
        match config {
            EmbeddingsConfig::OpenAI {
                api_key_env,
                api_base,
                model,
                batch_size,
            } => Self {
                provider: ProviderKind::OpenAI,
                api_key_env: Some(api_key_env),
                api_base: Some(api_base),
                model: Some(model),
                batch_size: Some(batch_size),
                ..Self::default()
            },
            EmbeddingsConfig::Ollama { base_url, model } => Self {
                provider: ProviderKind::Ollama,
                base_url: Some(base_url),
                model: Some(model),
                ..Self::default()
            },
            EmbeddingsConfig::FastEmbed { model } => Self {
                provider: ProviderKind::FastEmbed,
                model: Some(model),
                ..Self::default()
            },
        }
    }
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_batch_size() -> usize {
    1000
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_fastembed_model() -> String {
    "BAAI/bge-small-en-v1.5".to_string()
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        EmbeddingsConfig::OpenAI {
            api_key_env: default_openai_key_env(),
            api_base: default_openai_base(),
            model: default_openai_model(),
            batch_size: default_batch_size(),
        }
    }
}

impl EmbeddingsConfig {
    pub fn provider_name(&self) -> &'static str {
        match self {
            EmbeddingsConfig::OpenAI { .. } => "openai",
            EmbeddingsConfig::Ollama { .. } => "ollama",
            EmbeddingsConfig::FastEmbed { .. } => "fastembed",
        }
    }
}

// ============= Markdown Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Deepest heading level that starts a new section (1-6)
    #[serde(default = "default_max_heading_level")]
    pub max_heading_level: u8,
}

fn default_max_heading_level() -> u8 {
    6
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            max_heading_level: default_max_heading_level(),
        }
    }
}

// ============= Web Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// CSS selector restricting which part of the page is loaded
    #[serde(default)]
    pub selector: Option<String>,
}

fn default_chunk_size() -> usize {
    4000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_user_agent() -> String {
    format!("ragwire/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            selector: None,
        }
    }
}

// ============= Retrieval Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents returned per query
    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default)]
    pub score_threshold: Option<f32>,

    #[serde(default)]
    pub index: IndexChoice,

    #[serde(default)]
    pub hnsw: HnswConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexChoice {
    #[default]
    Flat,
    Hnsw,
}

fn default_k() -> usize {
    4
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            score_threshold: None,
            index: IndexChoice::default(),
            hnsw: HnswConfig::default(),
        }
    }
}

impl RetrievalConfig {
    pub fn index_kind(&self) -> ragwire_vector::IndexKind {
        match self.index {
            IndexChoice::Flat => ragwire_vector::IndexKind::Flat,
            IndexChoice::Hnsw => ragwire_vector::IndexKind::Hnsw(self.hnsw.clone()),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl RagwireConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound(path)) => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RagwireConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate internal consistency (does not touch the environment)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.web.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "web.chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.web.chunk_overlap >= self.web.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "web.chunk_overlap ({}) must be smaller than web.chunk_size ({})",
                self.web.chunk_overlap, self.web.chunk_size
            )));
        }
        if self.retrieval.k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.k must be greater than 0".to_string(),
            ));
        }
        if !(1..=6).contains(&self.markdown.max_heading_level) {
            return Err(ConfigError::ValidationError(format!(
                "markdown.max_heading_level must be between 1 and 6, got {}",
                self.markdown.max_heading_level
            )));
        }
        if let EmbeddingsConfig::OpenAI { batch_size: 0, .. } = self.embeddings {
            return Err(ConfigError::ValidationError(
                "embeddings.batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that every environment variable the config references is set
    pub fn validate_env(&self) -> Result<(), ConfigError> {
        if let EmbeddingsConfig::OpenAI { api_key_env, .. } = &self.embeddings {
            self.resolve_env(api_key_env)
                .ok_or_else(|| ConfigError::MissingEnvVar(api_key_env.clone()))?;
        }
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = RagwireConfig::from_toml_str("").unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.embeddings.provider_name(), "openai");
        assert_eq!(config.markdown.max_heading_level, 6);
        assert_eq!(config.web.chunk_size, 4000);
        assert_eq!(config.web.chunk_overlap, 200);
        assert_eq!(config.retrieval.k, 4);
        assert_eq!(config.retrieval.index, IndexChoice::Flat);
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[logging]
level = "debug"
format = "json"

[embeddings]
provider = "ollama"
base_url = "http://gpu-box:11434"

[markdown]
max_heading_level = 2

[web]
chunk_size = 1000
chunk_overlap = 50
selector = "article"

[retrieval]
k = 8
score_threshold = 0.25
index = "hnsw"

[retrieval.hnsw]
m = 8
"#;
        let config = RagwireConfig::from_toml_str(content).unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        match &config.embeddings {
            EmbeddingsConfig::Ollama { base_url, model } => {
                assert_eq!(base_url, "http://gpu-box:11434");
                assert_eq!(model, "nomic-embed-text");
            }
            other => panic!("unexpected provider: {:?}", other),
        }
        assert_eq!(config.markdown.max_heading_level, 2);
        assert_eq!(config.web.selector.as_deref(), Some("article"));
        assert_eq!(config.retrieval.score_threshold, Some(0.25));
        assert_eq!(config.retrieval.hnsw.m, 8);
        assert_eq!(config.retrieval.hnsw.ef_search, 100);
        assert_eq!(config.retrieval.index_kind().name(), "hnsw");
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let content = "[web]\nchunk_size = 100\nchunk_overlap = 100\n";
        let result = RagwireConfig::from_toml_str(content);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_k_rejected() {
        let result = RagwireConfig::from_toml_str("[retrieval]\nk = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_heading_level_range() {
        let result = RagwireConfig::from_toml_str("[markdown]\nmax_heading_level = 7\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_embeddings_without_provider_is_openai() {
        let content = "[embeddings]\nmodel = \"text-embedding-3-small\"\n";
        let config = RagwireConfig::from_toml_str(content).unwrap();

        match &config.embeddings {
            EmbeddingsConfig::OpenAI {
                api_key_env,
                model,
                batch_size,
                ..
            } => {
                assert_eq!(api_key_env, "OPENAI_API_KEY");
                assert_eq!(model, "text-embedding-3-small");
                assert_eq!(*batch_size, 1000);
            }
            other => panic!("unexpected provider: {:?}", other),
        }
    }

    #[test]
    fn test_embeddings_serialize_round_trip() {
        let embeddings = EmbeddingsConfig::FastEmbed {
            model: "BAAI/bge-base-en-v1.5".to_string(),
        };

        let text = toml::to_string(&embeddings).unwrap();
        assert!(text.contains("provider = \"fastembed\""));
        let parsed: EmbeddingsConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.provider_name(), "fastembed");
    }

    #[test]
    fn test_unknown_provider_is_parse_error() {
        let result = RagwireConfig::from_toml_str("[embeddings]\nprovider = \"cohere\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_api_key_env() {
        let content = r#"
[embeddings]
provider = "openai"
api_key_env = "RAGWIRE_TEST_KEY_THAT_IS_NEVER_SET"
"#;
        let config = RagwireConfig::from_toml_str(content).unwrap();
        let result = config.validate_env();
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "RAGWIRE_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RagwireConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.retrieval.k, 4);

        let result = RagwireConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
