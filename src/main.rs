//! ragwire CLI entry point
//!
//! - `ragwire sections <file>` - show how a markdown file is split
//! - `ragwire query (--file <md> | --url <page>) <question>` - retrieve context
//! - `ragwire config [--validate]` - show the resolved configuration

use anyhow::{Context, bail};
use owo_colors::OwoColorize;
use ragwire::cli::output::Output;
use ragwire::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use ragwire::loaders::{is_markdown_path, split_markdown};
use ragwire::utils::logging::init_tracing;
use ragwire::utils::toml_config::{EmbeddingsConfig, RagwireConfig};
use ragwire::{AppError, RetrieverFactory};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    let config = load_config(&cli.config)?;
    init_tracing(&config.logging, cli.verbose, cli.json_logs);

    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Commands::Sections {
            file,
            max_level,
            json,
        } => {
            let level = max_level.unwrap_or(config.markdown.max_heading_level);
            run_sections(&output, &file, level, json).await
        }
        Commands::Query {
            file,
            url,
            question,
            k,
            json,
        } => run_query(config, &output, file, url, &question, k, json).await,
        Commands::Config { validate } => run_config(&config, &cli.config, &output, validate),
    }
}

/// The default path is optional; an explicitly named file must exist.
fn load_config(path: &Path) -> anyhow::Result<RagwireConfig> {
    let config = if path == Path::new(DEFAULT_CONFIG_PATH) {
        RagwireConfig::load_or_default(path)
    } else {
        RagwireConfig::load(path)
    };
    config.with_context(|| format!("Failed to load configuration from {}", path.display()))
}

async fn run_sections(output: &Output, file: &Path, level: u8, json: bool) -> anyhow::Result<()> {
    if !is_markdown_path(file) {
        return Err(AppError::UnsupportedFileType(file.display().to_string()).into());
    }

    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let sections = split_markdown(&text, level);
    info!(sections = sections.len(), "Split markdown file");

    if json {
        let value: Vec<_> = sections
            .iter()
            .map(|s| json!({ "heading": s.heading, "level": s.level, "text": s.text }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    output.header(&file.display().to_string());
    for (i, section) in sections.iter().enumerate() {
        output.section(i, section.heading.as_deref(), &section.text);
    }
    output.newline();
    output.success(&format!("{} sections", sections.len()));
    Ok(())
}

async fn run_query(
    mut config: RagwireConfig,
    output: &Output,
    file: Option<PathBuf>,
    url: Option<String>,
    question: &str,
    k: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(k) = k {
        config.retrieval.k = k;
    }
    let factory = RetrieverFactory::new(config);

    let runnable = match (file, url) {
        (Some(file), _) => factory.create_runnable_from_file(file, None).await?,
        (None, Some(url)) => factory.create_runnable_from_url(&url, None).await?,
        (None, None) => bail!("either --file or --url is required"),
    };

    let answer = runnable.invoke_question(question).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    output.header("Question");
    output.info(&answer.question);
    output.header(&format!("Context ({} documents)", answer.context.len()));
    if answer.context.is_empty() {
        output.warning("No documents retrieved");
    }
    for (i, document) in answer.context.iter().enumerate() {
        output.document(i + 1, document);
    }
    output.newline();
    Ok(())
}

fn run_config(
    config: &RagwireConfig,
    path: &Path,
    output: &Output,
    validate: bool,
) -> anyhow::Result<()> {
    output.header("Configuration");
    if path.exists() {
        output.kv("file", &path.display().to_string());
    } else {
        output.kv("file", "(defaults)");
    }

    let model = match &config.embeddings {
        EmbeddingsConfig::OpenAI { model, .. }
        | EmbeddingsConfig::Ollama { model, .. }
        | EmbeddingsConfig::FastEmbed { model } => model.as_str(),
    };
    output.kv("embeddings.provider", config.embeddings.provider_name());
    output.kv("embeddings.model", model);
    output.kv("logging.level", &config.logging.level);
    output.kv(
        "markdown.max_heading_level",
        &config.markdown.max_heading_level.to_string(),
    );
    output.kv("web.chunk_size", &config.web.chunk_size.to_string());
    output.kv("web.chunk_overlap", &config.web.chunk_overlap.to_string());
    output.kv("retrieval.k", &config.retrieval.k.to_string());
    output.kv("retrieval.index", config.retrieval.index_kind().name());
    if let Some(threshold) = config.retrieval.score_threshold {
        output.kv("retrieval.score_threshold", &threshold.to_string());
    }

    if validate {
        output.newline();
        match config.validate().and_then(|_| config.validate_env()) {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                output.hint("Secrets can also be placed in a .env file");
                bail!("configuration is invalid");
            }
        }
    }
    Ok(())
}
