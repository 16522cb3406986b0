//! CLI module for ragwire
//!
//! Argument parsing for the `ragwire` binary. Uses clap for argument parsing
//! and owo-colors (see [`output`]) for colored terminal output.

pub mod output;

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file, optional when absent
pub const DEFAULT_CONFIG_PATH: &str = "ragwire.toml";

/// ragwire - retrievers over markdown files and web pages
#[derive(Parser, Debug)]
#[command(
    name = "ragwire",
    version,
    about = "ragwire - build retrievers from markdown files and web pages",
    long_about = "Splits a markdown file into heading sections (or a web page into text chunks),\n\
                  embeds them, and retrieves the passages most relevant to a question.",
    after_help = "EXAMPLES:\n    \
                  ragwire sections docs/faq.md                  # Show how a file is split\n    \
                  ragwire query --file docs/faq.md \"refunds?\"   # Retrieve context for a question\n    \
                  ragwire query --url https://example.com \"hours\" -k 2\n    \
                  ragwire config --validate                     # Check ragwire.toml and env vars"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the sections a markdown file is split into
    Sections {
        /// Markdown file to split
        file: PathBuf,

        /// Deepest heading level that starts a section (1-6)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
        max_level: Option<u8>,

        /// Print sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Retrieve the context relevant to a question
    #[command(group(ArgGroup::new("source").required(true).args(["file", "url"])))]
    Query {
        /// Markdown file to index
        #[arg(long)]
        file: Option<PathBuf>,

        /// Web page to index
        #[arg(long)]
        url: Option<String>,

        /// The question
        question: String,

        /// Number of documents to retrieve (overrides config)
        #[arg(short, long)]
        k: Option<usize>,

        /// Print the question and context as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration information
    Config {
        /// Also check that referenced environment variables are set
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
