//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the ragwire CLI.

use crate::types::Document;
use owo_colors::OwoColorize;

/// Characters of document text shown before truncation
const PREVIEW_CHARS: usize = 280;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a numbered markdown section
    pub fn section(&self, index: usize, heading: Option<&str>, text: &str) {
        let heading = heading.unwrap_or("(preamble)");
        if self.colored {
            println!(
                "\n  {} {}",
                format!("[{}]", index).dimmed(),
                heading.cyan().bold()
            );
        } else {
            println!("\n  [{}] {}", index, heading);
        }
        for line in preview(text).lines() {
            println!("      {}", line);
        }
    }

    /// Print a retrieved document with its origin
    pub fn document(&self, rank: usize, document: &Document) {
        let mut origin = document.metadata.source.clone();
        if let Some(section) = &document.metadata.section {
            origin.push_str(" § ");
            origin.push_str(section);
        }
        if let Some(chunk) = document.metadata.chunk_index {
            origin.push_str(&format!(" #{}", chunk));
        }

        if self.colored {
            println!(
                "\n  {} {}",
                format!("{}.", rank).bright_white().bold(),
                origin.dimmed()
            );
        } else {
            println!("\n  {}. {}", rank, origin);
        }
        for line in preview(&document.content).lines() {
            println!("      {}", line);
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

/// Truncate long text on a character boundary, marking the cut with `…`.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
