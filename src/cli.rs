//! Command-line interface definition using clap.
//!
//! - [`Args`] - CLI argument structure
//! - [`Source`] - platform names accepted on the command line
//! - [`OutputFormat`] - how the [`ProcessResult`](crate::core::ProcessResult) is printed

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ContinuationPolicy, ProcessOptions, stop_words};
use crate::parser::Platform;

/// Parse a chat export from WhatsApp, Telegram or Instagram, drop system
/// notices and media placeholders, and print the messages with statistics
/// as JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatsift")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatsift whatsapp chat.txt
    chatsift wa chat.txt -o result.json --no-spaces
    chatsift tg result.json --top-words 20 --stop-word the --stop-word a
    cat chat.txt | chatsift ig - --format json")]
pub struct Args {
    /// Chat source type
    #[arg(value_enum)]
    pub source: Source,

    /// Path to the export file, or `-` for stdin
    pub input: PathBuf,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Do not count whitespace characters
    #[arg(long)]
    pub no_spaces: bool,

    /// Drop lines without a message header instead of appending them
    #[arg(long)]
    pub drop_continuations: bool,

    /// Drop blank lines before parsing
    #[arg(long)]
    pub drop_blank_lines: bool,

    /// Size of the word-frequency table
    #[arg(long, default_value_t = 50, value_name = "N")]
    pub top_words: usize,

    /// Word left out of the frequency table (repeatable)
    #[arg(long = "stop-word", value_name = "WORD")]
    pub stop_words: Vec<String>,

    /// Keep Instagram JSON text as exported, without repairing its encoding
    #[arg(long)]
    pub no_fix_encoding: bool,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds pipeline options from the flags.
    pub fn options(&self) -> ProcessOptions {
        let continuation = if self.drop_continuations {
            ContinuationPolicy::Drop
        } else {
            ContinuationPolicy::Append
        };

        let mut options = ProcessOptions::new()
            .with_include_spaces(!self.no_spaces)
            .with_keep_blank_lines(!self.drop_blank_lines)
            .with_continuation(continuation)
            .with_top_words(self.top_words)
            .with_fix_encoding(!self.no_fix_encoding);

        if !self.stop_words.is_empty() {
            options = options.with_stop_words(stop_words(&self.stop_words));
        }
        options
    }

    /// Returns `true` when the export is read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

/// Supported chat sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// WhatsApp TXT export
    #[value(alias = "wa")]
    #[serde(alias = "wa")]
    WhatsApp,

    /// Telegram JSON export or copied text
    #[value(alias = "tg")]
    #[serde(alias = "tg")]
    Telegram,

    /// Instagram JSON export or copied text
    #[value(alias = "ig")]
    #[serde(alias = "ig")]
    Instagram,
}

impl From<Source> for Platform {
    fn from(source: Source) -> Self {
        match source {
            Source::WhatsApp => Platform::WhatsApp,
            Source::Telegram => Platform::Telegram,
            Source::Instagram => Platform::Instagram,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Platform::from(*self))
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Indented JSON
    #[default]
    Pretty,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Pretty => write!(f, "pretty"),
        }
    }
}
