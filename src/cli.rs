//! Command-line interface definition using clap.
//!
//! [`Args`] also knows how to turn itself into the library's configuration
//! types, so `main` stays a thin driver.
//!
//! ```rust
//! use chatpaste::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatpaste", "thread.txt", "-o", "thread.md", "--reactions"]);
//! assert!(args.output_config().include_reactions);
//! assert_eq!(args.output_format().unwrap().extension(), "md");
//! ```

use chrono::NaiveDate;
use clap::Parser;

use crate::config::{DedupConfig, ParserConfig};
use crate::core::models::OutputConfig;
use crate::error::{ChatpasteError, Result};
use crate::format::OutputFormat;
use crate::message::UNKNOWN_USER;

/// Turn a copy-pasted chat thread into structured messages, stripping
/// duplicated link previews and quotes.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatpaste")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatpaste thread.txt
    pbpaste | chatpaste - -o thread.md
    chatpaste thread.txt -o thread.csv -t --reactions
    chatpaste thread.txt --format jsonl --no-dedup
    chatpaste thread.txt --reference-date 2024-03-15 --debug")]
pub struct Args {
    /// Path to the pasted transcript, or `-` for stdin
    pub input: String,

    /// Path to output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format: json, jsonl, csv, md (default: from output extension, else json)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Skip duplicate content removal
    #[arg(long)]
    pub no_dedup: bool,

    /// Verbose logging to stderr
    #[arg(long)]
    pub debug: bool,

    /// Day for bare times before any date separator (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    pub reference_date: Option<String>,

    /// Username for messages without a header
    #[arg(long, value_name = "NAME", default_value = UNKNOWN_USER)]
    pub default_user: String,

    /// Similarity at or above which two blocks are duplicates
    #[arg(long, value_name = "RATIO", default_value_t = 0.95)]
    pub threshold: f64,

    /// Message distance for near-duplicate comparison
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub window: usize,

    /// Include timestamps in output
    #[arg(short = 't', long)]
    pub timestamps: bool,

    /// Include inherited dates in output
    #[arg(long)]
    pub dates: bool,

    /// Include avatar URLs in output
    #[arg(long)]
    pub avatars: bool,

    /// Include reactions in output
    #[arg(short = 'r', long)]
    pub reactions: bool,

    /// Include thread flags in output
    #[arg(long)]
    pub threads: bool,
}

impl Args {
    /// Reads stdin instead of a file.
    pub fn reads_stdin(&self) -> bool {
        self.input == "-"
    }

    /// Explicit `--format`, else the output extension, else JSON.
    pub fn output_format(&self) -> Result<OutputFormat> {
        match (&self.format, &self.output) {
            (Some(format), _) => Ok(*format),
            (None, Some(path)) => OutputFormat::from_path(path),
            (None, None) => Ok(OutputFormat::default()),
        }
    }

    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            include_timestamps: self.timestamps,
            include_dates: self.dates,
            include_avatars: self.avatars,
            include_reactions: self.reactions,
            include_thread_flags: self.threads,
        }
    }

    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut config = ParserConfig::new()
            .with_default_username(self.default_user.clone())
            .with_debug(self.debug);
        if let Some(raw) = &self.reference_date {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ChatpasteError::invalid_date(raw.clone()))?;
            config = config.with_reference_date(date);
        }
        Ok(config)
    }

    pub fn dedup_config(&self) -> Result<DedupConfig> {
        let config = DedupConfig::new()
            .with_similarity_threshold(self.threshold)
            .with_window(self.window)
            .with_debug(self.debug);
        config.validate()?;
        Ok(config)
    }
}
