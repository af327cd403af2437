//! Output format selection.
//!
//! Library-level format type, independent of the CLI.
//!
//! # Example
//!
//! ```rust
//! use chatpaste::format::OutputFormat;
//!
//! let format = OutputFormat::from_path("thread.md").unwrap();
//! assert_eq!(format, OutputFormat::Markdown);
//! assert_eq!("ndjson".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::models::OutputConfig;
use crate::error::{ChatpasteError, Result};
use crate::message::MessageRecord;

/// Output format for parsed threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Pretty-printed JSON array (default)
    #[default]
    Json,

    /// JSON Lines, one message per line. Also known as NDJSON.
    Jsonl,

    /// CSV with semicolon delimiter
    Csv,

    /// Markdown callouts
    #[serde(alias = "md")]
    Markdown,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "md",
        }
    }

    /// Returns all supported format names, aliases included.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "jsonl", "ndjson", "csv", "md", "markdown"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Json,
            OutputFormat::Jsonl,
            OutputFormat::Csv,
            OutputFormat::Markdown,
        ]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/x-ndjson",
            OutputFormat::Csv => "text/csv",
            OutputFormat::Markdown => "text/markdown",
        }
    }

    /// Detects format from a file path based on extension.
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
        ext.parse().map_err(|_| {
            ChatpasteError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: json, jsonl, csv, md"),
            )
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Markdown => write!(f, "Markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

fn missing_feature(format: OutputFormat) -> ChatpasteError {
    let feature = match format {
        OutputFormat::Csv => "csv-output",
        _ => "json-output",
    };
    ChatpasteError::invalid_format(
        "output",
        format!("Output format {format} requires the '{feature}' feature to be enabled"),
    )
}

/// Writes messages to a file in the specified format.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or the file cannot
/// be written.
#[allow(unused_variables)]
pub fn write_to_format(
    messages: &[MessageRecord],
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(messages, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(messages, path, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(messages, path, config),
        OutputFormat::Markdown => crate::core::output::write_markdown(messages, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Converts messages to a string in the specified format.
///
/// ```rust
/// # #[cfg(feature = "json-output")]
/// # fn main() -> chatpaste::Result<()> {
/// use chatpaste::core::OutputConfig;
/// use chatpaste::format::{OutputFormat, to_format_string};
/// use chatpaste::MessageRecord;
///
/// let messages = vec![MessageRecord::new("Alice").with_text("Hello!")];
/// let jsonl = to_format_string(&messages, OutputFormat::Jsonl, &OutputConfig::new())?;
/// assert_eq!(jsonl.lines().count(), 1);
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "json-output"))]
/// # fn main() {}
/// ```
#[allow(unused_variables)]
pub fn to_format_string(
    messages: &[MessageRecord],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(messages, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(messages, config),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(messages, config),
        OutputFormat::Markdown => Ok(crate::core::output::to_markdown(messages, config)),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}
