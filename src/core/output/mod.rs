//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_json`] / [`to_json`] - JSON array of messages - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one message per line - requires `json-output` feature
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_markdown`] / [`to_markdown`] - Markdown callouts, one per message
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | JSON | Structured data, APIs |
//! | JSONL | Pipelines that read one record at a time |
//! | CSV | Spreadsheets, compact LLM context |
//! | Markdown | Pasting the cleaned thread into notes |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatpaste::Result<()> {
//! use chatpaste::core::output::{write_csv, write_json, write_markdown};
//! use chatpaste::core::models::OutputConfig;
//! use chatpaste::MessageRecord;
//!
//! let messages = vec![
//!     MessageRecord::new("Alice").with_text("Hello!"),
//!     MessageRecord::new("Bob").with_text("Hi there!"),
//! ];
//!
//! let config = OutputConfig::new().with_timestamps();
//!
//! write_json(&messages, "thread.json", &config)?;
//! write_csv(&messages, "thread.csv", &config)?;
//! write_markdown(&messages, "thread.md", &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;
mod markdown_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
pub use markdown_writer::{to_markdown, write_markdown};

#[cfg(feature = "json-output")]
use chrono::NaiveDate;
#[cfg(feature = "json-output")]
use serde::Serialize;

#[cfg(feature = "json-output")]
use crate::core::models::OutputConfig;
#[cfg(feature = "json-output")]
use crate::message::{MessageRecord, Reaction};

/// The subset of a [`MessageRecord`] the JSON writers emit.
#[cfg(feature = "json-output")]
#[derive(Serialize)]
struct ExportMessage<'a> {
    username: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reactions: Option<&'a [Reaction]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_thread_start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_thread_reply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_info: Option<&'a str>,
}

#[cfg(feature = "json-output")]
impl<'a> ExportMessage<'a> {
    fn from_record(msg: &'a MessageRecord, config: &OutputConfig) -> Self {
        let threads = config.include_thread_flags;
        Self {
            username: &msg.username,
            text: &msg.text,
            timestamp: if config.include_timestamps {
                msg.timestamp.as_ref().map(ToString::to_string)
            } else {
                None
            },
            date: if config.include_dates { msg.date } else { None },
            avatar: if config.include_avatars {
                msg.avatar.as_deref()
            } else {
                None
            },
            reactions: if config.include_reactions && !msg.reactions.is_empty() {
                Some(&msg.reactions)
            } else {
                None
            },
            is_thread_start: (threads && msg.is_thread_start).then_some(true),
            is_thread_reply: (threads && msg.is_thread_reply).then_some(true),
            thread_info: if threads {
                msg.thread_info.as_deref()
            } else {
                None
            },
        }
    }
}
