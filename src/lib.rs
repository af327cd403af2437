//! # Chatpaste
//!
//! Turns chat threads copy-pasted out of Slack-like clients into structured
//! messages, then strips the duplicated content such pastes are full of:
//! repeated link previews, quoted messages, reposts.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatpaste::prelude::*;
//!
//! let pasted = "\
//! Jane Smith  [10:30 AM](https://acme.slack.com/archives/C1/p1)
//! Standup moved to 11, see the calendar invite for the new room
//! :+1: 3
//! Bob [10:35 AM](https://acme.slack.com/archives/C1/p2)
//! > Standup moved to 11, see the calendar invite for the new room
//! thanks, will be there";
//!
//! let messages = parse_messages(pasted, false);
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[0].username, "Jane Smith");
//! assert_eq!(messages[0].reactions, vec![Reaction::new("+1", 3)]);
//!
//! // the quote repeats Jane's message and is stripped
//! let result = deduplicate(messages, false);
//! assert_eq!(result.removed_duplicates, 1);
//! assert_eq!(result.messages[1].text, "thanks, will be there");
//! ```
//!
//! ## Module Structure
//!
//! - [`classifier`] - line classification rules in evaluation order
//! - [`parser`] - [`MessageParser`], the line-by-line state machine
//! - [`parsing`] - time, date, reaction and username helpers
//! - [`embedded`] - detection of quotes, attachments and link previews
//! - [`dedup`] - [`ContentDeduplicator`] and the similarity metrics
//! - [`core`] - [`OutputConfig`](core::OutputConfig) and the output writers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) selection
//! - [`config`] - parser and deduplicator configuration
//! - [`logging`] - the injected [`Logger`](logging::Logger) capability
//! - [`error`] - [`ChatpasteError`] and [`Result`]
//! - [`prelude`] - convenient re-exports

pub mod classifier;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod dedup;
pub mod embedded;
pub mod error;
pub mod format;
pub mod logging;
pub mod message;
pub mod parser;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use dedup::{ContentDeduplicator, DedupResult, deduplicate};
pub use error::{ChatpasteError, Result};
pub use message::{MessageRecord, Reaction, Timestamp, UNKNOWN_USER};
pub use parser::{MessageParser, parse_messages};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatpaste::prelude::*;
/// ```
pub mod prelude {
    pub use crate::message::{MessageRecord, Reaction, Timestamp, UNKNOWN_USER};

    pub use crate::error::{ChatpasteError, Result};

    pub use crate::config::{DedupConfig, ParserConfig, SimilarityWeights};

    pub use crate::parser::{MessageParser, parse_messages};

    pub use crate::dedup::{ContentDeduplicator, DedupResult, deduplicate};

    pub use crate::embedded::{EmbeddedContentAnalyzer, PlainTextAnalyzer};

    pub use crate::logging::{Logger, NullLogger, TracingLogger};

    pub use crate::core::models::OutputConfig;
    pub use crate::core::output::{to_markdown, write_markdown};

    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}
