//! Output side of the pipeline.
//!
//! This module contains:
//! - [`models`] - [`OutputConfig`], which fields to emit
//! - [`output`] - Format writers (JSON, JSONL, CSV, Markdown)
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(feature = "json-output")]
//! # fn main() -> chatpaste::Result<()> {
//! use chatpaste::core::{OutputConfig, to_json};
//! use chatpaste::MessageRecord;
//!
//! let messages = vec![MessageRecord::new("Jane").with_text("Hi!")];
//! let json = to_json(&messages, &OutputConfig::new())?;
//! assert!(json.contains("Jane"));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "json-output"))]
//! # fn main() {}
//! ```

pub mod models;
pub mod output;

pub use models::OutputConfig;

pub use output::{to_markdown, write_markdown};
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
