//! Near-duplicate content removal.
//!
//! Pasting a thread out of a chat client repeats things: the same link
//! preview under every message that shares the link, quoted messages next to
//! their originals, reposts. This module finds those repeats and strips them
//! while keeping the conversation intact.
//!
//! # Pipeline
//!
//! 1. Each message is run through an
//!    [`EmbeddedContentAnalyzer`](crate::embedded::EmbeddedContentAnalyzer).
//! 2. Messages and their embedded chunks are flattened into
//!    [`ContentBlock`]s; short blocks are ignored.
//! 3. Block pairs within a small message window are scored with
//!    [`composite_similarity`]. Exact matches are compared at any distance.
//! 4. The losing block of each duplicate pair is removed from its message,
//!    or the whole message is dropped when little else would remain.
//!
//! # Example
//!
//! ```rust
//! use chatpaste::{deduplicate, parse_messages};
//!
//! let text = "\
//! Jane [10:00 AM](https://x.y/p1)
//! Reminder: the office is closed on Monday
//! Bob [10:05 AM](https://x.y/p2)
//! Reminder: the office is closed on Monday";
//!
//! let result = deduplicate(parse_messages(text, false), false);
//! assert_eq!(result.removed_duplicates, 1);
//! ```

mod blocks;
mod processor;
mod similarity;

pub use blocks::{ContentBlock, flatten_blocks};
pub use processor::{ContentDeduplicator, DedupResult, deduplicate};
pub use similarity::{character_similarity, composite_similarity, edit_similarity, word_similarity};
