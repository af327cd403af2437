//! Structured message records produced by the transcript parser.
//!
//! A [`MessageRecord`] is built incrementally while the parser walks the
//! pasted text and is treated as immutable once it has been finalized.
//!
//! # Examples
//!
//! ```
//! use chatpaste::{MessageRecord, Reaction};
//!
//! let msg = MessageRecord::new("Alice")
//!     .with_text("Shipped it!")
//!     .with_reaction(Reaction::new("tada", 3));
//!
//! assert_eq!(msg.username(), "Alice");
//! assert_eq!(msg.reactions()[0].count, 3);
//! ```
//!
//! ## Serialization
//!
//! ```
//! use chatpaste::MessageRecord;
//!
//! let msg = MessageRecord::new("Alice").with_text("Hello!");
//! let json = serde_json::to_string(&msg)?;
//!
//! // unset fields are omitted
//! assert!(!json.contains("timestamp"));
//! assert!(!json.contains("reactions"));
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder username for messages whose author could not be determined.
pub const UNKNOWN_USER: &str = "Unknown User";

/// A message timestamp.
///
/// Header times that parse cleanly become [`Timestamp::Parsed`]. Times that
/// don't (stray emoji, unusual locales) are kept verbatim as
/// [`Timestamp::Raw`] so the information is never silently dropped.
///
/// Serializes as a plain string in both cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// A resolved UTC instant.
    Parsed(DateTime<Utc>),
    /// The raw captured text.
    Raw(String),
}

impl Timestamp {
    /// Returns the instant if this timestamp was parsed.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Parsed(dt) => Some(*dt),
            Timestamp::Raw(_) => None,
        }
    }

    /// Returns the raw text if this timestamp could not be parsed.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Timestamp::Parsed(_) => None,
            Timestamp::Raw(raw) => Some(raw),
        }
    }

    /// Returns `true` for a parsed instant.
    pub fn is_parsed(&self) -> bool {
        matches!(self, Timestamp::Parsed(_))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Parsed(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Timestamp::Raw(raw) => f.write_str(raw),
        }
    }
}

/// A single reaction summary, e.g. `:tada: 3`.
///
/// Reactions keep insertion order and are not merged by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Emoji short code without colons (`tada`) or the emoji itself (`🎉`).
    pub name: String,
    /// How many people reacted.
    pub count: u32,
}

impl Reaction {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// One message recovered from a pasted transcript.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `username` | `String` | Cleaned display name (or [`UNKNOWN_USER`]) |
/// | `avatar` | `Option<String>` | Avatar URL seen right before the header |
/// | `timestamp` | `Option<Timestamp>` | Parsed instant or raw header time |
/// | `date` | `Option<NaiveDate>` | Day context inherited from separators or dated headers |
/// | `text` | `String` | Message body, newline-joined |
/// | `reactions` | `Vec<Reaction>` | Reaction summaries in order of appearance |
/// | `is_thread_start` | `bool` | The message has replies |
/// | `is_thread_reply` | `bool` | The message was posted in a thread |
/// | `thread_info` | `Option<String>` | Raw reply-count text |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<Timestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub text: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub is_thread_start: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub is_thread_reply: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub thread_info: Option<String>,
}

impl MessageRecord {
    /// Creates an empty record for `username`.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar: None,
            timestamp: None,
            date: None,
            text: String::new(),
            reactions: Vec::new(),
            is_thread_start: false,
            is_thread_reply: false,
            thread_info: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, ts: Timestamp) -> Self {
        self.timestamp = Some(ts);
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    #[must_use]
    pub fn with_thread_reply(mut self) -> Self {
        self.is_thread_reply = true;
        self
    }

    #[must_use]
    pub fn with_thread_start(mut self, info: impl Into<String>) -> Self {
        self.is_thread_start = true;
        self.thread_info = Some(info.into());
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns `true` if the body is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns `true` if either thread flag is set.
    pub fn has_thread_flags(&self) -> bool {
        self.is_thread_start || self.is_thread_reply
    }

    /// Returns `true` if the message carries context worth keeping even when
    /// its body turns out to be duplicated elsewhere.
    pub fn has_context(&self) -> bool {
        !self.reactions.is_empty() || self.has_thread_flags() || self.timestamp.is_some()
    }

    /// Appends one line to the body.
    ///
    /// Leading blank lines are swallowed; blank lines after the first line of
    /// text are kept so paragraph breaks survive.
    pub(crate) fn push_line(&mut self, line: &str) {
        if self.text.is_empty() {
            if !line.is_empty() {
                self.text.push_str(line);
            }
        } else {
            self.text.push('\n');
            self.text.push_str(line);
        }
    }
}

impl Default for MessageRecord {
    fn default() -> Self {
        Self::new(UNKNOWN_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_new() {
        let msg = MessageRecord::new("Alice");
        assert_eq!(msg.username(), "Alice");
        assert!(msg.is_empty());
        assert!(msg.timestamp().is_none());
        assert!(!msg.has_context());
    }

    #[test]
    fn test_default_uses_sentinel() {
        assert_eq!(MessageRecord::default().username, UNKNOWN_USER);
    }

    #[test]
    fn test_push_line_keeps_inner_blank_lines() {
        let mut msg = MessageRecord::new("Alice");
        msg.push_line("");
        msg.push_line("first");
        msg.push_line("");
        msg.push_line("second");
        assert_eq!(msg.text, "first\n\nsecond");
    }

    #[test]
    fn test_has_context() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        assert!(MessageRecord::new("a").with_timestamp(Timestamp::Parsed(ts)).has_context());
        assert!(MessageRecord::new("a").with_reaction(Reaction::new("+1", 1)).has_context());
        assert!(MessageRecord::new("a").with_thread_reply().has_context());
        assert!(MessageRecord::new("a").with_thread_start("2 replies").has_context());
    }

    #[test]
    fn test_timestamp_display() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(Timestamp::Parsed(ts).to_string(), "2024-03-15T10:00:00Z");
        assert_eq!(Timestamp::Raw("😄garbled".into()).to_string(), "😄garbled");
    }

    #[test]
    fn test_timestamp_serde_untagged() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let parsed = serde_json::to_string(&Timestamp::Parsed(ts)).unwrap();
        assert_eq!(parsed, r#""2024-03-15T10:00:00Z""#);

        let back: Timestamp = serde_json::from_str(&parsed).unwrap();
        assert!(back.is_parsed());

        let raw: Timestamp = serde_json::from_str(r#""sometime""#).unwrap();
        assert_eq!(raw.as_raw(), Some("sometime"));
    }

    #[test]
    fn test_record_serialization_skips_unset() {
        let msg = MessageRecord::new("Alice").with_text("Hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""username":"Alice""#));
        assert!(!json.contains("avatar"));
        assert!(!json.contains("is_thread_reply"));

        let flagged = serde_json::to_string(&msg.with_thread_reply()).unwrap();
        assert!(flagged.contains(r#""is_thread_reply":true"#));
    }

    #[test]
    fn test_record_deserialization() {
        let json = r#"{"username":"Bob","text":"Hi","reactions":[{"name":"tada","count":2}]}"#;
        let msg: MessageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(msg.username(), "Bob");
        assert_eq!(msg.reactions(), &[Reaction::new("tada", 2)]);
        assert!(!msg.is_thread_start);
    }
}
