//! Embedded-content analysis.
//!
//! Chat clients inline link previews, quoted messages and file cards into a
//! message's rendered text. The deduplicator needs to know which parts of a
//! message body are such chunks; an [`EmbeddedContentAnalyzer`] tells it.
//!
//! Two analyzers ship with the crate:
//!
//! | Analyzer | Finds |
//! |----------|-------|
//! | [`PlainTextAnalyzer`] | `>` quote runs, whole-line file links, bare-URL preview paragraphs |
//! | [`NoEmbeddedContent`] | nothing; every message is a single block |
//!
//! Any `Fn(&MessageRecord) -> EmbeddedAnalysis` closure is an analyzer too.
//!
//! ```rust
//! use chatpaste::embedded::{EmbeddedContentAnalyzer, EmbeddedContentType, PlainTextAnalyzer};
//! use chatpaste::MessageRecord;
//!
//! let msg = MessageRecord::new("Jane").with_text("> the build is green again\nnice");
//! let analysis = PlainTextAnalyzer.analyze(&msg);
//!
//! assert!(analysis.has_embedded);
//! assert_eq!(analysis.embedded_content[0].kind, EmbeddedContentType::QuotedMessage);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::message::MessageRecord;

/// Kinds of embedded chunks, ranked by how much conversational meaning they
/// carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmbeddedContentType {
    QuotedMessage,
    FileAttachment,
    LinkPreview,
    Metadata,
    Reactions,
    Continuation,
}

impl EmbeddedContentType {
    /// Higher ranks are kept over lower ones when two chunks duplicate each
    /// other.
    pub fn rank(self) -> u8 {
        match self {
            EmbeddedContentType::QuotedMessage => 4,
            EmbeddedContentType::FileAttachment => 3,
            EmbeddedContentType::LinkPreview => 2,
            EmbeddedContentType::Metadata => 1,
            EmbeddedContentType::Reactions | EmbeddedContentType::Continuation => 0,
        }
    }
}

/// One embedded chunk, as the lines it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedContent {
    pub kind: EmbeddedContentType,
    pub content: Vec<String>,
}

impl EmbeddedContent {
    pub fn new<I, S>(kind: EmbeddedContentType, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            content: content.into_iter().map(Into::into).collect(),
        }
    }

    /// The chunk's lines joined with newlines.
    pub fn joined(&self) -> String {
        self.content.join("\n")
    }
}

/// The result of analyzing one message.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedAnalysis {
    pub message: MessageRecord,
    pub has_embedded: bool,
    /// The body with embedded chunks already stripped, for analyzers that
    /// know how to do that themselves.
    pub cleaned_text: Option<String>,
    pub embedded_content: Vec<EmbeddedContent>,
}

impl EmbeddedAnalysis {
    /// An analysis with no embedded chunks.
    pub fn none(message: &MessageRecord) -> Self {
        Self {
            message: message.clone(),
            has_embedded: false,
            cleaned_text: None,
            embedded_content: Vec::new(),
        }
    }

    /// An analysis with the given chunks.
    pub fn new(message: &MessageRecord, embedded_content: Vec<EmbeddedContent>) -> Self {
        Self {
            message: message.clone(),
            has_embedded: !embedded_content.is_empty(),
            cleaned_text: None,
            embedded_content,
        }
    }

    #[must_use]
    pub fn with_cleaned_text(mut self, text: impl Into<String>) -> Self {
        self.cleaned_text = Some(text.into());
        self
    }
}

/// Finds embedded chunks in one message.
pub trait EmbeddedContentAnalyzer {
    fn analyze(&self, message: &MessageRecord) -> EmbeddedAnalysis;
}

impl<F> EmbeddedContentAnalyzer for F
where
    F: Fn(&MessageRecord) -> EmbeddedAnalysis,
{
    fn analyze(&self, message: &MessageRecord) -> EmbeddedAnalysis {
        self(message)
    }
}

/// Reports no embedded content for any message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbeddedContent;

impl EmbeddedContentAnalyzer for NoEmbeddedContent {
    fn analyze(&self, message: &MessageRecord) -> EmbeddedAnalysis {
        EmbeddedAnalysis::none(message)
    }
}

static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s?(.*)$").unwrap());

static FILE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[[^\]]+\.[A-Za-z0-9]{1,5}\]\(https?://[^\s)]+\)|https?://\S+/[^\s/]+\.(?:pdf|zip|docx?|xlsx?|pptx?|csv|txt|png|jpe?g|gif|mp4|mov))$")
        .unwrap()
});

static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<?https?://\S+>?$").unwrap());

/// Heuristic analyzer for plain pasted text.
///
/// Never supplies `cleaned_text`; the deduplicator strips chunks itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextAnalyzer;

impl EmbeddedContentAnalyzer for PlainTextAnalyzer {
    fn analyze(&self, message: &MessageRecord) -> EmbeddedAnalysis {
        let lines: Vec<&str> = message.text.lines().map(str::trim).collect();
        let mut chunks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if QUOTE_RE.is_match(line) {
                let start = i;
                while i < lines.len() && QUOTE_RE.is_match(lines[i]) {
                    i += 1;
                }
                let quoted = lines[start..i]
                    .iter()
                    .filter_map(|l| QUOTE_RE.captures(l))
                    .map(|caps| caps[1].trim().to_string());
                chunks.push(EmbeddedContent::new(EmbeddedContentType::QuotedMessage, quoted));
                continue;
            }

            if FILE_LINK_RE.is_match(line) {
                chunks.push(EmbeddedContent::new(EmbeddedContentType::FileAttachment, [line]));
                i += 1;
                continue;
            }

            // a preview is a bare URL followed by at least one more line of
            // the same paragraph
            let paragraph_start = i == 0 || lines[i - 1].is_empty();
            if paragraph_start && BARE_URL_RE.is_match(line) {
                let start = i;
                while i < lines.len() && !lines[i].is_empty() && !QUOTE_RE.is_match(lines[i]) {
                    i += 1;
                }
                if i - start >= 2 {
                    chunks.push(EmbeddedContent::new(
                        EmbeddedContentType::LinkPreview,
                        lines[start..i].iter().copied(),
                    ));
                }
                continue;
            }

            i += 1;
        }

        EmbeddedAnalysis::new(message, chunks)
    }
}
