//! Reaction-line parsing.
//!
//! A reaction line is nothing but `(emoji, count)` pairs:
//!
//! ```text
//! :+1: 3 :tada: 1
//! 👍🏽 2 🎉 1
//! ![:partyparrot:](https://emoji.example.com/partyparrot.gif) 4
//! ```
//!
//! Emoji are matched by code point class (`Extended_Pictographic` plus
//! variation selectors, skin-tone modifiers and ZWJ sequences), never by
//! byte or UTF-16 unit.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::LineErrorKind;
use crate::message::Reaction;

/// One reaction emoji: `:code:`, custom-emoji markdown image, or a unicode
/// emoji cluster.
pub(crate) const REACTION_TOKEN: &str = concat!(
    r"(?::(?P<code>[\w+\-']+):",
    r"|!\[:?(?P<img>[\w+\-']+):?\]\([^)\s]*\)",
    r"|(?P<emoji>\p{Extended_Pictographic}(?:\x{FE0F}|[\x{1F3FB}-\x{1F3FF}]|\x{200D}\p{Extended_Pictographic})*))",
);

static REACTION_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{REACTION_TOKEN}\s*(?P<count>\d+)")).unwrap());

/// Parses every `(emoji, count)` pair on a reaction line, in order.
///
/// Duplicate names are kept as separate entries.
///
/// # Example
///
/// ```rust
/// use chatpaste::parsing::parse_reactions;
///
/// let reactions = parse_reactions(":+1: 3 :tada: 1").unwrap();
/// assert_eq!(reactions[0].name, "+1");
/// assert_eq!(reactions[1].count, 1);
/// ```
pub fn parse_reactions(line: &str) -> Result<Vec<Reaction>, LineErrorKind> {
    REACTION_PAIR_RE
        .captures_iter(line)
        .map(|caps| {
            let name = caps
                .name("code")
                .or_else(|| caps.name("img"))
                .or_else(|| caps.name("emoji"))
                .ok_or(LineErrorKind::MissingCapture("reaction name"))?
                .as_str();
            let raw_count = caps
                .name("count")
                .ok_or(LineErrorKind::MissingCapture("reaction count"))?
                .as_str();
            let count = raw_count
                .parse::<u32>()
                .map_err(|_| LineErrorKind::ReactionCount(raw_count.to_string()))?;
            Ok(Reaction::new(name, count))
        })
        .collect()
}
