//! Username cleanup.
//!
//! Copying a thread out of a chat client often yields names like
//! `Jane DoeJane Doe` (visible name + hidden accessible label) or
//! `Jane Doe :palm_tree: APP` (status emoji and badges).

use std::sync::LazyLock;

use regex::Regex;

/// Trailing status decorations: `:code:` emoji, unicode emoji, and app badges.
static TRAILING_DECORATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\s*(?::[\w+\-']+:|\p{Extended_Pictographic}(?:\x{FE0F}|[\x{1F3FB}-\x{1F3FF}]|\x{200D}\p{Extended_Pictographic})*)|\s+(?:APP|BOT))+$",
    )
    .unwrap()
});

/// Collapses a name that was pasted twice in a row.
///
/// Handles both the glued form (`AliceAlice`) and the spaced form
/// (`Alice Smith Alice Smith`). Anything else is returned trimmed.
///
/// # Example
///
/// ```rust
/// use chatpaste::parsing::cleanup_doubled_usernames;
///
/// assert_eq!(cleanup_doubled_usernames("Jane DoeJane Doe"), "Jane Doe");
/// assert_eq!(cleanup_doubled_usernames("Jane Doe Jane Doe"), "Jane Doe");
/// assert_eq!(cleanup_doubled_usernames("Jane Doe"), "Jane Doe");
/// ```
pub fn cleanup_doubled_usernames(name: &str) -> String {
    let name = name.trim();

    let chars: Vec<char> = name.chars().collect();
    if chars.len() >= 2 && chars.len() % 2 == 0 {
        let (first, second) = chars.split_at(chars.len() / 2);
        if first == second {
            return first.iter().collect::<String>().trim().to_string();
        }
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() >= 2 && words.len() % 2 == 0 {
        let (first, second) = words.split_at(words.len() / 2);
        if first == second {
            return first.join(" ");
        }
    }

    name.to_string()
}

/// Produces a display name from a raw header capture.
///
/// Strips markdown emphasis, trailing status emoji and `APP`/`BOT` badges,
/// then collapses doubled names. Falls back to `fallback` if nothing is left.
pub fn clean_username(raw: &str, fallback: &str) -> String {
    let stripped = raw.trim().trim_matches('*').trim();
    let stripped = TRAILING_DECORATION_RE.replace(stripped, "");
    let cleaned = cleanup_doubled_usernames(&stripped);

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
