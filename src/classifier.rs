//! Line classification.
//!
//! Every trimmed line of a pasted transcript maps to exactly one
//! [`LineTag`]. Classification walks an ordered rule table and returns the
//! first hit, falling back to [`LineTag::Content`].
//!
//! Order matters. Many metadata shapes are syntactic subsets of structural
//! ones: a custom-emoji reaction line looks a lot like a `Name [time](url)`
//! header, a whole-line linked time looks like a bare time, and an image
//! line could pass for an avatar. So all metadata rules come first, most
//! specific first, and the structural rules follow.
//!
//! ```rust
//! use chatpaste::classifier::{classify, LineTag};
//!
//! assert_eq!(classify("Jane Doe [10:42 AM](https://x.slack.com/archives/C1/p1)"), LineTag::UserTimestampHeader);
//! assert_eq!(classify(":+1: 3 :tada: 1"), LineTag::ReactionLine);
//! assert_eq!(classify("--- March 15, 2024 ---"), LineTag::DateSeparator);
//! assert_eq!(classify("Sounds good, ship it."), LineTag::Content);
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::parsing::reactions::REACTION_TOKEN;

/// The closed set of line shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineTag {
    // ---- metadata: skipped in place --------------------------------------
    /// Two or more markdown images on one line (reactor / participant faces)
    AvatarList,
    /// A markdown image hosted on a file-upload host
    FileImageOnly,
    /// Only `(emoji, count)` pairs
    ReactionLine,
    /// `---`, `***`, `___`
    HorizontalRule,
    /// `New messages` divider
    UnreadDivider,
    /// `3 replies`, `1 reply Last reply today at 10:00 AM`
    ReplyCount,
    /// `View thread`, `View conversation`
    ViewThreadLink,
    /// `replied to a thread: …`
    ThreadReplyHeader,
    /// `Also sent to the channel`, `From a thread in #general`
    ThreadContextMarker,
    /// `This message was deleted.`
    DeletedMessage,
    /// `(edited)`
    EditedMarker,
    /// `+3` overflow marker next to avatar stacks
    PlusOneMarker,
    /// Bold linked title, or service icon + site name, of a link preview
    LinkPreviewTitle,
    /// Quoted italic description line of a link preview
    LinkPreviewDescription,
    /// Whole-line markdown image with alt text
    ImageSourceMarker,
    /// Whole-line link to an uploaded file name
    FilePreviewStart,
    /// Bare file-type label closing a file preview (`PDF`, `Zip`, …)
    FilePreviewEnd,
    /// `[Download](…)`
    FileDownloadLink,
    /// `2 files`
    FileCount,
    /// Whole-line linked time, `[10:31 AM](…)`
    ContinuationTimestamp,
    /// `APP`, `BOT`, `Added by …`, `Sent using …`
    AppIntegrationInfo,
    /// `Pinned by …`
    PinnedMarker,

    // ---- structural ------------------------------------------------------
    /// Empty line
    Blank,
    /// `Name [time](url)`, optionally preceded by an inline avatar image
    UserTimestampHeader,
    /// `--- March 15, 2024 ---` or `Friday, March 15th, 2024`
    DateSeparator,
    /// `![](avatar-url)`
    AvatarOnly,
    /// `10:00 AM`
    TimeOnly,
    /// A short name-like line that may be the first half of a two-line header
    PotentialUsername,
    /// Anything else
    Content,
}

impl LineTag {
    /// Returns `true` for tags the parser skips without touching the current
    /// message's text.
    pub fn is_metadata(self) -> bool {
        match self {
            LineTag::AvatarList
            | LineTag::FileImageOnly
            | LineTag::ReactionLine
            | LineTag::HorizontalRule
            | LineTag::UnreadDivider
            | LineTag::ReplyCount
            | LineTag::ViewThreadLink
            | LineTag::ThreadReplyHeader
            | LineTag::ThreadContextMarker
            | LineTag::DeletedMessage
            | LineTag::EditedMarker
            | LineTag::PlusOneMarker
            | LineTag::LinkPreviewTitle
            | LineTag::LinkPreviewDescription
            | LineTag::ImageSourceMarker
            | LineTag::FilePreviewStart
            | LineTag::FilePreviewEnd
            | LineTag::FileDownloadLink
            | LineTag::FileCount
            | LineTag::ContinuationTimestamp
            | LineTag::AppIntegrationInfo
            | LineTag::PinnedMarker => true,
            LineTag::Blank
            | LineTag::UserTimestampHeader
            | LineTag::DateSeparator
            | LineTag::AvatarOnly
            | LineTag::TimeOnly
            | LineTag::PotentialUsername
            | LineTag::Content => false,
        }
    }

    /// Returns `true` for tags that drive message boundaries.
    pub fn is_structural(self) -> bool {
        !self.is_metadata()
    }
}

impl fmt::Display for LineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a rule recognises its line shape.
enum Matcher {
    Pattern(Regex),
    /// A pattern whose captures must also pass a check
    Guarded(Regex, fn(&Captures<'_>) -> bool),
    Predicate(fn(&str) -> bool),
}

/// One `(matcher, tag)` entry of the classification table.
pub struct Rule {
    tag: LineTag,
    matcher: Matcher,
}

impl Rule {
    fn pattern(tag: LineTag, pattern: &str) -> Self {
        Self {
            tag,
            matcher: Matcher::Pattern(Regex::new(pattern).unwrap()),
        }
    }

    fn guarded(tag: LineTag, pattern: &str, guard: fn(&Captures<'_>) -> bool) -> Self {
        Self {
            tag,
            matcher: Matcher::Guarded(Regex::new(pattern).unwrap(), guard),
        }
    }

    fn predicate(tag: LineTag, f: fn(&str) -> bool) -> Self {
        Self {
            tag,
            matcher: Matcher::Predicate(f),
        }
    }

    pub fn tag(&self) -> LineTag {
        self.tag
    }

    pub fn matches(&self, line: &str) -> bool {
        match &self.matcher {
            Matcher::Pattern(re) => re.is_match(line),
            Matcher::Guarded(re, guard) => re.captures(line).is_some_and(|caps| guard(&caps)),
            Matcher::Predicate(f) => f(line),
        }
    }

    fn captures<'a>(&self, line: &'a str) -> Option<Captures<'a>> {
        match &self.matcher {
            Matcher::Pattern(re) => re.captures(line),
            Matcher::Guarded(re, guard) => re.captures(line).filter(|caps| guard(caps)),
            Matcher::Predicate(_) => None,
        }
    }
}

const MAX_USERNAME_CHARS: usize = 50;

/// Name-like: up to four words, starting with a letter, no sentence
/// punctuation, optionally followed by one status emoji.
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\p{L}(?:[\p{L}\p{M}\p{N}_'’().\-]*[\p{L}\p{M}\p{N})])?",
        r"(?:[ \t]+[\p{L}\p{N}(](?:[\p{L}\p{M}\p{N}_'’().\-]*[\p{L}\p{M}\p{N})])?){0,3}",
        r"(?:[ \t]+(?::[\w+\-']+:|\p{Extended_Pictographic}\x{FE0F}?))?$",
    ))
    .unwrap()
});

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_potential_username(line: &str) -> bool {
    line.chars().count() <= MAX_USERNAME_CHARS && USERNAME_RE.is_match(line)
}

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,2}:\d{2}").unwrap());

static PERMALINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/archives/|/p\d+(?:[/?#]|$)").unwrap());

/// A linked time with no clock in it is only a header when the rest of the
/// line looks like one: a name-like prefix and a link that is either not a
/// web URL or points at a message permalink.
fn is_header_shaped(caps: &Captures<'_>) -> bool {
    if CLOCK_RE.is_match(&caps["time"]) {
        return true;
    }
    let url = &caps["url"];
    let message_link = !url.starts_with("http") || PERMALINK_RE.is_match(url);
    message_link && is_potential_username(caps["name"].trim())
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // ---- metadata, most specific first ----
        Rule::pattern(
            LineTag::AvatarList,
            r"^(?:!\[[^\]]*\]\(https?://[^\s)]+\)\s*){2,}$",
        ),
        Rule::pattern(
            LineTag::FileImageOnly,
            r"^!\[[^\]]*\]\(https?://(?:files\.[^\s)]+|[^\s)]*/files-(?:pri|tmb)/[^\s)]*)\)$",
        ),
        Rule::pattern(
            LineTag::ReactionLine,
            &format!(r"^(?:{REACTION_TOKEN}\s*\d+\s*)+$"),
        ),
        Rule::pattern(
            LineTag::HorizontalRule,
            r"^(?:-{3,}|\*{3,}|_{3,}|={3,}|—{2,})$",
        ),
        Rule::pattern(
            LineTag::UnreadDivider,
            r"(?i)^(?:-+\s*)?(?:new|unread) messages?(?:\s*-+)?$",
        ),
        Rule::pattern(
            LineTag::ReplyCount,
            r"(?i)^\[?\d+\s+repl(?:y|ies)\]?(?:\(https?://[^\s)]+\))?(?:\s+last reply\b.*)?$",
        ),
        Rule::pattern(
            LineTag::ViewThreadLink,
            r"(?i)^\[?(?:view (?:thread|conversation|message)|show thread)\]?(?:\(https?://[^\s)]+\))?$",
        ),
        Rule::pattern(LineTag::ThreadReplyHeader, r"(?i)^replied to a thread(?::.*)?$"),
        Rule::pattern(
            LineTag::ThreadContextMarker,
            r"(?i)^(?:also sent to the channel|also sent as (?:a )?direct message|(?:from a )?thread in #?[\w.\-]+|posted in #[\w.\-]+)$",
        ),
        Rule::pattern(
            LineTag::DeletedMessage,
            r"(?i)^\(?this message was deleted\.?\)?$",
        ),
        Rule::pattern(LineTag::EditedMarker, r"(?i)^\(edited\)$"),
        Rule::pattern(LineTag::PlusOneMarker, r"^\+\d+$"),
        Rule::pattern(
            LineTag::LinkPreviewTitle,
            r"^(?:\*\*\[[^\]]+\]\(https?://[^\s)]+\)\*\*|!\[[^\]]*\]\(https?://[^\s)]*(?:favicon|service_icon)[^\s)]*\)\s+\S.*)$",
        ),
        Rule::pattern(LineTag::LinkPreviewDescription, r"^>\s*_[^_].*_$"),
        Rule::pattern(
            LineTag::ImageSourceMarker,
            r"^!\[[^\]]+\]\(https?://[^\s)]+\)$",
        ),
        Rule::pattern(
            LineTag::FilePreviewStart,
            r"^\[[^\]]+\.[A-Za-z0-9]{1,5}\]\(https?://[^\s)]*files[^\s)]*\)$",
        ),
        Rule::pattern(
            LineTag::FilePreviewEnd,
            r"(?i)^(?:pdf|zip|text|binary|csv|word document|excel spreadsheet|powerpoint presentation|google (?:doc|docs|sheet|sheets|slides)|spreadsheet|presentation|canvas|snippet|audio|video|image|png|jpe?g|gif|markdown(?: \(raw\))?)$",
        ),
        Rule::pattern(
            LineTag::FileDownloadLink,
            r"(?i)^\[(?:download|view|open)(?: file| in [\w ]+)?\]\(https?://[^\s)]+\)$",
        ),
        Rule::pattern(LineTag::FileCount, r"(?i)^\d+\s+files?$"),
        Rule::pattern(
            LineTag::ContinuationTimestamp,
            r"(?i)^\[\d{1,2}:\d{2}(?::\d{2})?\s*(?:[ap]\.?m\.?)?\]\(https?://[^\s)]+\)$",
        ),
        Rule::pattern(
            LineTag::AppIntegrationInfo,
            r"^(?:APP|BOT|Added by \S.*|Sent using \S.*|Posted using \S.*)$",
        ),
        Rule::pattern(LineTag::PinnedMarker, r"^(?:📌\s*)?Pinned by \S.*$"),
        // ---- structural ----
        Rule::predicate(LineTag::Blank, is_blank),
        Rule::guarded(
            LineTag::UserTimestampHeader,
            concat!(
                r"^(?:!\[\]\((?P<avatar>https?://[^\s)]+)\)\s*)?",
                r"(?P<name>[^\[\]]+?)\s*",
                r"\[(?P<time>[^\[\]]*(?:\d{1,2}:\d{2}|\p{Extended_Pictographic})[^\[\]]*)\]",
                r"\((?P<url>[^\s)]*)\)$",
            ),
            is_header_shaped,
        ),
        Rule::pattern(
            LineTag::DateSeparator,
            concat!(
                r"^(?:-{2,}\s*(?P<bracketed>[^\-\s].*?)\s*-{2,}",
                r"|(?P<weekday>(?i:mon|tues|wednes|thurs|fri|satur|sun)day,\s+\p{L}+\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?))$",
            ),
        ),
        Rule::pattern(
            LineTag::AvatarOnly,
            r"^!\[\]\((?P<url>https?://[^\s)]+)\)$",
        ),
        Rule::pattern(
            LineTag::TimeOnly,
            r"(?i)^(?P<time>\d{1,2}:\d{2}(?::\d{2})?\s*(?:[ap]\.?m\.?)?)$",
        ),
        Rule::predicate(LineTag::PotentialUsername, is_potential_username),
    ]
});

/// Returns the classification table in evaluation order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Returns the tags in the order they are tried.
pub fn classification_order() -> Vec<LineTag> {
    RULES.iter().map(Rule::tag).collect()
}

/// Classifies one trimmed line. Total: every input yields a tag.
pub fn classify(line: &str) -> LineTag {
    RULES
        .iter()
        .find(|rule| rule.matches(line))
        .map_or(LineTag::Content, Rule::tag)
}

/// Runs the pattern behind `tag` against `line` and returns its captures.
///
/// Returns `None` if the tag is predicate-based or the line doesn't match.
pub(crate) fn captures(tag: LineTag, line: &str) -> Option<Captures<'_>> {
    RULES
        .iter()
        .find(|rule| rule.tag == tag)
        .and_then(|rule| rule.captures(line))
}
