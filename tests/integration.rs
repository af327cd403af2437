//! Integration tests for the parse → deduplicate → write pipeline.

use chatpaste::config::DedupConfig;
use chatpaste::embedded::{EmbeddedAnalysis, EmbeddedContent, EmbeddedContentType};
use chatpaste::logging::RecordingLogger;
use chatpaste::prelude::*;
use chrono::NaiveDate;

const THREAD: &str = "\
--- March 15, 2024 ---
![](https://ca.slack-edge.com/T1-U1-a1b2-72)
Jane Smith  [10:30 AM](https://acme.slack.com/archives/C1/p1710498600)
Release notes for 2.4 are out, please skim them before the retro.

https://acme.example.com/releases/2.4
Acme Releases
Version 2.4 ships faster sync and offline mode
:+1: 3 :tada: 1
3 replies
Bob Lee  [10:32 AM](https://acme.slack.com/archives/C1/p1710498720)
Nice, the offline mode looks great, sharing with the support team.

https://acme.example.com/releases/2.4
Acme Releases
Version 2.4 ships faster sync and offline mode
Carol
10:40 AM

Does anyone know if the docs were updated too?
Thursday, March 21st, 2024
Jane Smith  [9:05 AM](https://acme.slack.com/archives/C1/p1711011900)
Release notes for 2.4 are out, please skim them before the retro.
";

const PREVIEW: &str = "https://acme.example.com/releases/2.4\nAcme Releases\nVersion 2.4 ships faster sync and offline mode";

/// Sentences with nothing in common, used to space messages apart.
const CHATTER: [&str; 9] = [
    "Lunch order goes in at noon, pizza again",
    "Who has the key for the storage room?",
    "My flight lands around seven tomorrow night",
    "Printer on floor three is jammed again",
    "Quarterly budget sheet needs two signatures",
    "Parking garage closes early this Friday evening",
    "Welcome aboard Priya, glad to have you",
    "Remember to rotate your VPN credentials monthly",
    "Coffee machine descaling happens on Wednesdays",
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn parse(text: &str) -> Vec<MessageRecord> {
    MessageParser::new(ParserConfig::new().with_reference_date(date(2024, 3, 1))).parse_str(text)
}

/// Treats everything after the first blank line as one embedded chunk whose
/// type depends on the username.
fn tagged_tail(msg: &MessageRecord) -> EmbeddedAnalysis {
    let kind = match msg.username.as_str() {
        "quote" => EmbeddedContentType::QuotedMessage,
        "preview" => EmbeddedContentType::LinkPreview,
        _ => return EmbeddedAnalysis::none(msg),
    };
    match msg.text.split_once("\n\n") {
        Some((_, tail)) => EmbeddedAnalysis::new(msg, vec![EmbeddedContent::new(kind, tail.lines())]),
        None => EmbeddedAnalysis::none(msg),
    }
}

/// `len` characters of prose cycled from `base`, ending in a period.
fn prose(base: &str, len: usize) -> String {
    let mut s: String = base.chars().cycle().take(len - 1).collect();
    s.push('.');
    s
}

// =========================================================================
// Parsing a realistic paste
// =========================================================================

#[test]
fn test_thread_parses_into_four_messages() {
    let messages = parse(THREAD);
    let users: Vec<&str> = messages.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(users, ["Jane Smith", "Bob Lee", "Carol", "Jane Smith"]);
}

#[test]
fn test_thread_first_message_fields() {
    let messages = parse(THREAD);
    let jane = &messages[0];

    assert_eq!(
        jane.text,
        format!("Release notes for 2.4 are out, please skim them before the retro.\n\n{PREVIEW}")
    );
    assert_eq!(jane.avatar.as_deref(), Some("https://ca.slack-edge.com/T1-U1-a1b2-72"));
    assert_eq!(jane.date, Some(date(2024, 3, 15)));
    assert_eq!(
        jane.timestamp.as_ref().and_then(Timestamp::as_datetime).map(|t| t.to_rfc3339()),
        Some("2024-03-15T10:30:00+00:00".to_string())
    );
    assert_eq!(jane.reactions, vec![Reaction::new("+1", 3), Reaction::new("tada", 1)]);
    assert!(jane.is_thread_start);
    assert_eq!(jane.thread_info.as_deref(), Some("3 replies"));
}

#[test]
fn test_thread_two_line_header_and_weekday_separator() {
    let messages = parse(THREAD);

    let carol = &messages[2];
    assert_eq!(carol.text, "Does anyone know if the docs were updated too?");
    assert_eq!(carol.date, Some(date(2024, 3, 15)));
    assert!(carol.avatar.is_none());

    let last = &messages[3];
    assert_eq!(last.date, Some(date(2024, 3, 21)));
    assert_eq!(
        last.timestamp.as_ref().unwrap().to_string(),
        "2024-03-21T09:05:00Z"
    );
}

#[test]
fn test_no_message_has_empty_text() {
    let inputs = [
        THREAD,
        "",
        "\n\n\n",
        "Alice\n10:00 AM",
        "Alice [10:00 AM](https://x.y/p1)\n\n\n",
        ":+1: 3\n(edited)\n3 replies",
        "--- March 15, 2024 ---\n--- March 16, 2024 ---",
    ];
    for input in inputs {
        for msg in parse(input) {
            assert!(!msg.text.trim().is_empty(), "empty message from {input:?}");
        }
    }
}

// =========================================================================
// Documented examples
// =========================================================================

#[test]
fn test_two_line_header_example() {
    let messages = parse("UserName\n10:00 AM\n\nHello");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].username, "UserName");
    assert_eq!(messages[0].text, "Hello");
    assert!(messages[0].timestamp.as_ref().unwrap().is_parsed());
}

#[test]
fn test_garbled_time_example() {
    let messages = parse("UserName [😄garbled](url)\nHi");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].timestamp.as_ref().unwrap().as_raw(), Some("😄garbled"));
}

#[test]
fn test_reaction_example() {
    let messages = parse("UserName [10:00 AM](url)\nGreat idea!\n:+1: 3 :tada: 1");
    assert_eq!(messages[0].text, "Great idea!");
    assert_eq!(
        messages[0].reactions,
        vec![Reaction::new("+1", 3), Reaction::new("tada", 1)]
    );
}

#[test]
fn test_date_separator_example() {
    let text = "Ann [9:00 AM](url)\nbefore, clearly.\n--- March 15, 2024 ---\nAnn [9:30 AM](url)\nafter, clearly.";
    let messages = MessageParser::default().parse_str(text);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].date, None);
    assert_eq!(messages[1].date, Some(date(2024, 3, 15)));
}

// =========================================================================
// Deduplication
// =========================================================================

#[test]
fn test_thread_dedup_strips_repeated_preview() {
    let result = deduplicate(parse(THREAD), false);

    assert_eq!(result.removed_duplicates, 1);
    assert_eq!(result.preserved_context, 1);
    assert_eq!(result.processed_blocks, 6);
    assert_eq!(result.messages.len(), 4);
    assert!(result.messages[0].text.ends_with(PREVIEW));
    assert_eq!(
        result.messages[1].text,
        "Nice, the offline mode looks great, sharing with the support team."
    );
}

#[test]
fn test_dedup_is_idempotent() {
    let first = deduplicate(parse(THREAD), false);
    let second = deduplicate(first.messages.clone(), false);
    assert_eq!(second.removed_duplicates, 0);
    assert_eq!(second.messages, first.messages);
}

#[test]
fn test_dedup_is_idempotent_when_drops_close_the_gap() {
    let repost = "Server maintenance starts at 22:00 UTC tonight";
    let note = "Deploy checklist lives in the pinned message of the release channel";
    let messages = vec![
        MessageRecord::new("ops").with_text(repost),
        MessageRecord::new("dev").with_text(note),
        MessageRecord::new("team").with_text(CHATTER[0]),
        MessageRecord::new("ops").with_text(repost),
        MessageRecord::new("team").with_text(CHATTER[1]),
        MessageRecord::new("qa").with_text(note.replace("the pinned", "the  pinned")),
    ];

    let first = deduplicate(messages, false);
    assert_eq!(first.removed_duplicates, 2);
    let users: Vec<&str> = first.messages.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(users, ["ops", "dev", "team", "team"]);

    let second = deduplicate(first.messages.clone(), false);
    assert_eq!(second.removed_duplicates, 0);
    assert_eq!(second.messages, first.messages);
}

#[test]
fn test_exact_repost_found_beyond_window() {
    let repost = "Server maintenance starts at 22:00 UTC tonight";
    let mut messages = vec![MessageRecord::new("ops").with_text(repost)];
    messages.extend(CHATTER.iter().map(|t| MessageRecord::new("team").with_text(*t)));
    messages.push(MessageRecord::new("ops").with_text(repost));
    assert_eq!(messages.len(), 11);

    let result = deduplicate(messages, false);
    assert_eq!(result.removed_duplicates, 1);
    assert_eq!(result.messages.len(), 10);
    assert_eq!(result.messages[0].text, repost);
}

#[test]
fn test_near_duplicate_previews_in_window_keep_earlier() {
    let first = "Earlier intro sentence about the deploy, written by hand.";
    let second = "A different comment on the rollout plan for next week.";
    let preview = "Release notes for version 2.4 are now available on the website";
    let reformatted = "Release notes for version 2.4 are now  available on the website";

    let messages = vec![
        MessageRecord::new("preview").with_text(format!("{first}\n\n{preview}")),
        MessageRecord::new("team").with_text(CHATTER[0]),
        MessageRecord::new("preview").with_text(format!("{second}\n\n{reformatted}")),
    ];

    let result = ContentDeduplicator::new(DedupConfig::default())
        .with_analyzer(tagged_tail)
        .process(messages);

    assert_eq!(result.removed_duplicates, 1);
    assert_eq!(result.messages.len(), 3);
    assert_eq!(result.messages[0].text, format!("{first}\n\n{preview}"));
    assert_eq!(result.messages[2].text, second);
}

#[test]
fn test_near_duplicate_prefers_discarding_lower_rank() {
    let intro = "Sharing the notes from the planning session earlier.";
    let reply = "Quoting this so nobody misses it before the cutoff:";
    let body = "Release notes for version 2.4 are now available on the website";

    let messages = vec![
        MessageRecord::new("preview").with_text(format!("{intro}\n\n{body}")),
        MessageRecord::new("team").with_text(CHATTER[1]),
        MessageRecord::new("quote").with_text(format!("{reply}\n\n{body}")),
    ];

    let result = ContentDeduplicator::new(DedupConfig::default())
        .with_analyzer(tagged_tail)
        .process(messages);

    assert_eq!(result.removed_duplicates, 1);
    // the earlier link preview loses to the later quote
    assert_eq!(result.messages[0].text, intro);
    assert_eq!(result.messages[2].text, format!("{reply}\n\n{body}"));
}

fn boundary_case(duplicated_chars: usize) -> Vec<MessageRecord> {
    let quoted = prose("the quarterly report draft is ready for review ", duplicated_chars);
    let own = prose("heads up everyone ", 100 - 2 - duplicated_chars);
    let messages = vec![
        MessageRecord::new("author").with_text(quoted.clone()),
        MessageRecord::new("preview").with_text(format!("{own}\n\n{quoted}")),
    ];
    assert_eq!(messages[1].text.chars().count(), 100);
    messages
}

#[test]
fn test_preservation_boundary_keeps_at_79_percent() {
    let result = ContentDeduplicator::new(DedupConfig::default())
        .with_analyzer(tagged_tail)
        .process(boundary_case(79));

    assert_eq!(result.removed_duplicates, 1);
    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[1].text.chars().count(), 19);
}

#[test]
fn test_preservation_boundary_drops_at_81_percent() {
    let result = ContentDeduplicator::new(DedupConfig::default())
        .with_analyzer(tagged_tail)
        .process(boundary_case(81));

    assert_eq!(result.removed_duplicates, 1);
    assert_eq!(result.messages.len(), 1);
    assert_eq!(result.messages[0].username, "author");
}

#[test]
fn test_context_overrides_preservation_ratio() {
    let mut messages = boundary_case(81);
    messages[1].reactions.push(Reaction::new("eyes", 2));

    let result = ContentDeduplicator::new(DedupConfig::default())
        .with_analyzer(tagged_tail)
        .process(messages);

    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[1].text.chars().count(), 17);
}

#[test]
fn test_tunable_window() {
    let text = "Release notes for version 2.4 are now available on the website";
    let variant = "Release notes for version 2.4 are now  available on the website";
    let mut messages = vec![MessageRecord::new("a").with_text(text)];
    messages.extend(CHATTER[..5].iter().map(|t| MessageRecord::new("b").with_text(*t)));
    messages.push(MessageRecord::new("c").with_text(variant));

    let narrow = deduplicate(messages.clone(), false);
    assert_eq!(narrow.removed_duplicates, 0);

    let wide = ContentDeduplicator::new(DedupConfig::new().with_window(6)).process(messages);
    assert_eq!(wide.removed_duplicates, 1);
}

#[test]
fn test_exact_only_mode_is_logged() {
    let logger = RecordingLogger::new();
    let dedup = ContentDeduplicator::new(DedupConfig::new().with_max_blocks(2)).with_logger(&logger);
    let messages: Vec<MessageRecord> = CHATTER
        .iter()
        .map(|t| MessageRecord::new("team").with_text(*t))
        .collect();

    let result = dedup.process(messages);
    assert_eq!(result.removed_duplicates, 0);
    assert!(logger.contains("exact matches only"));
}

// =========================================================================
// Output
// =========================================================================

#[test]
fn test_pipeline_to_jsonl() {
    let result = deduplicate(parse(THREAD), false);
    let config = OutputConfig::new().with_timestamps().with_reactions();
    let jsonl = to_format_string(&result.messages, OutputFormat::Jsonl, &config).unwrap();

    let lines: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["username"], "Jane Smith");
    assert_eq!(lines[0]["timestamp"], "2024-03-15T10:30:00Z");
    assert_eq!(lines[0]["reactions"][0]["name"], "+1");
    assert!(lines[2].get("reactions").is_none());
}

#[test]
fn test_pipeline_to_markdown_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thread.md");
    let path = path.to_str().unwrap();

    let result = deduplicate(parse(THREAD), false);
    let config = OutputConfig::new().with_dates();
    write_to_format(&result.messages, path, OutputFormat::from_path(path).unwrap(), &config).unwrap();

    let md = std::fs::read_to_string(path).unwrap();
    assert!(md.contains("## 2024-03-15"));
    assert!(md.contains("## 2024-03-21"));
    assert_eq!(md.matches("> [!note]+").count(), 4);
}
