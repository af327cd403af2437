//! Property-based tests for chatpaste.
//!
//! These tests generate random pastes to find edge cases.

use proptest::prelude::*;

use chatpaste::classifier::classify;
use chatpaste::config::SimilarityWeights;
use chatpaste::dedup::{character_similarity, composite_similarity, edit_similarity, word_similarity};
use chatpaste::{MessageRecord, deduplicate, parse_messages};

/// Lines in the shapes a real paste is made of (no regex strategies, they are slow)
fn arb_line() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        String::new(),
        "   ".to_string(),
        "Jane Smith  [10:30 AM](https://acme.slack.com/archives/C1/p1)".to_string(),
        "Bob [😄garbled](url)".to_string(),
        "![](https://ca.slack-edge.com/T1-U1-a1-72)".to_string(),
        "Carol".to_string(),
        "10:40 AM".to_string(),
        "--- March 15, 2024 ---".to_string(),
        "--- someday ---".to_string(),
        "Friday, March 1st".to_string(),
        ":+1: 3 :tada: 1".to_string(),
        "👍🏽 99999999999".to_string(),
        "3 replies".to_string(),
        "replied to a thread: kickoff".to_string(),
        "(edited)".to_string(),
        "> quoted words from earlier".to_string(),
        "https://example.com/post".to_string(),
        "Release notes for 2.4 are out, please skim them.".to_string(),
        "Release notes for 2.4 are out, please skim them".to_string(),
        "Привет всем, как дела?".to_string(),
        "🎉🎉🎉".to_string(),
        "[".to_string(),
        "]()".to_string(),
    ])
}

fn arb_paste(max_lines: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(arb_line(), 0..max_lines).prop_map(|lines| lines.join("\n"))
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        String::new(),
        "hello".to_string(),
        "Hello World".to_string(),
        "  padded text  ".to_string(),
        "Ünïcödé and 日本語".to_string(),
        "emoji 🎉🔥 here".to_string(),
        "multi\nline\ntext".to_string(),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================
    // PARSER PROPERTIES
    // ============================================

    /// Parsing never panics and never yields blank messages
    #[test]
    fn parse_yields_no_blank_messages(paste in arb_paste(40)) {
        for msg in parse_messages(&paste, false) {
            prop_assert!(!msg.text.trim().is_empty());
            prop_assert!(!msg.username.is_empty());
        }
    }

    /// Arbitrary unicode input is survivable
    #[test]
    fn parse_survives_any_string(text in any::<String>()) {
        let _ = parse_messages(&text, false);
    }

    /// Classification is total and deterministic
    #[test]
    fn classify_is_deterministic(line in any::<String>()) {
        prop_assert_eq!(classify(line.trim()), classify(line.trim()));
    }

    // ============================================
    // DEDUP PROPERTIES
    // ============================================

    /// Dedup never adds messages and counts stay consistent
    #[test]
    fn dedup_never_grows(paste in arb_paste(40)) {
        let messages = parse_messages(&paste, false);
        let before = messages.len();
        let result = deduplicate(messages, false);
        prop_assert!(result.messages.len() <= before);
        prop_assert!(result.removed_duplicates <= result.processed_blocks);
        prop_assert!(result.preserved_context <= result.messages.len());
    }

    /// Relative order of surviving messages is preserved
    #[test]
    fn dedup_preserves_order(texts in prop::collection::vec(arb_text(), 0..15)) {
        let messages: Vec<MessageRecord> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| MessageRecord::new(format!("user{i:02}")).with_text(t.clone()))
            .collect();
        let result = deduplicate(messages, false);
        let names: Vec<&str> = result.messages.iter().map(|m| m.username.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        prop_assert_eq!(names, sorted);
    }

    // ============================================
    // SIMILARITY PROPERTIES
    // ============================================

    /// All metrics stay within [0, 1]
    #[test]
    fn similarity_bounded(a in arb_text(), b in arb_text()) {
        let w = SimilarityWeights::default();
        for score in [
            character_similarity(&a, &b),
            word_similarity(&a, &b),
            edit_similarity(&a, &b),
            composite_similarity(&a, &b, w),
        ] {
            prop_assert!((0.0..=1.0 + 1e-9).contains(&score), "score {}", score);
        }
    }

    /// All metrics are symmetric
    #[test]
    fn similarity_symmetric(a in arb_text(), b in arb_text()) {
        let w = SimilarityWeights::default();
        prop_assert!((composite_similarity(&a, &b, w) - composite_similarity(&b, &a, w)).abs() < 1e-9);
    }

    /// A string is fully similar to itself
    #[test]
    fn similarity_reflexive(a in any::<String>()) {
        let w = SimilarityWeights::default();
        prop_assert!((composite_similarity(&a, &a, w) - 1.0).abs() < 1e-9);
    }
}
