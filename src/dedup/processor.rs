//! Duplicate detection and removal across parsed messages.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::blocks::{ContentBlock, discard_second, flatten_blocks};
use super::similarity::composite_similarity;
use crate::config::DedupConfig;
use crate::embedded::{EmbeddedAnalysis, EmbeddedContentAnalyzer, PlainTextAnalyzer};
use crate::logging::{Logger, TracingLogger};
use crate::message::MessageRecord;

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+\n").unwrap());

/// Outcome of deduplication.
///
/// A message kept for its context (timestamp, reactions, thread markers) may
/// come back with empty `text` when all of its content was a duplicate. The
/// parser never produces such messages; only deduplication does.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupResult {
    pub messages: Vec<MessageRecord>,
    /// Blocks discarded as duplicates
    pub removed_duplicates: usize,
    /// Kept messages that lost some of their content
    pub preserved_context: usize,
    /// Blocks considered, summed over every pass that changed something
    pub processed_blocks: usize,
}

/// What one pass produced, before totals are folded across passes.
struct PassOutcome {
    messages: Vec<MessageRecord>,
    /// Input position of each kept message
    sources: Vec<usize>,
    /// Whether each kept message lost content in this pass
    edited: Vec<bool>,
    removed: usize,
    blocks: usize,
    /// A message was dropped or its text changed
    changed: bool,
}

impl PassOutcome {
    fn keep(&mut self, source: usize, msg: MessageRecord, edited: bool) {
        self.messages.push(msg);
        self.sources.push(source);
        self.edited.push(edited);
    }
}

/// Removes repeated link previews, quotes and reposts.
///
/// # Example
///
/// ```rust
/// use chatpaste::config::DedupConfig;
/// use chatpaste::dedup::ContentDeduplicator;
/// use chatpaste::MessageRecord;
///
/// let messages = vec![
///     MessageRecord::new("Jane").with_text("Deploy window moves to Friday"),
///     MessageRecord::new("Bob").with_text("Deploy window moves to Friday"),
/// ];
///
/// let result = ContentDeduplicator::new(DedupConfig::default()).process(messages);
/// assert_eq!(result.removed_duplicates, 1);
/// assert_eq!(result.messages.len(), 1);
/// ```
pub struct ContentDeduplicator<A = PlainTextAnalyzer, L = TracingLogger> {
    config: DedupConfig,
    analyzer: A,
    logger: L,
}

impl ContentDeduplicator<PlainTextAnalyzer, TracingLogger> {
    pub fn new(config: DedupConfig) -> Self {
        let logger = TracingLogger::new(config.debug);
        Self {
            config,
            analyzer: PlainTextAnalyzer,
            logger,
        }
    }
}

impl Default for ContentDeduplicator<PlainTextAnalyzer, TracingLogger> {
    fn default() -> Self {
        Self::new(DedupConfig::default())
    }
}

impl<A: EmbeddedContentAnalyzer, L: Logger> ContentDeduplicator<A, L> {
    #[must_use]
    pub fn with_analyzer<B: EmbeddedContentAnalyzer>(self, analyzer: B) -> ContentDeduplicator<B, L> {
        ContentDeduplicator {
            config: self.config,
            analyzer,
            logger: self.logger,
        }
    }

    #[must_use]
    pub fn with_logger<M: Logger>(self, logger: M) -> ContentDeduplicator<A, M> {
        ContentDeduplicator {
            config: self.config,
            analyzer: self.analyzer,
            logger,
        }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Deduplicates `messages`. Never fails.
    ///
    /// The comparison window counts positions in the message list, and
    /// dropping a message brings its neighbours closer. Passes therefore
    /// repeat until one leaves the messages unchanged, so running the result
    /// through again removes nothing.
    pub fn process(&self, messages: Vec<MessageRecord>) -> DedupResult {
        let mut edited = vec![false; messages.len()];
        let mut current = messages;
        let mut removed_duplicates = 0;
        let mut processed_blocks = 0;
        let mut passes = 0;

        loop {
            let outcome = self.pass(current);
            current = outcome.messages;
            if !outcome.changed {
                if passes == 0 {
                    processed_blocks = outcome.blocks;
                }
                break;
            }
            passes += 1;
            removed_duplicates += outcome.removed;
            processed_blocks += outcome.blocks;
            edited = outcome
                .sources
                .iter()
                .zip(&outcome.edited)
                .map(|(&source, &now)| edited[source] || now)
                .collect();
        }

        let preserved_context = edited.iter().filter(|e| **e).count();
        self.logger.info(format_args!(
            "dedup: {processed_blocks} blocks, {removed_duplicates} duplicates removed, {preserved_context} messages edited, {} kept after {} passes",
            current.len(),
            passes.max(1)
        ));

        DedupResult {
            messages: current,
            removed_duplicates,
            preserved_context,
            processed_blocks,
        }
    }

    /// One flatten, compare and apply round.
    fn pass(&self, messages: Vec<MessageRecord>) -> PassOutcome {
        let analyses: Vec<EmbeddedAnalysis> =
            messages.iter().map(|m| self.analyzer.analyze(m)).collect();
        let blocks = flatten_blocks(&analyses, self.config.min_content_length);
        let discarded = self.find_duplicates(&blocks);

        let mut gone: Vec<Vec<&ContentBlock>> = vec![Vec::new(); messages.len()];
        for (block, _) in blocks.iter().zip(&discarded).filter(|(_, d)| **d) {
            gone[block.message_index].push(block);
        }

        let mut outcome = PassOutcome {
            messages: Vec::with_capacity(messages.len()),
            sources: Vec::with_capacity(messages.len()),
            edited: Vec::with_capacity(messages.len()),
            removed: discarded.iter().filter(|d| **d).count(),
            blocks: blocks.len(),
            changed: false,
        };
        for (index, ((mut msg, analysis), gone)) in
            messages.into_iter().zip(analyses).zip(gone).enumerate()
        {
            if gone.is_empty() {
                outcome.keep(index, msg, false);
                continue;
            }

            let all_embedded = gone.iter().all(|b| b.is_embedded);
            if let Some(cleaned) = analysis.cleaned_text.filter(|t| all_embedded && !t.trim().is_empty()) {
                outcome.changed |= cleaned != msg.text;
                msg.text = cleaned;
                outcome.keep(index, msg, true);
                continue;
            }

            let original_len = msg.text.trim().chars().count();
            let discarded_len: usize = gone.iter().map(|b| b.len()).sum();
            let below_ratio =
                (discarded_len as f64) < self.config.preservation_ratio * original_len as f64;

            if !msg.has_context() && !below_ratio {
                self.debug(format_args!(
                    "message {index} dropped: {discarded_len} of {original_len} chars duplicated"
                ));
                outcome.changed = true;
                continue;
            }

            let text = remove_blocks(&msg.text, &gone);
            outcome.changed |= text != msg.text;
            msg.text = text;
            outcome.keep(index, msg, true);
        }
        outcome
    }

    /// Marks blocks to discard. A discarded block takes no further part in
    /// comparisons; the block it duplicated stays eligible.
    ///
    /// Above `max_blocks` only exact matches count, so blocks are bucketed by
    /// trimmed content and only compared within a bucket.
    fn find_duplicates(&self, blocks: &[ContentBlock]) -> Vec<bool> {
        let mut discarded = vec![false; blocks.len()];
        if blocks.len() > self.config.max_blocks {
            self.logger.warn(format_args!(
                "{} content blocks exceed the limit of {}, comparing exact matches only",
                blocks.len(),
                self.config.max_blocks
            ));
            let mut buckets: HashMap<&str, Vec<usize>> = HashMap::new();
            for (i, block) in blocks.iter().enumerate() {
                buckets.entry(block.content.trim()).or_default().push(i);
            }
            for bucket in buckets.values().filter(|b| b.len() > 1) {
                self.compare_all(blocks, bucket, &mut discarded, true);
            }
        } else {
            let all: Vec<usize> = (0..blocks.len()).collect();
            self.compare_all(blocks, &all, &mut discarded, false);
        }
        discarded
    }

    /// Pairwise pass over `candidates`, which must be in ascending order.
    fn compare_all(
        &self,
        blocks: &[ContentBlock],
        candidates: &[usize],
        discarded: &mut [bool],
        exact_only: bool,
    ) {
        for (pos, &i) in candidates.iter().enumerate() {
            for &j in &candidates[pos + 1..] {
                if discarded[i] {
                    break;
                }
                if discarded[j] {
                    continue;
                }
                let (a, b) = (&blocks[i], &blocks[j]);

                // a message's body always contains its own chunks
                if a.message_index == b.message_index && a.is_embedded != b.is_embedded {
                    continue;
                }

                let exact = a.content.trim() == b.content.trim();
                if !exact {
                    if exact_only || b.message_index.abs_diff(a.message_index) > self.config.window {
                        continue;
                    }
                    let score = composite_similarity(&a.content, &b.content, self.config.weights);
                    if score < self.config.similarity_threshold {
                        continue;
                    }
                    self.debug(format_args!(
                        "blocks {i} and {j} similar ({score:.3}) in messages {} and {}",
                        a.message_index, b.message_index
                    ));
                } else {
                    self.debug(format_args!(
                        "blocks {i} and {j} identical in messages {} and {}",
                        a.message_index, b.message_index
                    ));
                }

                if discard_second(a, b) {
                    discarded[j] = true;
                } else {
                    discarded[i] = true;
                }
            }
        }
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        if self.config.debug {
            self.logger.debug(args);
        }
    }
}

fn normalize_line(line: &str) -> &str {
    line.trim().trim_start_matches('>').trim()
}

/// Removes one block's text from a message body.
///
/// Tries a verbatim substring first, then blanks every line matching a line
/// of the block after trimming and quote-marker stripping.
fn remove_block(text: &str, block: &ContentBlock) -> String {
    let needle = block.content.trim();
    if needle.is_empty() {
        return text.to_string();
    }
    if text.contains(needle) {
        // a quoted chunk leaves its `>` markers behind
        return text
            .replacen(needle, "", 1)
            .lines()
            .map(|line| if line.trim() == ">" { "" } else { line })
            .collect::<Vec<_>>()
            .join("\n");
    }

    let targets: HashSet<&str> = needle
        .lines()
        .map(normalize_line)
        .filter(|l| !l.is_empty())
        .collect();
    text.lines()
        .map(|line| if targets.contains(normalize_line(line)) { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_blank_runs(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").trim().to_string()
}

fn remove_blocks(text: &str, blocks: &[&ContentBlock]) -> String {
    let stripped = blocks
        .iter()
        .fold(text.to_string(), |acc, block| remove_block(&acc, block));
    collapse_blank_runs(&stripped)
}

/// Deduplicates parsed messages with default settings.
pub fn deduplicate(messages: Vec<MessageRecord>, debug: bool) -> DedupResult {
    ContentDeduplicator::new(DedupConfig::default().with_debug(debug)).process(messages)
}
