//! Message-boundary parser.
//!
//! Walks a pasted transcript line by line, classifies each line and feeds it
//! to a small state machine that decides where one message ends and the next
//! begins.
//!
//! # Header layouts
//!
//! | Layout | Shape | Notes |
//! |--------|-------|-------|
//! | single-line | `Name [10:42 AM](url)` | an unparseable time is kept verbatim |
//! | two-line | `Name` then `10:42 AM` | only becomes a message once content follows |
//!
//! Everything the classifier reports as metadata (reaction lines aside) is
//! skipped without touching the current message.
//!
//! # Example
//!
//! ```rust
//! use chatpaste::parse_messages;
//!
//! let text = "UserName\n10:00 AM\n\nHello\n:+1: 2";
//! let messages = parse_messages(text, false);
//!
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].username, "UserName");
//! assert_eq!(messages[0].text, "Hello");
//! assert_eq!(messages[0].reactions[0].count, 2);
//! ```

mod state;

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Utc};

use crate::classifier::{self, LineTag};
use crate::config::ParserConfig;
use crate::error::{ChatpasteError, LineErrorKind, Result};
use crate::logging::{Logger, TracingLogger};
use crate::message::{MessageRecord, Timestamp};
use crate::parsing::{clean_username, parse_date, parse_date_in_year, parse_header_time, parse_reactions};

use state::ParserState;

/// Parses pasted transcripts into [`MessageRecord`]s.
///
/// Parsing never fails: a line that can't be handled is logged through the
/// injected [`Logger`] and skipped.
pub struct MessageParser<L = TracingLogger> {
    config: ParserConfig,
    logger: L,
}

impl MessageParser<TracingLogger> {
    /// Creates a parser that logs through `tracing`.
    pub fn new(config: ParserConfig) -> Self {
        let logger = TracingLogger::new(config.debug);
        Self { config, logger }
    }
}

impl Default for MessageParser<TracingLogger> {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl<L: Logger> MessageParser<L> {
    /// Swaps in another logger.
    #[must_use]
    pub fn with_logger<M: Logger>(self, logger: M) -> MessageParser<M> {
        MessageParser {
            config: self.config,
            logger,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Reads and parses a transcript file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<MessageRecord>> {
        let content = fs::read_to_string(path)?;
        Ok(self.parse_str(&content))
    }

    /// Parses a complete transcript held in memory.
    pub fn parse_str(&self, text: &str) -> Vec<MessageRecord> {
        let reference_day = self
            .config
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let lines: Vec<&str> = text.lines().collect();
        let mut state = ParserState::new();

        while state.cursor < lines.len() {
            let line = lines[state.cursor].trim();
            let tag = classifier::classify(line);
            if let Err(err) = self.handle_line(&mut state, tag, line, reference_day) {
                self.logger.warn(format_args!("{err}"));
            }
            state.cursor += 1;
        }

        self.finish(&mut state);
        self.debug(format_args!(
            "parsed {} messages from {} lines",
            state.messages.len(),
            lines.len()
        ));
        state.messages
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        if self.config.debug {
            self.logger.debug(args);
        }
    }

    fn handle_line(
        &self,
        state: &mut ParserState,
        tag: LineTag,
        line: &str,
        reference_day: NaiveDate,
    ) -> Result<()> {
        if tag.is_metadata() {
            if state.current.is_none() {
                if let Some(name) = state.pending_username.take() {
                    self.debug(format_args!(
                        "line {}: {tag} interrupted pending username '{name}', discarding it",
                        state.cursor
                    ));
                }
            }
            return self.handle_metadata(state, tag, line);
        }

        let default_username = self.config.default_username.as_str();
        match tag {
            LineTag::Blank => {
                if state.resolve_pending_username(default_username) {
                    state.append_content("", default_username);
                } else if !state.activate_pending_header() {
                    if let Some(msg) = state.current.as_mut() {
                        msg.push_line("");
                    }
                }
                Ok(())
            }
            LineTag::UserTimestampHeader => self.handle_header(state, line, reference_day),
            LineTag::DateSeparator => self.handle_date_separator(state, line, reference_day),
            LineTag::AvatarOnly => {
                state.resolve_pending_username(default_username);
                let caps = classifier::captures(tag, line)
                    .ok_or_else(|| ChatpasteError::missing_capture(state.cursor, "url"))?;
                state.pending_avatar = Some(caps["url"].to_string());
                Ok(())
            }
            LineTag::TimeOnly => {
                self.handle_time_only(state, line, reference_day);
                Ok(())
            }
            LineTag::PotentialUsername => {
                state.resolve_pending_username(default_username);
                state.pending_username = Some(line.to_string());
                Ok(())
            }
            _ => {
                state.resolve_pending_username(default_username);
                state.append_content(line, default_username);
                Ok(())
            }
        }
    }

    fn handle_metadata(&self, state: &mut ParserState, tag: LineTag, line: &str) -> Result<()> {
        match tag {
            LineTag::ReactionLine => {
                let reactions =
                    parse_reactions(line).map_err(|kind| ChatpasteError::line(state.cursor, kind))?;
                match state.current.as_mut() {
                    Some(msg) => msg.reactions.extend(reactions),
                    None => self.logger.warn(format_args!(
                        "line {}: {} reactions with no active message, dropped",
                        state.cursor,
                        reactions.len()
                    )),
                }
            }
            LineTag::ThreadReplyHeader => {
                if let Some(msg) = state.thread_target() {
                    msg.is_thread_reply = true;
                }
            }
            LineTag::ReplyCount => {
                if let Some(msg) = state.thread_target() {
                    msg.is_thread_start = true;
                    msg.thread_info = Some(line.to_string());
                }
            }
            _ => self.debug(format_args!("line {}: skipped {tag}", state.cursor)),
        }
        Ok(())
    }

    fn handle_header(
        &self,
        state: &mut ParserState,
        line: &str,
        reference_day: NaiveDate,
    ) -> Result<()> {
        let caps = classifier::captures(LineTag::UserTimestampHeader, line)
            .ok_or_else(|| ChatpasteError::missing_capture(state.cursor, "header"))?;
        let name = caps
            .name("name")
            .ok_or_else(|| ChatpasteError::missing_capture(state.cursor, "name"))?
            .as_str();
        let time = caps
            .name("time")
            .ok_or_else(|| ChatpasteError::missing_capture(state.cursor, "time"))?
            .as_str();

        state.resolve_pending_username(&self.config.default_username);
        if state.discard_pending_header().is_some() {
            self.debug(format_args!(
                "line {}: two-line header without content discarded",
                state.cursor
            ));
        }

        let pending_avatar = state.pending_avatar.take();
        let avatar = caps.name("avatar").map(|m| m.as_str().to_string()).or(pending_avatar);
        let timestamp = self.resolve_time(state, time, reference_day);

        let mut msg = MessageRecord::new(clean_username(name, &self.config.default_username));
        msg.avatar = avatar;
        msg.timestamp = Some(timestamp);
        msg.date = state.date_context;
        state.start_message(msg);
        Ok(())
    }

    fn handle_time_only(&self, state: &mut ParserState, line: &str, reference_day: NaiveDate) {
        let Some(name) = state.pending_username.take() else {
            self.debug(format_args!(
                "line {}: bare time with no username, ignored",
                state.cursor
            ));
            return;
        };
        if state.discard_pending_header().is_some() {
            self.debug(format_args!(
                "line {}: two-line header without content discarded",
                state.cursor
            ));
        }

        let timestamp = self.resolve_time(state, line, reference_day);
        let mut header = MessageRecord::new(clean_username(&name, &self.config.default_username));
        header.avatar = state.pending_avatar.take();
        header.timestamp = Some(timestamp);
        header.date = state.date_context;
        state.pending_header = Some(header);
    }

    /// Parses header time text, updating the day context when the text names
    /// a day. Unparseable text is kept verbatim.
    fn resolve_time(&self, state: &mut ParserState, time: &str, reference_day: NaiveDate) -> Timestamp {
        let day = state.date_context.unwrap_or(reference_day);
        match parse_header_time(time, day) {
            Some(parsed) => {
                if let Some(date) = parsed.explicit_date {
                    state.date_context = Some(date);
                }
                Timestamp::Parsed(parsed.instant)
            }
            None => {
                self.debug(format_args!(
                    "line {}: keeping unparsed timestamp '{time}'",
                    state.cursor
                ));
                Timestamp::Raw(time.to_string())
            }
        }
    }

    fn handle_date_separator(
        &self,
        state: &mut ParserState,
        line: &str,
        reference_day: NaiveDate,
    ) -> Result<()> {
        state.resolve_pending_username(&self.config.default_username);
        state.discard_pending_header();
        state.finalize_current();

        let caps = classifier::captures(LineTag::DateSeparator, line)
            .ok_or_else(|| ChatpasteError::missing_capture(state.cursor, "date"))?;
        let text = caps
            .name("bracketed")
            .or_else(|| caps.name("weekday"))
            .ok_or_else(|| ChatpasteError::missing_capture(state.cursor, "date"))?
            .as_str();

        let year = state.date_context.unwrap_or(reference_day).year();
        let date = parse_date(text)
            .or_else(|| parse_date_in_year(text, year))
            .ok_or_else(|| {
                ChatpasteError::line(
                    state.cursor,
                    LineErrorKind::Other(format!("unrecognised date separator '{text}'")),
                )
            })?;
        state.date_context = Some(date);
        Ok(())
    }

    fn finish(&self, state: &mut ParserState) {
        state.resolve_pending_username(&self.config.default_username);
        if state.discard_pending_header().is_some() {
            self.debug(format_args!(
                "two-line header at end of input had no content, discarded"
            ));
        }
        state.finalize_current();
    }
}

/// Parses a pasted transcript with default settings.
///
/// Always returns a list, possibly empty; never panics on malformed input.
pub fn parse_messages(text: &str, debug: bool) -> Vec<MessageRecord> {
    MessageParser::new(ParserConfig::new().with_debug(debug)).parse_str(text)
}
