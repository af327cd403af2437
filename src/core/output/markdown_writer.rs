//! Markdown output writer.
//!
//! Each message becomes a collapsible callout:
//!
//! ```markdown
//! > [!note]+ Alice (2024-03-15T10:00:00Z)
//! > Hello
//! >
//! > **Reactions:** +1 (3), tada (1)
//! ```

use std::fmt::Write as _;
use std::fs;

use chrono::NaiveDate;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::message::MessageRecord;

/// Writes messages as Markdown callouts.
pub fn write_markdown(messages: &[MessageRecord], output_path: &str, config: &OutputConfig) -> Result<()> {
    fs::write(output_path, to_markdown(messages, config))?;
    Ok(())
}

/// Converts messages to a Markdown string.
///
/// With dates enabled, a `## YYYY-MM-DD` heading is emitted whenever the
/// day changes.
pub fn to_markdown(messages: &[MessageRecord], config: &OutputConfig) -> String {
    let mut out = String::new();
    let mut last_date: Option<NaiveDate> = None;

    for msg in messages {
        if config.include_dates {
            if let Some(date) = msg.date.filter(|d| Some(*d) != last_date) {
                let _ = writeln!(out, "## {date}\n");
                last_date = Some(date);
            }
        }

        let _ = write!(out, "> [!note]+ {}", msg.username);
        if config.include_timestamps {
            if let Some(ts) = &msg.timestamp {
                let _ = write!(out, " ({ts})");
            }
        }
        out.push('\n');

        if config.include_avatars {
            if let Some(avatar) = &msg.avatar {
                let _ = writeln!(out, "> ![]({avatar})");
            }
        }

        for line in msg.text.lines() {
            if line.is_empty() {
                out.push_str(">\n");
            } else {
                let _ = writeln!(out, "> {line}");
            }
        }

        if config.include_reactions && !msg.reactions.is_empty() {
            let reactions: Vec<String> = msg
                .reactions
                .iter()
                .map(|r| format!("{} ({})", r.name, r.count))
                .collect();
            if !msg.text.is_empty() {
                out.push_str(">\n");
            }
            let _ = writeln!(out, "> **Reactions:** {}", reactions.join(", "));
        }

        if config.include_thread_flags {
            if msg.is_thread_start {
                let info = msg.thread_info.as_deref().unwrap_or("thread");
                let _ = writeln!(out, "> _Thread: {info}_");
            }
            if msg.is_thread_reply {
                out.push_str("> _Thread reply_\n");
            }
        }

        out.push('\n');
    }

    out
}
