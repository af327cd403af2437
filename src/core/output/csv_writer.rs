//! CSV output writer.

use std::fs::File;
use std::io::Write;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::message::MessageRecord;

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns, in order, each optional one gated by [`OutputConfig`]:
///   `Timestamp`, `Date`, `Username`, `Text`, `Avatar`, `Reactions`,
///   `ThreadStart`, `ThreadReply`
/// - Reactions are written as `name:count` pairs joined with `,`
/// - Encoding: UTF-8
pub fn write_csv(messages: &[MessageRecord], output_path: &str, config: &OutputConfig) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(file, messages, config)
}

/// Converts messages to a CSV string.
pub fn to_csv(messages: &[MessageRecord], config: &OutputConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, messages, config)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_records<W: Write>(out: W, messages: &[MessageRecord], config: &OutputConfig) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);

    writer.write_record(build_header(config))?;
    for msg in messages {
        writer.write_record(build_record(msg, config))?;
    }

    writer.flush()?;
    Ok(())
}

fn build_header(config: &OutputConfig) -> Vec<&'static str> {
    let mut header = Vec::new();

    if config.include_timestamps {
        header.push("Timestamp");
    }
    if config.include_dates {
        header.push("Date");
    }

    header.push("Username");
    header.push("Text");

    if config.include_avatars {
        header.push("Avatar");
    }
    if config.include_reactions {
        header.push("Reactions");
    }
    if config.include_thread_flags {
        header.push("ThreadStart");
        header.push("ThreadReply");
    }

    header
}

fn build_record(msg: &MessageRecord, config: &OutputConfig) -> Vec<String> {
    let mut record = Vec::new();

    if config.include_timestamps {
        record.push(msg.timestamp.as_ref().map(ToString::to_string).unwrap_or_default());
    }
    if config.include_dates {
        record.push(msg.date.map(|d| d.to_string()).unwrap_or_default());
    }

    record.push(msg.username.clone());
    record.push(msg.text.clone());

    if config.include_avatars {
        record.push(msg.avatar.clone().unwrap_or_default());
    }
    if config.include_reactions {
        let reactions: Vec<String> = msg
            .reactions
            .iter()
            .map(|r| format!("{}:{}", r.name, r.count))
            .collect();
        record.push(reactions.join(","));
    }
    if config.include_thread_flags {
        record.push(msg.is_thread_start.to_string());
        record.push(msg.is_thread_reply.to_string());
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Reaction, Timestamp};
    use chrono::{TimeZone, Utc};
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_csv_basic() {
        let messages = vec![
            MessageRecord::new("Alice").with_text("Hello"),
            MessageRecord::new("Bob").with_text("Hi there"),
        ];

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        write_csv(&messages, path, &OutputConfig::new()).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Username;Text"));
        assert!(content.contains("Alice;Hello"));
        assert!(content.contains("Bob;Hi there"));
    }

    #[test]
    fn test_to_csv_with_metadata() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
        let msg = MessageRecord::new("Alice")
            .with_text("Hello")
            .with_timestamp(Timestamp::Parsed(ts))
            .with_reaction(Reaction::new("+1", 3))
            .with_reaction(Reaction::new("tada", 1));

        let config = OutputConfig::new().with_timestamps().with_reactions();
        let csv = to_csv(&[msg], &config).unwrap();

        assert!(csv.contains("Timestamp;Username;Text;Reactions"));
        assert!(csv.contains("2024-06-15T12:30:00Z;Alice;Hello;+1:3,tada:1"));
    }

    #[test]
    fn test_multiline_text_is_quoted() {
        let msg = MessageRecord::new("Alice").with_text("line one\nline; two");
        let csv = to_csv(&[msg], &OutputConfig::new()).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "line one\nline; two");
    }
}
