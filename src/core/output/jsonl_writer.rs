//! JSON Lines (JSONL) output writer.

use std::fs::File;
use std::io::{BufWriter, Write};

use super::ExportMessage;
use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::message::MessageRecord;

/// Writes messages to JSONL, one compact JSON object per line.
///
/// ```jsonl
/// {"username":"Alice","text":"Hello"}
/// {"username":"Bob","text":"Hi"}
/// ```
pub fn write_jsonl(messages: &[MessageRecord], output_path: &str, config: &OutputConfig) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(&mut writer, messages, config)?;
    writer.flush()?;
    Ok(())
}

/// Converts messages to a JSONL string.
pub fn to_jsonl(messages: &[MessageRecord], config: &OutputConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_lines(&mut buf, messages, config)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_lines<W: Write>(writer: &mut W, messages: &[MessageRecord], config: &OutputConfig) -> Result<()> {
    for msg in messages {
        let line = serde_json::to_string(&ExportMessage::from_record(msg, config))?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
