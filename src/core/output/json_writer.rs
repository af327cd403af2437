//! JSON output writer.

use std::fs::File;
use std::io::Write;

use super::ExportMessage;
use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::message::MessageRecord;

/// Writes messages to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"username": "Alice", "text": "Hello"},
///   {"username": "Bob", "text": "Hi"}
/// ]
/// ```
pub fn write_json(messages: &[MessageRecord], output_path: &str, config: &OutputConfig) -> Result<()> {
    let json = to_json(messages, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts messages to a pretty-printed JSON array.
pub fn to_json(messages: &[MessageRecord], config: &OutputConfig) -> Result<String> {
    let records: Vec<ExportMessage<'_>> = messages
        .iter()
        .map(|m| ExportMessage::from_record(m, config))
        .collect();

    Ok(serde_json::to_string_pretty(&records)?)
}
