//! Mutable state threaded through one parse pass.

use chrono::NaiveDate;

use crate::message::MessageRecord;

/// Everything the line handlers read and write.
///
/// `pending_username` and `pending_header` implement the two-line header
/// layout: a name-like line is held back until the next line shows whether
/// it was a header, and a built header is held back until content arrives.
#[derive(Debug, Default)]
pub(crate) struct ParserState {
    pub messages: Vec<MessageRecord>,
    pub current: Option<MessageRecord>,
    pub pending_username: Option<String>,
    pub pending_avatar: Option<String>,
    pub pending_header: Option<MessageRecord>,
    pub date_context: Option<NaiveDate>,
    pub cursor: usize,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the current message to the output. Messages whose trimmed body
    /// is empty are dropped.
    pub fn finalize_current(&mut self) {
        if let Some(mut msg) = self.current.take() {
            let trimmed = msg.text.trim();
            if trimmed.is_empty() {
                return;
            }
            if trimmed.len() != msg.text.len() {
                msg.text = trimmed.to_string();
            }
            self.messages.push(msg);
        }
    }

    /// Finalizes the current message and makes `msg` current.
    pub fn start_message(&mut self, msg: MessageRecord) {
        self.finalize_current();
        self.current = Some(msg);
    }

    /// Promotes a pending two-line header to the current message.
    ///
    /// Returns `false` if there was nothing to activate.
    pub fn activate_pending_header(&mut self) -> bool {
        match self.pending_header.take() {
            Some(header) => {
                self.start_message(header);
                true
            }
            None => false,
        }
    }

    /// Drops a header that never received content.
    pub fn discard_pending_header(&mut self) -> Option<MessageRecord> {
        self.pending_header.take()
    }

    /// The message thread markers belong to: a pending two-line header that
    /// is still waiting for content, else the current message.
    pub fn thread_target(&mut self) -> Option<&mut MessageRecord> {
        self.pending_header.as_mut().or(self.current.as_mut())
    }

    /// Appends a content line, activating a pending header first and opening
    /// a message for `default_username` if none is active.
    pub fn append_content(&mut self, line: &str, default_username: &str) {
        self.activate_pending_header();

        let msg = self.current.get_or_insert_with(|| {
            let mut msg = MessageRecord::new(default_username);
            msg.avatar = self.pending_avatar.take();
            msg.date = self.date_context;
            msg
        });
        msg.push_line(line);
    }

    /// Treats a held-back name-like line as ordinary content.
    ///
    /// Returns `true` if there was one.
    pub fn resolve_pending_username(&mut self, default_username: &str) -> bool {
        match self.pending_username.take() {
            Some(line) => {
                self.append_content(&line, default_username);
                true
            }
            None => false,
        }
    }
}
