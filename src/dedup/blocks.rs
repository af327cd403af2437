//! Content blocks: the units the deduplicator compares.

use crate::embedded::{EmbeddedAnalysis, EmbeddedContentType};

/// One comparable chunk of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub content: String,
    /// Position of the owning message
    pub message_index: usize,
    pub is_embedded: bool,
    pub embedded_type: Option<EmbeddedContentType>,
}

impl ContentBlock {
    /// Character count, not bytes.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_main(&self) -> bool {
        !self.is_embedded
    }

    fn rank(&self) -> u8 {
        self.embedded_type.map_or(0, EmbeddedContentType::rank)
    }
}

/// Flattens analyses into blocks: each message's main text, then each of its
/// embedded chunks. Blocks shorter than `min_len` characters are skipped.
pub fn flatten_blocks(analyses: &[EmbeddedAnalysis], min_len: usize) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    for (message_index, analysis) in analyses.iter().enumerate() {
        let main = analysis
            .cleaned_text
            .as_deref()
            .unwrap_or(&analysis.message.text);
        if main.chars().count() >= min_len {
            blocks.push(ContentBlock {
                content: main.to_string(),
                message_index,
                is_embedded: false,
                embedded_type: None,
            });
        }

        for chunk in &analysis.embedded_content {
            let content = chunk.joined();
            if content.chars().count() >= min_len {
                blocks.push(ContentBlock {
                    content,
                    message_index,
                    is_embedded: true,
                    embedded_type: Some(chunk.kind),
                });
            }
        }
    }

    blocks
}

/// Picks which of two duplicate blocks to discard. Returns `true` for `b`.
///
/// Embedded loses to main text, then the lower-ranked embedded type loses,
/// then the block from the later message loses. `a` is assumed to come first
/// in block order.
pub fn discard_second(a: &ContentBlock, b: &ContentBlock) -> bool {
    match (a.is_embedded, b.is_embedded) {
        (true, false) => false,
        (false, true) => true,
        (true, true) if a.rank() != b.rank() => b.rank() < a.rank(),
        _ => b.message_index >= a.message_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::EmbeddedContent;
    use crate::message::MessageRecord;

    fn block(index: usize, kind: Option<EmbeddedContentType>) -> ContentBlock {
        ContentBlock {
            content: "some duplicated content".into(),
            message_index: index,
            is_embedded: kind.is_some(),
            embedded_type: kind,
        }
    }

    #[test]
    fn test_flatten_skips_short_blocks() {
        let msg = MessageRecord::new("a").with_text("short");
        let long = MessageRecord::new("b").with_text("this one is long enough");
        let analyses = vec![
            EmbeddedAnalysis::none(&msg),
            EmbeddedAnalysis::new(
                &long,
                vec![
                    EmbeddedContent::new(EmbeddedContentType::QuotedMessage, ["tiny"]),
                    EmbeddedContent::new(
                        EmbeddedContentType::LinkPreview,
                        ["https://example.com", "Example title"],
                    ),
                ],
            ),
        ];

        let blocks = flatten_blocks(&analyses, 15);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_main());
        assert_eq!(blocks[0].message_index, 1);
        assert_eq!(blocks[1].embedded_type, Some(EmbeddedContentType::LinkPreview));
        assert_eq!(blocks[1].content, "https://example.com\nExample title");
    }

    #[test]
    fn test_flatten_prefers_cleaned_text() {
        let msg = MessageRecord::new("a").with_text("original body text here");
        let analyses = vec![EmbeddedAnalysis::none(&msg).with_cleaned_text("cleaned body text here")];
        let blocks = flatten_blocks(&analyses, 15);
        assert_eq!(blocks[0].content, "cleaned body text here");
    }

    #[test]
    fn test_min_length_counts_chars() {
        let msg = MessageRecord::new("a").with_text("ééééééé");
        // 7 chars, 14 bytes
        assert!(flatten_blocks(&[EmbeddedAnalysis::none(&msg)], 8).is_empty());
    }

    #[test]
    fn test_discard_prefers_embedded() {
        let main = block(5, None);
        let preview = block(1, Some(EmbeddedContentType::LinkPreview));
        assert!(!discard_second(&preview, &main));
        assert!(discard_second(&main, &preview));
    }

    #[test]
    fn test_discard_lower_rank() {
        let quote = block(3, Some(EmbeddedContentType::QuotedMessage));
        let preview = block(1, Some(EmbeddedContentType::LinkPreview));
        assert!(discard_second(&quote, &preview));
        assert!(!discard_second(&preview, &quote));
    }

    #[test]
    fn test_discard_later_message() {
        assert!(discard_second(&block(0, None), &block(4, None)));
        let a = block(0, Some(EmbeddedContentType::LinkPreview));
        let b = block(2, Some(EmbeddedContentType::LinkPreview));
        assert!(discard_second(&a, &b));
    }
}
