//! Configuration types for the parser and the deduplicator.
//!
//! These are plain serde-friendly structs with builder methods; nothing here
//! depends on the CLI.
//!
//! # Example
//!
//! ```rust
//! use chatpaste::config::{DedupConfig, ParserConfig};
//!
//! let parser = ParserConfig::new().with_debug(true);
//! let dedup = DedupConfig::new()
//!     .with_window(5)
//!     .with_similarity_threshold(0.9);
//!
//! assert!(dedup.validate().is_ok());
//! # let _ = parser;
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ChatpasteError, Result};
use crate::message::UNKNOWN_USER;

/// Configuration for transcript parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Username given to messages whose author cannot be determined
    /// (default: `"Unknown User"`)
    pub default_username: String,

    /// Day used to resolve bare times like `10:00 AM` when no date separator
    /// or dated header has been seen yet (default: today, UTC)
    pub reference_date: Option<NaiveDate>,

    /// Emit debug-level log events (default: false)
    pub debug: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_username: UNKNOWN_USER.to_string(),
            reference_date: None,
            debug: false,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback username.
    #[must_use]
    pub fn with_default_username(mut self, name: impl Into<String>) -> Self {
        self.default_username = name.into();
        self
    }

    /// Pins the day used for bare times.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Enables or disables debug logging.
    #[must_use]
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

/// Weights of the three similarity metrics in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    pub character: f64,
    pub word: f64,
    pub edit: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            character: 0.3,
            word: 0.4,
            edit: 0.3,
        }
    }
}

impl SimilarityWeights {
    pub fn sum(&self) -> f64 {
        self.character + self.word + self.edit
    }
}

/// Configuration for duplicate content removal.
///
/// The defaults were tuned on real pasted threads: repeated link previews
/// and quoted messages tend to differ only in whitespace or truncation.
///
/// # Example
///
/// ```rust
/// use chatpaste::config::DedupConfig;
///
/// let config = DedupConfig::new().with_min_content_length(20);
/// assert_eq!(config.window, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Blocks shorter than this many characters are ignored (default: 15)
    pub min_content_length: usize,

    /// Maximum message distance for near-duplicate comparison (default: 3).
    /// Exact matches ignore the window.
    pub window: usize,

    /// Composite similarity at or above which two blocks are duplicates
    /// (default: 0.95)
    pub similarity_threshold: f64,

    /// A message is dropped when its discarded content reaches this share of
    /// its length and it carries no other context (default: 0.8)
    pub preservation_ratio: f64,

    /// Above this many blocks only exact matches are compared (default: 2000)
    pub max_blocks: usize,

    /// Metric weights (default: 0.3 / 0.4 / 0.3)
    pub weights: SimilarityWeights,

    /// Emit debug-level log events (default: false)
    pub debug: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            min_content_length: 15,
            window: 3,
            similarity_threshold: 0.95,
            preservation_ratio: 0.8,
            max_blocks: 2000,
            weights: SimilarityWeights::default(),
            debug: false,
        }
    }
}

impl DedupConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_content_length(mut self, len: usize) -> Self {
        self.min_content_length = len;
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_preservation_ratio(mut self, ratio: f64) -> Self {
        self.preservation_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_max_blocks(mut self, max: usize) -> Self {
        self.max_blocks = max;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Checks that ratios are within `[0, 1]` and the weights sum to 1.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ChatpasteError::invalid_config(
                "similarity_threshold",
                format!("{} is outside [0, 1]", self.similarity_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.preservation_ratio) {
            return Err(ChatpasteError::invalid_config(
                "preservation_ratio",
                format!("{} is outside [0, 1]", self.preservation_ratio),
            ));
        }
        let w = self.weights;
        if w.character < 0.0 || w.word < 0.0 || w.edit < 0.0 {
            return Err(ChatpasteError::invalid_config(
                "weights",
                "weights must not be negative",
            ));
        }
        if (w.sum() - 1.0).abs() > 1e-6 {
            return Err(ChatpasteError::invalid_config(
                "weights",
                format!("weights sum to {} instead of 1", w.sum()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.default_username, "Unknown User");
        assert!(config.reference_date.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_parser_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let config = ParserConfig::new()
            .with_default_username("Someone")
            .with_reference_date(date)
            .with_debug(true);
        assert_eq!(config.default_username, "Someone");
        assert_eq!(config.reference_date, Some(date));
        assert!(config.debug);
    }

    #[test]
    fn test_dedup_defaults() {
        let config = DedupConfig::default();
        assert_eq!(config.min_content_length, 15);
        assert_eq!(config.window, 3);
        assert!((config.similarity_threshold - 0.95).abs() < f64::EPSILON);
        assert!((config.preservation_ratio - 0.8).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = DedupConfig::new().with_similarity_threshold(1.5).validate();
        assert!(err.unwrap_err().is_invalid_config());

        let err = DedupConfig::new().with_preservation_ratio(-0.1).validate();
        assert!(err.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let weights = SimilarityWeights {
            character: 0.5,
            word: 0.5,
            edit: 0.5,
        };
        assert!(DedupConfig::new().with_weights(weights).validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: DedupConfig = serde_json::from_str(r#"{"window": 5}"#).unwrap();
        assert_eq!(config.window, 5);
        assert_eq!(config.min_content_length, 15);
    }
}
