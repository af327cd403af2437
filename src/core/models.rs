//! Output configuration.

use serde::{Deserialize, Serialize};

/// Controls which optional fields the writers emit.
///
/// Username and text are always written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Include header timestamps
    pub include_timestamps: bool,
    /// Include the inherited day
    pub include_dates: bool,
    /// Include avatar URLs
    pub include_avatars: bool,
    /// Include reaction summaries
    pub include_reactions: bool,
    /// Include thread start / reply flags
    pub include_thread_flags: bool,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every optional field enabled.
    pub fn all() -> Self {
        Self {
            include_timestamps: true,
            include_dates: true,
            include_avatars: true,
            include_reactions: true,
            include_thread_flags: true,
        }
    }

    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.include_timestamps = true;
        self
    }

    #[must_use]
    pub fn with_dates(mut self) -> Self {
        self.include_dates = true;
        self
    }

    #[must_use]
    pub fn with_avatars(mut self) -> Self {
        self.include_avatars = true;
        self
    }

    #[must_use]
    pub fn with_reactions(mut self) -> Self {
        self.include_reactions = true;
        self
    }

    #[must_use]
    pub fn with_thread_flags(mut self) -> Self {
        self.include_thread_flags = true;
        self
    }
}
