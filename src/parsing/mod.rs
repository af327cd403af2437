//! Shared parsing utilities.
//!
//! Small pure helpers the transcript parser leans on: header times, date
//! separators, username cleanup and reaction lines. None of them panic and
//! none of them allocate state between calls.

pub mod datetime;
pub mod reactions;
pub mod username;

// Re-export commonly used items
pub use datetime::{
    HeaderTime, parse_clock_time, parse_date, parse_date_in_year, parse_header_time,
    parse_slack_timestamp,
};
pub use reactions::parse_reactions;
pub use username::{clean_username, cleanup_doubled_usernames};
