//! Common types and utilities shared across the radar-loop workspace.

pub mod duration;
pub mod time;

pub use duration::IsoDuration;
pub use time::{format_instant, parse_instant, TimeParseError, TrailingWindow};
