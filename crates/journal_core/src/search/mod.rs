//! Entry filtering and per-day grouping.
//!
//! # Responsibility
//! - Match entries against the free-text filter.
//! - Group the filtered subset by day key and expose date-ordered navigation.

pub mod entry_index;
