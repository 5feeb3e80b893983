//! Core logic for the infinite-scrolling calendar journal.
//! This crate owns the month window, entry store and their invariants.

pub mod config;
pub mod date;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod surface;
pub mod window;

pub use config::{CalendarConfig, ConfigError, PrependEstimate, WeekStart, WindowConfig};
pub use date::{DayKey, MonthOffset};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{EntryForm, EntryId, EntryPatch, JournalEntry, NewEntry};
pub use repo::entry_repo::{
    EntryRepository, RepoError, RepoResult, SqliteEntryRepository, ENTRIES_STORAGE_KEY,
};
pub use search::entry_index::{filter_entries, EntryFilter, EntryIndex};
pub use service::entry_store::{parse_seed_json, EntryStore, LoadSource};
pub use surface::calendar::{CalendarSurface, DayCell, FrameUpdate, MonthPanel};
pub use surface::keyboard::{KeyCommand, KeyFocus, ModalCommand, ScrollAction};
pub use window::controller::{
    ScrollCorrection, ScrollMetrics, ScrollTarget, ScrollWindowController, SettleOutcome,
};
pub use window::visibility::{most_visible, Rect};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
