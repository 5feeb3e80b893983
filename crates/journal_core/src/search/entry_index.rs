//! In-memory entry index keyed by calendar day.
//!
//! # Responsibility
//! - Filter entries by a case-insensitive substring query.
//! - Group the filtered subset by `day_key` for per-cell lookup.
//! - Provide a date-sorted view for current/next/previous navigation.
//!
//! # Invariants
//! - The index is rebuilt from scratch; it never holds a partial update.
//! - Entries with malformed dates are grouped and sorted under `today`.
//! - Within one day, entries keep their store order.

use crate::date::{day_key, DayKey};
use crate::model::entry::{EntryId, JournalEntry};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Normalized filter text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    needle: String,
}

impl EntryFilter {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Matches description, joined categories, raw date, or formatted rating.
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if self.is_empty() {
            return true;
        }
        let needle = self.needle.as_str();
        entry.description.to_lowercase().contains(needle)
            || entry.categories.join(" ").to_lowercase().contains(needle)
            || entry.date.to_lowercase().contains(needle)
            || entry.rating_label().contains(needle)
    }
}

/// Returns the entries matching `query`, in input order.
pub fn filter_entries<'a>(entries: &'a [JournalEntry], query: &str) -> Vec<&'a JournalEntry> {
    let filter = EntryFilter::new(query);
    entries.iter().filter(|entry| filter.matches(entry)).collect()
}

/// Filtered, day-grouped snapshot of the entry set.
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    by_day: HashMap<DayKey, Vec<JournalEntry>>,
    ordered: Vec<JournalEntry>,
}

impl EntryIndex {
    /// Builds the index for `entries` under `query`.
    ///
    /// `today` substitutes for malformed entry dates.
    pub fn build(entries: &[JournalEntry], query: &str, today: NaiveDate) -> Self {
        let filter = EntryFilter::new(query);
        let mut dated: Vec<(NaiveDate, &JournalEntry)> = entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| (entry.day(today), entry))
            .collect();

        let mut by_day: HashMap<DayKey, Vec<JournalEntry>> = HashMap::new();
        for (day, entry) in &dated {
            by_day.entry(day_key(*day)).or_default().push((*entry).clone());
        }

        dated.sort_by_key(|(day, _)| *day);
        let ordered = dated.into_iter().map(|(_, entry)| entry.clone()).collect();

        Self { by_day, ordered }
    }

    /// Entries on the day identified by `key`; empty when none match.
    pub fn entries_for(&self, key: &str) -> &[JournalEntry] {
        self.by_day.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn day_count(&self) -> usize {
        self.by_day.len()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Filtered entries sorted by calendar day.
    pub fn ordered(&self) -> &[JournalEntry] {
        &self.ordered
    }

    pub fn current(&self, id: &str) -> Option<&JournalEntry> {
        self.ordered.iter().find(|entry| entry.id == id)
    }

    /// Id of the entry after `id` in date order; `None` at the end or if absent.
    pub fn next_id(&self, id: &str) -> Option<EntryId> {
        self.step(id, 1)
    }

    /// Id of the entry before `id` in date order; `None` at the start or if absent.
    pub fn previous_id(&self, id: &str) -> Option<EntryId> {
        self.step(id, -1)
    }

    fn step(&self, id: &str, delta: isize) -> Option<EntryId> {
        let position = self.ordered.iter().position(|entry| entry.id == id)?;
        let target = position.checked_add_signed(delta)?;
        self.ordered.get(target).map(|entry| entry.id.clone())
    }
}
