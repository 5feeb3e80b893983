//! Journal entry store.
//!
//! # Responsibility
//! - Load the persisted entry set, or seed it when absent or corrupt.
//! - Provide the only write paths: `add`, `update`, `remove`.
//!
//! # Invariants
//! - Every mutation persists the full resulting set before returning.
//! - A failed save leaves the in-memory set unchanged.
//! - Assigned ids are unique within the set and never reused.

use crate::model::entry::{
    new_entry_id, EntryForm, EntryId, EntryPatch, JournalEntry, NewEntry, MAX_RATING, RATING_STEP,
};
use chrono::NaiveDate;
use crate::repo::entry_repo::{EntryRepository, RepoError, RepoResult};
use log::{info, warn};

/// Where the entry set came from on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    /// No record existed under the storage key.
    Seed,
    /// A record existed but could not be decoded.
    SeedAfterCorruption,
}

/// Explicitly constructed owner of the journal entry set.
pub struct EntryStore<R: EntryRepository> {
    repo: R,
    entries: Vec<JournalEntry>,
}

impl<R: EntryRepository> EntryStore<R> {
    /// Creates an empty store. Call [`EntryStore::load_or_seed`] before use.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            entries: Vec::new(),
        }
    }

    /// Current entry set in insertion order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Loads the persisted set, falling back to `seed` when absent or corrupt.
    ///
    /// Seed entries are normalized like `add`, receive fresh ids and are
    /// persisted immediately.
    ///
    /// # Errors
    /// - Database failures on read or on persisting the seed.
    pub fn load_or_seed(&mut self, seed: Vec<NewEntry>) -> RepoResult<LoadSource> {
        let source = match self.repo.load() {
            Ok(Some(entries)) => {
                info!(
                    "event=store_load module=service status=ok source=persisted count={}",
                    entries.len()
                );
                self.entries = entries;
                return Ok(LoadSource::Persisted);
            }
            Ok(None) => LoadSource::Seed,
            Err(RepoError::InvalidData(message)) => {
                warn!(
                    "event=store_load module=service status=fallback reason=corrupt_record error={message}"
                );
                LoadSource::SeedAfterCorruption
            }
            Err(err) => return Err(err),
        };

        let mut seeded: Vec<JournalEntry> = Vec::with_capacity(seed.len());
        for entry in seed {
            let id = unique_id(&seeded);
            seeded.push(JournalEntry::with_id(id, entry.normalized()));
        }
        self.commit(seeded)?;
        info!(
            "event=store_load module=service status=ok source=seed count={}",
            self.entries.len()
        );
        Ok(source)
    }

    /// Appends a new entry and returns its assigned id.
    ///
    /// The rating is clamped and an empty category list defaults to `General`.
    pub fn add(&mut self, entry: NewEntry) -> RepoResult<EntryId> {
        let id = unique_id(&self.entries);
        let mut next = self.entries.clone();
        next.push(JournalEntry::with_id(id.clone(), entry.normalized()));
        self.commit(next)?;
        info!("event=entry_add module=service status=ok id={id}");
        Ok(id)
    }

    /// Adds an entry from raw create-form input, filling blanks with defaults.
    ///
    /// A missing or malformed date becomes `today`.
    pub fn add_from_form(&mut self, form: EntryForm, today: NaiveDate) -> RepoResult<EntryId> {
        self.add(form.into_new_entry(today))
    }

    /// Raises the rating of `id` by one step, capped at the top of the scale.
    ///
    /// Returns `Ok(false)` without persisting when no entry has that id.
    pub fn bump_rating(&mut self, id: &str) -> RepoResult<bool> {
        let Some(entry) = self.get(id) else {
            info!("event=entry_update module=service status=noop id={id}");
            return Ok(false);
        };
        let rating = (entry.rating + RATING_STEP).min(MAX_RATING);
        self.update(
            id,
            EntryPatch {
                rating: Some(rating),
                ..EntryPatch::default()
            },
        )
    }

    /// Applies `patch` to the entry with `id`.
    ///
    /// Returns `Ok(false)` without persisting when no entry has that id.
    pub fn update(&mut self, id: &str, patch: EntryPatch) -> RepoResult<bool> {
        let Some(position) = self.position(id) else {
            info!("event=entry_update module=service status=noop id={id}");
            return Ok(false);
        };
        let mut next = self.entries.clone();
        next[position].apply(patch);
        self.commit(next)?;
        info!("event=entry_update module=service status=ok id={id}");
        Ok(true)
    }

    /// Removes the entry with `id`.
    ///
    /// Returns `Ok(false)` without persisting when no entry has that id.
    pub fn remove(&mut self, id: &str) -> RepoResult<bool> {
        let Some(position) = self.position(id) else {
            info!("event=entry_remove module=service status=noop id={id}");
            return Ok(false);
        };
        let mut next = self.entries.clone();
        next.remove(position);
        self.commit(next)?;
        info!("event=entry_remove module=service status=ok id={id}");
        Ok(true)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn commit(&mut self, next: Vec<JournalEntry>) -> RepoResult<()> {
        self.repo.save(&next)?;
        self.entries = next;
        Ok(())
    }
}

/// Decodes a seed document: a JSON array of entries without ids.
///
/// # Errors
/// - `RepoError::InvalidData` when the document is not a seed array.
pub fn parse_seed_json(raw: &str) -> RepoResult<Vec<NewEntry>> {
    serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("seed is not an entry array: {err}")))
}

fn unique_id(existing: &[JournalEntry]) -> EntryId {
    loop {
        let id = new_entry_id();
        if existing.iter().all(|entry| entry.id != id) {
            return id;
        }
    }
}
