//! Entry repository contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Load and save the full entry sequence under a fixed storage key.
//! - Encode the sequence as a JSON array of entry records.
//!
//! # Invariants
//! - `save` replaces the stored record atomically.
//! - `load` returns `Ok(None)` only when no record exists under the key.

use crate::db::DbError;
use crate::model::entry::JournalEntry;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized entry sequence.
pub const ENTRIES_STORAGE_KEY: &str = "journal.entries.v1";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for the entry record.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode journal entries: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted journal data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Load/save contract for the persisted entry sequence.
pub trait EntryRepository {
    fn load(&self) -> RepoResult<Option<Vec<JournalEntry>>>;
    fn save(&self, entries: &[JournalEntry]) -> RepoResult<()>;
}

impl<R: EntryRepository + ?Sized> EntryRepository for &R {
    fn load(&self) -> RepoResult<Option<Vec<JournalEntry>>> {
        (**self).load()
    }

    fn save(&self, entries: &[JournalEntry]) -> RepoResult<()> {
        (**self).save(entries)
    }
}

/// SQLite-backed entry repository over the `kv_store` table.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
    key: &'static str,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            key: ENTRIES_STORAGE_KEY,
        }
    }

    /// Returns the raw stored record, if any.
    pub fn load_raw(&self) -> RepoResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    /// Replaces the raw stored record without decoding it.
    pub fn save_raw(&self, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.key, value],
        )?;
        Ok(())
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn load(&self) -> RepoResult<Option<Vec<JournalEntry>>> {
        let Some(raw) = self.load_raw()? else {
            return Ok(None);
        };
        decode_entries(&raw).map(Some)
    }

    fn save(&self, entries: &[JournalEntry]) -> RepoResult<()> {
        let encoded = serde_json::to_string(entries).map_err(RepoError::Serialize)?;
        self.save_raw(&encoded)
    }
}

/// Decodes a stored JSON record into entries.
pub fn decode_entries(raw: &str) -> RepoResult<Vec<JournalEntry>> {
    serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("record is not an entry array: {err}")))
}
