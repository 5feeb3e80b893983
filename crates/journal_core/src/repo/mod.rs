//! Persistence collaborator for the journal entry set.
//!
//! # Responsibility
//! - Define the load/save contract the entry store depends on.
//! - Keep SQLite and JSON encoding details out of the store.
//!
//! # Invariants
//! - The whole entry set is read and written as one record.
//! - A record that cannot be decoded surfaces as `RepoError::InvalidData`.

pub mod entry_repo;
