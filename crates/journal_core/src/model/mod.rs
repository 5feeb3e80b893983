//! Journal domain model.
//!
//! # Responsibility
//! - Define the entry record persisted under the journal storage key.
//! - Define create/edit payloads and their input sanitization.
//!
//! # Invariants
//! - Every stored entry is identified by a stable, never reused `EntryId`.

pub mod entry;
