//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory entry set and route every mutation through persistence.
//! - Keep UI shells decoupled from storage details.

pub mod entry_store;
