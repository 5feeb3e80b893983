//! Virtualized month window.
//!
//! # Responsibility
//! - Track which month panels are mounted and extend/prune them at the edges.
//! - Keep the visual scroll position stable across prepends and removals.
//! - Pick the most visible mounted panel for the header.

pub mod controller;
pub mod visibility;
