//! Calendar surface composition.
//!
//! # Responsibility
//! - Compose the window controller, date math, entry index and visibility
//!   tracking into the scroll region consumed by a UI shell.
//! - Route keyboard commands through the controller.

pub mod calendar;
pub mod keyboard;
