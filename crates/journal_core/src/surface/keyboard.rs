//! Keyboard commands understood by the calendar surface.

/// Scroll-region commands produced by the shell from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    RowDown,
    RowUp,
    PageDown,
    PageUp,
    NextMonth,
    PreviousMonth,
    Today,
}

impl KeyCommand {
    /// Maps a DOM-style key name to a command.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowDown" => Some(Self::RowDown),
            "ArrowUp" => Some(Self::RowUp),
            "PageDown" => Some(Self::PageDown),
            "PageUp" => Some(Self::PageUp),
            "ArrowRight" => Some(Self::NextMonth),
            "ArrowLeft" => Some(Self::PreviousMonth),
            "Home" => Some(Self::Today),
            _ => None,
        }
    }
}

/// Commands understood by the open entry detail surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalCommand {
    Close,
    Next,
    Previous,
}

impl ModalCommand {
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Escape" => Some(Self::Close),
            "ArrowRight" => Some(Self::Next),
            "ArrowLeft" => Some(Self::Previous),
            _ => None,
        }
    }
}

/// Where keyboard focus currently sits in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFocus {
    #[default]
    ScrollRegion,
    /// A text input, textarea or editable element.
    TextInput,
}

/// Host scroll action produced by a keyboard command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAction {
    /// Relative smooth scroll by `delta` pixels.
    By { delta: f64 },
    /// Absolute smooth scroll to `top`.
    To { top: f64 },
}
