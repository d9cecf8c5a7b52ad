//! Composer state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete composer state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use model::{DEFAULT_TAB_WIDTH, Model};
pub use update::{Message, update};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    text: String,
    read_only: bool,
    wrap_navigation: bool,
    tab_width: usize,
    final_text: Option<String>,
}

impl App {
    /// Create a new application editing `text`.
    pub const fn new(text: String) -> Self {
        Self {
            text,
            read_only: false,
            wrap_navigation: true,
            tab_width: DEFAULT_TAB_WIDTH,
            final_text: None,
        }
    }

    /// Reject content edits.
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Whether Tab/Shift-Tab wrap around at the last/first placeholder.
    pub const fn with_wrap_navigation(mut self, wrap: bool) -> Self {
        self.wrap_navigation = wrap;
        self
    }

    /// Number of spaces a tab inserts.
    pub const fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// Content of the composer when [`run`](Self::run) returned.
    pub fn final_text(&self) -> Option<&str> {
        self.final_text.as_deref()
    }
}

#[cfg(test)]
mod tests;
