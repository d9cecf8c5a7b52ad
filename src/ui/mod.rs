//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - the composer view and status bar, drawn with ratatui

pub mod viewport;

mod render;
mod status;

pub use render::render;
pub use status::status_text;
