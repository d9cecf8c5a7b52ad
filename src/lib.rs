// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditSession)
    clippy::module_name_repetitions
)]

//! # Promptpad
//!
//! A terminal prompt composer with template placeholders.
//!
//! Promptpad edits prompt text in the terminal with:
//! - A Unicode-correct buffer with a single cursor
//! - A viewport that keeps the cursor in the middle third of the window
//! - `{{kind:name}}` placeholders that can be found, checked and filled in
//!
//! ## Architecture
//!
//! Promptpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Composer state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Buffer, placeholder index and edit sessions
//! - [`ui`]: Terminal UI components
//! - [`config`]: Persisted command-line defaults
//! - [`perf`]: Timing scopes and debug event log

pub mod app;
pub mod config;
pub mod editor;
pub mod perf;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, update};
    pub use crate::editor::{Buffer, Cursor, Direction, PlaceholderIndex};
    pub use crate::ui::viewport::Viewport;
}
