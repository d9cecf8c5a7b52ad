//! Text-editing core of the composer.
//!
//! Provides a rope-backed text buffer with cursor management, the
//! placeholder index derived from its content, and the edit session that
//! fills placeholders in, designed for integration into the TEA
//! architecture.

mod buffer;
mod placeholder;
mod session;

pub use buffer::{Buffer, BufferError, Cursor, Direction};
pub use placeholder::{
    IssueKind, Placeholder, PlaceholderIndex, PlaceholderKind, PlaceholderValue, Span,
    ValidationIssue, validate,
};
pub use session::{EditSession, fill_list};
