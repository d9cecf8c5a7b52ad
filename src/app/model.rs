use std::ops::Range;

use unicode_width::UnicodeWidthChar;

use crate::editor::{
    Buffer, BufferError, Cursor, EditSession, Placeholder, PlaceholderIndex, ValidationIssue,
};
use crate::ui::viewport::Viewport;

/// Default number of spaces inserted by [`Message::InsertTab`](super::Message::InsertTab).
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// The complete composer state.
///
/// All state lives here - no global or scattered state. The buffer, the
/// placeholder index and the edit session are only changed through
/// [`update`](super::update), which keeps them consistent with each other.
pub struct Model {
    /// Viewport managing scroll position
    pub viewport: Viewport,
    /// Whether content edits are rejected
    pub read_only: bool,
    /// Whether placeholder navigation wraps around at either end
    pub wrap_navigation: bool,
    /// Spaces inserted for a tab
    pub tab_width: usize,
    /// Whether the app should quit
    pub should_quit: bool,
    pub(super) buffer: Buffer,
    pub(super) placeholders: PlaceholderIndex,
    pub(super) session: EditSession,
    pub(super) last_error: Option<BufferError>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("buffer", &self.buffer)
            .field("viewport", &self.viewport)
            .field("placeholders", &self.placeholders.len())
            .field("session", &self.session)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model for `text` in a terminal of `terminal_size`.
    ///
    /// One terminal row is reserved for the status bar.
    pub fn new(text: &str, terminal_size: (u16, u16)) -> Self {
        let buffer = Buffer::from_text(text);
        let placeholders = PlaceholderIndex::from_content(text);
        let viewport = Viewport::new(
            terminal_size.0,
            terminal_size.1.saturating_sub(1),
            buffer.line_count(),
        );
        let mut model = Self {
            viewport,
            read_only: false,
            wrap_navigation: true,
            tab_width: DEFAULT_TAB_WIDTH,
            should_quit: false,
            buffer,
            placeholders,
            session: EditSession::Inactive,
            last_error: None,
        };
        model.follow_cursor();
        model
    }

    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub const fn with_wrap_navigation(mut self, wrap: bool) -> Self {
        self.wrap_navigation = wrap;
        self
    }

    pub const fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    // --- Queries ---

    /// The full text content.
    pub fn content(&self) -> String {
        self.buffer.text()
    }

    pub const fn cursor(&self) -> Cursor {
        self.buffer.cursor()
    }

    pub fn char_count(&self) -> usize {
        self.buffer.char_count()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Read access to the underlying buffer.
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Line indices currently inside the viewport.
    pub fn visible_range(&self) -> Range<usize> {
        self.viewport.visible_range()
    }

    /// Text of the lines currently inside the viewport.
    pub fn visible_lines(&self) -> Vec<String> {
        self.buffer.lines(self.visible_range())
    }

    /// Cursor position relative to the viewport as `(x, y)` cells.
    ///
    /// `x` is a display width, so wide characters count as two cells.
    /// Returns `None` when the cursor is scrolled out of view.
    pub fn cursor_screen_position(&self) -> Option<(u16, u16)> {
        let Cursor { line, col } = self.cursor();
        let top = self.viewport.offset();
        let left = self.viewport.left_column();
        if line < top || col < left {
            return None;
        }
        let y = line - top;
        if y >= self.viewport.height() as usize {
            return None;
        }
        let text = self.buffer.line_at(line)?;
        let x: usize = text
            .chars()
            .skip(left)
            .take(col - left)
            .map(|ch| ch.width().unwrap_or(0))
            .sum();
        Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        self.placeholders.placeholders()
    }

    pub fn active_placeholder(&self) -> Option<&Placeholder> {
        self.placeholders.active()
    }

    pub fn validation_issues(&self) -> &[ValidationIssue] {
        self.placeholders.issues()
    }

    pub const fn is_editing_placeholder(&self) -> bool {
        self.session.is_editing()
    }

    /// Index of the placeholder being edited, if any.
    pub const fn editing_target(&self) -> Option<usize> {
        self.session.target()
    }

    pub fn draft_value(&self) -> Option<&str> {
        self.session.draft()
    }

    /// Error raised by the most recent message, if any.
    pub const fn last_error(&self) -> Option<&BufferError> {
        self.last_error.as_ref()
    }

    /// Whether the cursor sits inside the active placeholder's span.
    pub fn cursor_on_active_placeholder(&self) -> bool {
        let pos = self.buffer.absolute_position();
        self.placeholders
            .active()
            .is_some_and(|ph| ph.span.contains(pos))
    }

    // --- Derived state ---

    /// Re-derive everything that depends on content.
    pub(super) fn content_changed(&mut self) {
        self.placeholders.refresh(&self.buffer.text());
        self.follow_cursor();
    }

    /// Scroll the viewport so the cursor stays visible.
    pub(super) fn follow_cursor(&mut self) {
        self.viewport.set_total_lines(self.buffer.line_count());
        let cursor = self.buffer.cursor();
        self.viewport.adjust(cursor.line);
        match self.buffer.line_at(cursor.line) {
            Some(text) => self.viewport.adjust_horizontal_for_line(&text, cursor.col),
            None => self.viewport.adjust_horizontal(cursor.col),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24))
    }
}
