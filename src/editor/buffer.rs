use std::ops::Range;

use ropey::Rope;
use thiserror::Error;

/// Cursor position in the composer buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (code-point offset within the line).
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self { line: 0, col: 0 }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Errors reported by [`Buffer`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("line {line} out of bounds (0-{max_line})")]
    LineOutOfBounds { line: usize, max_line: usize },
    #[error("column {col} out of bounds for line {line} (0-{max_col})")]
    ColumnOutOfBounds {
        line: usize,
        col: usize,
        max_col: usize,
    },
    #[error("cursor at invalid position ({line}, {col})")]
    InvalidCursor { line: usize, col: usize },
}

/// A text buffer backed by a rope data structure.
///
/// Columns and absolute positions count Unicode code points, never bytes.
/// Lines are separated by `'\n'` only; an empty buffer has exactly one
/// empty line. Every operation leaves the cursor on an existing line with
/// a column no greater than that line's length.
pub struct Buffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
}

impl Buffer {
    /// Create a new buffer from a string, cursor at the origin.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation or the last
    /// [`mark_clean`](Self::mark_clean).
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after the host persisted it).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of code points in the buffer.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let len = self.line_len(line_idx);
        Some(line.slice(..len).to_string())
    }

    /// Length of a line in code points (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Lines in `range`, clamped to the buffer.
    pub fn lines(&self, range: Range<usize>) -> Vec<String> {
        let end = range.end.min(self.line_count());
        (range.start.min(end)..end)
            .filter_map(|idx| self.line_at(idx))
            .collect()
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Absolute offset of the first code point of a line.
    ///
    /// Lines past the end resolve to the end of the content.
    pub fn line_start(&self, line_idx: usize) -> usize {
        if line_idx >= self.line_count() {
            return self.char_count();
        }
        self.rope.line_to_char(line_idx)
    }

    /// Insert a code point at the cursor position.
    ///
    /// A `'\n'` splits the line like [`insert_newline`](Self::insert_newline).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidCursor`] if the cursor no longer
    /// addresses a valid position; the buffer is left untouched.
    pub fn insert_char(&mut self, ch: char) -> Result<(), BufferError> {
        let char_idx = self.cursor_char_idx()?;
        self.rope.insert_char(char_idx, ch);
        if ch == '\n' {
            self.cursor = Cursor::at(self.cursor.line + 1, 0);
        } else {
            self.cursor.col += 1;
        }
        self.dirty = true;
        Ok(())
    }

    /// Insert a string at the cursor position, leaving the cursor after it.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidCursor`] if the cursor is invalid.
    pub fn insert_str(&mut self, s: &str) -> Result<(), BufferError> {
        if s.is_empty() {
            return Ok(());
        }
        let char_idx = self.cursor_char_idx()?;
        self.rope.insert(char_idx, s);
        self.cursor = self.position_from_absolute(char_idx + s.chars().count());
        self.dirty = true;
        Ok(())
    }

    /// Split the current line at the cursor (Enter key).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidCursor`] if the cursor is invalid.
    pub fn insert_newline(&mut self) -> Result<(), BufferError> {
        self.insert_char('\n')
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn backspace(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }
        let Ok(char_idx) = self.cursor_char_idx() else {
            return false;
        };

        if self.cursor.col == 0 {
            // Join with previous line
            let prev_line_len = self.line_len(self.cursor.line - 1);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor = Cursor::at(self.cursor.line - 1, prev_line_len);
        } else {
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.col -= 1;
        }
        self.dirty = true;
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col >= line_len && self.cursor.line + 1 >= self.line_count() {
            return false;
        }
        let Ok(char_idx) = self.cursor_char_idx() else {
            return false;
        };

        self.rope.remove(char_idx..=char_idx);
        self.dirty = true;
        true
    }

    /// Replace the code points in `range` with `text`.
    ///
    /// The range is clamped to the content; the cursor ends up right after
    /// the inserted text.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let total = self.char_count();
        let end = range.end.min(total);
        let start = range.start.min(end);
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.cursor = self.position_from_absolute(start + text.chars().count());
        self.dirty = true;
    }

    /// Replace the whole content, clamping the cursor into the new text.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        let Cursor { line, col } = self.cursor;
        self.move_to(line, col);
        self.dirty = true;
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_to_line_start(&mut self) {
        self.cursor.col = 0;
    }

    /// Move cursor to the end of the line (End).
    pub fn move_to_line_end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.line);
    }

    /// Move cursor to a specific line and column, clamping both.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        let line = line.min(max_line);
        self.cursor = Cursor::at(line, col.min(self.line_len(line)));
    }

    /// Jump the cursor to an exact position.
    ///
    /// # Errors
    ///
    /// Returns an out-of-bounds error when `line` or `col` violates the
    /// cursor invariants. The cursor does not move in that case.
    pub fn set_cursor(&mut self, line: usize, col: usize) -> Result<(), BufferError> {
        let line_count = self.line_count();
        if line >= line_count {
            return Err(BufferError::LineOutOfBounds {
                line,
                max_line: line_count - 1,
            });
        }
        let max_col = self.line_len(line);
        if col > max_col {
            return Err(BufferError::ColumnOutOfBounds { line, col, max_col });
        }
        self.cursor = Cursor::at(line, col);
        Ok(())
    }

    /// The cursor as a flattened code-point offset.
    ///
    /// Each line break counts as one position.
    pub fn absolute_position(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    /// Convert a flattened offset into a cursor position.
    ///
    /// Offsets past the end of the content resolve to the end.
    pub fn position_from_absolute(&self, pos: usize) -> Cursor {
        let pos = pos.min(self.char_count());
        let line = self.rope.char_to_line(pos);
        Cursor::at(line, pos - self.rope.line_to_char(line))
    }

    /// Move the cursor to a flattened offset (clamped to the content).
    pub fn set_cursor_absolute(&mut self, pos: usize) {
        self.cursor = self.position_from_absolute(pos);
    }

    // --- Private helpers ---

    /// Convert cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> Result<usize, BufferError> {
        let Cursor { line, col } = self.cursor;
        if line >= self.line_count() || col > self.line_len(line) {
            return Err(BufferError::InvalidCursor { line, col });
        }
        Ok(self.rope.line_to_char(line) + col)
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.line_len(self.cursor.line);
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.col += 1;
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor = Cursor::at(self.cursor.line + 1, 0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.line));
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.line));
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish()
    }
}
