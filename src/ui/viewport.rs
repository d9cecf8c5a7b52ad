//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks the visible window of the composer and
//! follows the cursor as it moves.

use std::ops::Range;

use unicode_width::UnicodeWidthChar;

/// Manages the visible portion of the buffer.
///
/// The viewport tracks:
/// - Window dimensions (width in columns, height in lines)
/// - Current offset (top line and left column)
/// - Total buffer length in lines
///
/// # Example
///
/// ```
/// use promptpad::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 9, 100);
/// assert_eq!(vp.visible_range(), 0..9);
///
/// // Moving past the lower third scrolls the window.
/// vp.adjust(10);
/// assert_eq!(vp.visible_range(), 4..13);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    left: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Editor width in columns
    /// * `height` - Editor height in lines
    /// * `total_lines` - Total lines in the buffer
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            left: 0,
            total_lines,
        }
    }

    /// Index of the first visible line.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// First visible column (code-point offset).
    pub const fn left_column(&self) -> usize {
        self.left
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Get the range of visible lines.
    ///
    /// Returns a range from the current offset to offset + height,
    /// clamped to the buffer bounds.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// Get the scroll percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }

        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset.min(max_offset) as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    /// Scroll so that `cursor_line` sits in the middle third of the window.
    ///
    /// The window only moves once the cursor leaves the middle third. The
    /// cursor line is always inside the window afterwards, and the window
    /// does not run past the end of the buffer unless the cursor needs it
    /// to. A zero-height window is left alone.
    pub fn adjust(&mut self, cursor_line: usize) {
        let rows = self.height as usize;
        if rows == 0 {
            return;
        }
        let third = rows / 3;

        if cursor_line < self.offset + third {
            self.offset = cursor_line.saturating_sub(third);
        } else if cursor_line > self.offset + rows - third {
            self.offset = (cursor_line + third).saturating_sub(rows);
        }

        // With fewer than three rows the thirds are empty.
        if cursor_line < self.offset {
            self.offset = cursor_line;
        } else if cursor_line >= self.offset + rows {
            self.offset = cursor_line + 1 - rows;
        }

        let lowest = (cursor_line + 1).saturating_sub(rows);
        self.offset = self.offset.min(self.max_offset().max(lowest));
    }

    /// Scroll horizontally just enough to keep `cursor_col` visible.
    pub const fn adjust_horizontal(&mut self, cursor_col: usize) {
        let cols = self.width as usize;
        if cols == 0 {
            return;
        }
        if cursor_col < self.left {
            self.left = cursor_col;
        } else if cursor_col >= self.left + cols {
            self.left = cursor_col + 1 - cols;
        }
    }

    /// Scroll horizontally so the cursor cell on `line` fits in the window.
    ///
    /// `left_column` stays a code-point index, but the room it leaves is
    /// measured in terminal cells, so wide characters scroll sooner.
    pub fn adjust_horizontal_for_line(&mut self, line: &str, cursor_col: usize) {
        let cols = self.width as usize;
        if cols == 0 {
            return;
        }
        if cursor_col < self.left {
            self.left = cursor_col;
            return;
        }
        let widths: Vec<usize> = line.chars().map(|ch| ch.width().unwrap_or(0)).collect();
        let cursor_width = widths.get(cursor_col).copied().unwrap_or(1).max(1);
        let mut used: usize = widths
            .iter()
            .take(cursor_col)
            .skip(self.left)
            .sum();
        while self.left < cursor_col && used + cursor_width > cols {
            used -= widths.get(self.left).copied().unwrap_or(0);
            self.left += 1;
        }
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        // Clamp offset if buffer is now shorter than viewport
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the total number of lines (e.g., after an edit).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Calculate the maximum valid offset.
    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
