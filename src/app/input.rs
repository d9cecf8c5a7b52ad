use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Message, Model};
use crate::editor::Direction;

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => Some(Message::InsertText(text.clone())),
            Event::Resize(w, h) => {
                crate::perf::record(&crate::perf::TraceEvent::Resize {
                    width: *w,
                    height: *h,
                });
                Some(Message::Resize(*w, *h))
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            return Some(Message::Quit);
        }

        // Both confirm and cancel keep the draft.
        if model.is_editing_placeholder() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Message::ExitEdit { commit: true }),
                KeyCode::Backspace => Some(Message::EditBackspace),
                KeyCode::Char(c) if !ctrl && !alt => Some(Message::EditAppend(c)),
                _ => None,
            };
        }

        match key.code {
            // Cursor
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Home => Some(Message::MoveToLineStart),
            KeyCode::End => Some(Message::MoveToLineEnd),

            // Placeholders
            KeyCode::Tab if model.placeholders().is_empty() => Some(Message::InsertTab),
            KeyCode::Tab => Some(Message::NavigateNext),
            KeyCode::BackTab => Some(Message::NavigatePrevious),
            KeyCode::Char('i') if !ctrl && !alt && model.cursor_on_active_placeholder() => {
                Some(Message::EnterEdit)
            }

            // Editing
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Backspace => Some(Message::Backspace),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::InsertChar(c)),

            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.is_editing_placeholder() {
            return None;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let (line, col) = buffer_position_for_cell(model, mouse.column, mouse.row)?;
                Some(Message::SetCursor(line, col))
            }
            MouseEventKind::ScrollUp => Some(Message::MoveCursor(Direction::Up)),
            MouseEventKind::ScrollDown => Some(Message::MoveCursor(Direction::Down)),
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Map a terminal cell in the editor area to a buffer position.
///
/// Clicks past the end of a line land on the line end; clicks below the
/// last line land on the last line.
fn buffer_position_for_cell(model: &Model, x: u16, y: u16) -> Option<(usize, usize)> {
    if y >= model.viewport.height() {
        return None;
    }
    let last_line = model.line_count().saturating_sub(1);
    let line = (model.viewport.offset() + y as usize).min(last_line);
    let text = model.buffer().line_at(line)?;

    let left = model.viewport.left_column();
    let mut col = left;
    let mut width = 0usize;
    for ch in text.chars().skip(left) {
        let w = ch.width().unwrap_or(0);
        if width + w > x as usize {
            break;
        }
        width += w;
        col += 1;
    }
    Some((line, col.min(text.chars().count())))
}
