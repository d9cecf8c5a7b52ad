use crate::app::Model;
use crate::editor::{Direction, fill_list};

/// All possible events and actions in the composer.
///
/// These represent user input, system events, and host commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert a string at the cursor (paste)
    InsertText(String),
    /// Split line at cursor (Enter)
    InsertNewline,
    /// Insert `tab_width` spaces
    InsertTab,
    /// Delete character before cursor (Backspace)
    Backspace,
    /// Delete character at cursor (Delete)
    DeleteForward,

    // Cursor
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveToLineStart,
    /// Move cursor to end of line (End)
    MoveToLineEnd,
    /// Move cursor to an exact (line, col); rejected when out of bounds
    SetCursor(usize, usize),

    // Placeholders
    /// Activate the next placeholder after the cursor
    NavigateNext,
    /// Activate the previous placeholder before the cursor
    NavigatePrevious,
    /// Start editing the active placeholder
    EnterEdit,
    /// Add a character to the draft value
    EditAppend(char),
    /// Remove the last character of the draft value
    EditBackspace,
    /// Close the edit session, writing the draft when `commit` is set
    ExitEdit { commit: bool },
    /// Replace the active list placeholder with bullet items
    FillList(Vec<String>),

    // Document
    /// Replace the whole content
    SetContent(String),
    /// Toggle read-only mode
    SetReadOnly(bool),

    // Window
    /// Terminal resized to (cols, rows)
    Resize(u16, u16),
    /// Quit the application
    Quit,
}

impl Message {
    /// Whether the message changes content (or a draft that becomes content).
    const fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertText(_)
                | Self::InsertNewline
                | Self::InsertTab
                | Self::Backspace
                | Self::DeleteForward
                | Self::EnterEdit
                | Self::EditAppend(_)
                | Self::EditBackspace
                | Self::FillList(_)
        )
    }
}

/// Apply a message to the model, returning the new state.
///
/// While a placeholder edit session is open, typing goes to the draft
/// value and every other content or cursor message is ignored.
pub fn update(mut model: Model, msg: Message) -> Model {
    model.last_error = None;

    if model.read_only && msg.is_edit() {
        tracing::trace!(?msg, "ignored in read-only mode");
        return model;
    }

    if model.session.is_editing() {
        return update_editing(model, msg);
    }

    match msg {
        // Editing
        Message::InsertChar(ch) => {
            if let Err(err) = model.buffer.insert_char(ch) {
                tracing::warn!(%err, "insert failed");
                model.last_error = Some(err);
            }
            model.content_changed();
        }
        Message::InsertText(text) => {
            if let Err(err) = model.buffer.insert_str(&text) {
                tracing::warn!(%err, "insert failed");
                model.last_error = Some(err);
            }
            model.content_changed();
        }
        Message::InsertNewline => {
            if let Err(err) = model.buffer.insert_newline() {
                tracing::warn!(%err, "newline failed");
                model.last_error = Some(err);
            }
            model.content_changed();
        }
        Message::InsertTab => {
            let spaces = " ".repeat(model.tab_width);
            if let Err(err) = model.buffer.insert_str(&spaces) {
                tracing::warn!(%err, "tab insert failed");
                model.last_error = Some(err);
            }
            model.content_changed();
        }
        Message::Backspace => {
            if model.buffer.backspace() {
                model.content_changed();
            }
        }
        Message::DeleteForward => {
            if model.buffer.delete_forward() {
                model.content_changed();
            }
        }

        // Cursor
        Message::MoveCursor(direction) => {
            model.buffer.move_cursor(direction);
            model.follow_cursor();
        }
        Message::MoveToLineStart => {
            model.buffer.move_to_line_start();
            model.follow_cursor();
        }
        Message::MoveToLineEnd => {
            model.buffer.move_to_line_end();
            model.follow_cursor();
        }
        Message::SetCursor(line, col) => match model.buffer.set_cursor(line, col) {
            Ok(()) => model.follow_cursor(),
            Err(err) => {
                tracing::warn!(%err, "cursor move rejected");
                model.last_error = Some(err);
            }
        },

        // Placeholders
        Message::NavigateNext => navigate(&mut model, true),
        Message::NavigatePrevious => navigate(&mut model, false),
        Message::EnterEdit => {
            let pos = model.buffer.absolute_position();
            let target = model
                .placeholders
                .active_index()
                .or_else(|| model.placeholders.at(pos));
            if let Some(index) = target
                && model
                    .session
                    .enter(index, &mut model.buffer, &mut model.placeholders)
            {
                model.follow_cursor();
            }
        }
        Message::FillList(items) => {
            if fill_list(items, &mut model.buffer, &mut model.placeholders).is_some() {
                model.follow_cursor();
            }
        }
        other @ (Message::EditAppend(_) | Message::EditBackspace | Message::ExitEdit { .. }) => {
            tracing::trace!(msg = ?other, "no edit session open");
        }

        // Document
        Message::SetContent(text) => {
            model.buffer.set_text(&text);
            model.content_changed();
        }
        Message::SetReadOnly(read_only) => {
            model.read_only = read_only;
        }

        // Window
        Message::Resize(width, height) => resize(&mut model, width, height),
        Message::Quit => {
            model.should_quit = true;
        }
    }

    model
}

/// Handle a message while a placeholder edit session is open.
fn update_editing(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::InsertChar(ch) | Message::EditAppend(ch) => model.session.append(ch),
        Message::Backspace | Message::DeleteForward | Message::EditBackspace => {
            model.session.backspace();
        }
        Message::ExitEdit { commit } => {
            // A session left open across SetReadOnly(true) must not write.
            let commit = commit && !model.read_only;
            let committed = model
                .session
                .exit(commit, &mut model.buffer, &mut model.placeholders);
            if let Some(ph) = committed {
                tracing::debug!(name = %ph.name, "placeholder filled");
            }
            model.follow_cursor();
        }
        Message::SetContent(text) => {
            model.session = crate::editor::EditSession::Inactive;
            model.buffer.set_text(&text);
            model.content_changed();
        }
        Message::SetReadOnly(read_only) => model.read_only = read_only,
        Message::Resize(width, height) => resize(&mut model, width, height),
        Message::Quit => model.should_quit = true,
        other => tracing::trace!(msg = ?other, "ignored during placeholder edit"),
    }
    model
}

/// Activate the next or previous placeholder and jump to its start.
fn navigate(model: &mut Model, forward: bool) {
    let index = &model.placeholders;
    if index.is_empty() {
        return;
    }
    let pos = model.buffer.absolute_position();
    let found = if forward {
        index.next(pos)
    } else {
        index.previous(pos)
    };
    let target = match found {
        Some(i) => i,
        None if model.wrap_navigation && forward => 0,
        None if model.wrap_navigation => index.len() - 1,
        None => return,
    };
    let Some(start) = index.get(target).map(|ph| ph.span.start) else {
        return;
    };
    model.placeholders.activate(target);
    model.buffer.set_cursor_absolute(start);
    model.follow_cursor();
}

fn resize(model: &mut Model, width: u16, height: u16) {
    model.viewport.resize(width, height.saturating_sub(1));
    model.follow_cursor();
}
