use crate::editor::{BufferError, Cursor, Direction, PlaceholderKind};

use super::{Message, Model, update};

fn create_test_model(text: &str) -> Model {
    Model::new(text, (80, 24))
}

fn create_long_test_model() -> Model {
    let text = (1..=100)
        .map(|i| format!("Line {i} of content."))
        .collect::<Vec<_>>()
        .join("\n");
    Model::new(&text, (80, 10))
}

fn apply(model: Model, msgs: impl IntoIterator<Item = Message>) -> Model {
    msgs.into_iter().fold(model, update)
}

fn type_str(model: Model, text: &str) -> Model {
    apply(model, text.chars().map(Message::InsertChar))
}

// --- Editing ---

#[test]
fn test_typing_into_empty_model() {
    let model = type_str(create_test_model(""), "abc");
    assert_eq!(model.content(), "abc");
    assert_eq!(model.cursor(), Cursor::at(0, 3));
    assert_eq!(model.char_count(), 3);
    assert!(model.is_dirty());
}

#[test]
fn test_newline_splits_line() {
    let model = apply(
        create_test_model("ab"),
        [Message::MoveCursor(Direction::Right), Message::InsertNewline],
    );
    assert_eq!(model.content(), "a\nb");
    assert_eq!(model.cursor(), Cursor::at(1, 0));
    assert_eq!(model.line_count(), 2);
}

#[test]
fn test_backspace_and_delete_forward() {
    let model = apply(
        create_test_model("abc"),
        [
            Message::MoveToLineEnd,
            Message::Backspace,
            Message::MoveToLineStart,
            Message::DeleteForward,
        ],
    );
    assert_eq!(model.content(), "b");
}

#[test]
fn test_backspace_at_origin_leaves_model_clean() {
    let model = update(create_test_model("abc"), Message::Backspace);
    assert_eq!(model.content(), "abc");
    assert!(!model.is_dirty());
}

#[test]
fn test_insert_text_and_tab() {
    let model = apply(
        create_test_model("").with_tab_width(2),
        [Message::InsertTab, Message::InsertText("x\ny".to_string())],
    );
    assert_eq!(model.content(), "  x\ny");
    assert_eq!(model.cursor(), Cursor::at(1, 1));
}

#[test]
fn test_typing_placeholder_syntax_indexes_it() {
    let model = type_str(create_test_model(""), "Hi {{text:who}}");
    assert_eq!(model.placeholders().len(), 1);
    assert_eq!(model.placeholders()[0].name, "who");
}

#[test]
fn test_set_content_replaces_text_and_reindexes() {
    let model = apply(
        create_test_model("old"),
        [
            Message::MoveToLineEnd,
            Message::SetContent("{{list:a}}\n{{text:b}}".to_string()),
        ],
    );
    assert_eq!(model.placeholders().len(), 2);
    assert_eq!(model.cursor(), Cursor::at(0, 3));
}

// --- Cursor ---

#[test]
fn test_move_right_wraps_to_next_line() {
    let model = apply(
        create_test_model("hello\nworld"),
        [Message::MoveToLineEnd, Message::MoveCursor(Direction::Right)],
    );
    assert_eq!(model.cursor(), Cursor::at(1, 0));

    let model = apply(
        create_test_model("hello"),
        [Message::MoveToLineEnd, Message::MoveCursor(Direction::Right)],
    );
    assert_eq!(model.cursor(), Cursor::at(0, 5));
}

#[test]
fn test_set_cursor_out_of_bounds_reports_error() {
    let model = update(create_test_model("ab\ncd"), Message::SetCursor(5, 0));
    assert_eq!(
        model.last_error(),
        Some(&BufferError::LineOutOfBounds {
            line: 5,
            max_line: 1
        })
    );
    assert_eq!(model.cursor(), Cursor::at(0, 0));

    let model = update(model, Message::SetCursor(1, 3));
    assert!(matches!(
        model.last_error(),
        Some(BufferError::ColumnOutOfBounds { .. })
    ));
}

#[test]
fn test_last_error_clears_on_next_message() {
    let model = apply(
        create_test_model("ab"),
        [
            Message::SetCursor(1, 0),
            Message::MoveCursor(Direction::Right),
        ],
    );
    assert!(model.last_error().is_none());
}

#[test]
fn test_cursor_movement_scrolls_viewport() {
    let model = update(create_long_test_model(), Message::SetCursor(50, 0));
    let range = model.visible_range();
    assert!(range.contains(&50));
    assert_eq!(model.visible_lines()[50 - range.start], "Line 51 of content.");
}

#[test]
fn test_cursor_screen_position_counts_display_width() {
    let model = apply(
        create_test_model("\u{4F60}\u{597D}ab"),
        [Message::MoveToLineEnd],
    );
    assert_eq!(model.cursor_screen_position(), Some((6, 0)));
}

#[test]
fn test_wide_line_scrolls_cursor_into_view() {
    let model = apply(
        create_test_model(&"\u{4F60}".repeat(60)),
        [Message::MoveToLineEnd],
    );
    let (x, y) = model.cursor_screen_position().unwrap();
    assert!(x < 80, "cursor column {x} is off-screen");
    assert_eq!(y, 0);
    assert_eq!(model.viewport.left_column(), 21);
}

#[test]
fn test_resize_keeps_cursor_visible() {
    let model = apply(
        create_long_test_model(),
        [Message::SetCursor(60, 0), Message::Resize(80, 4)],
    );
    assert_eq!(model.viewport.height(), 3);
    assert!(model.visible_range().contains(&60));
    let (_, y) = model.cursor_screen_position().unwrap();
    assert!(y < 3);
}

// --- Placeholder navigation ---

#[test]
fn test_navigate_next_activates_and_jumps() {
    let model = update(
        create_test_model("Dear {{text:name}}, re {{text:topic}}"),
        Message::NavigateNext,
    );
    let active = model.active_placeholder().unwrap();
    assert_eq!(active.name, "name");
    assert_eq!(model.cursor(), Cursor::at(0, 5));

    let model = update(model, Message::NavigateNext);
    assert_eq!(model.active_placeholder().unwrap().name, "topic");
    assert_eq!(model.placeholders().iter().filter(|p| p.active).count(), 1);
}

#[test]
fn test_navigate_next_wraps_to_first() {
    let model = apply(
        create_test_model("{{text:a}} {{text:b}}"),
        [Message::NavigateNext, Message::NavigateNext],
    );
    // The first Tab from (0,0) skips the slot starting under the cursor.
    assert_eq!(model.active_placeholder().unwrap().name, "a");
    assert_eq!(model.cursor(), Cursor::at(0, 0));
}

#[test]
fn test_navigate_previous_wraps_to_last() {
    let model = update(
        create_test_model("{{text:a}} {{text:b}}"),
        Message::NavigatePrevious,
    );
    assert_eq!(model.active_placeholder().unwrap().name, "b");
    assert_eq!(model.cursor(), Cursor::at(0, 11));

    let model = update(model, Message::NavigatePrevious);
    assert_eq!(model.active_placeholder().unwrap().name, "a");
}

#[test]
fn test_navigation_without_wrap_stops_at_ends() {
    let model = apply(
        create_test_model("{{text:a}} {{text:b}}").with_wrap_navigation(false),
        [Message::NavigateNext, Message::NavigateNext],
    );
    assert_eq!(model.active_placeholder().unwrap().name, "b");
    assert_eq!(model.cursor(), Cursor::at(0, 11));

    let model = update(
        create_test_model("{{text:a}}").with_wrap_navigation(false),
        Message::NavigatePrevious,
    );
    assert!(model.active_placeholder().is_none());
}

#[test]
fn test_navigation_with_no_placeholders_is_noop() {
    let model = update(create_test_model("plain"), Message::NavigateNext);
    assert!(model.active_placeholder().is_none());
    assert_eq!(model.cursor(), Cursor::at(0, 0));
}

// --- Placeholder editing ---

#[test]
fn test_edit_session_fills_placeholder() {
    let model = apply(
        create_test_model("Hello {{text:name}}!"),
        [Message::NavigateNext, Message::EnterEdit],
    );
    assert!(model.is_editing_placeholder());
    assert_eq!(model.draft_value(), Some(""));

    let model = type_str(model, "Ada");
    assert_eq!(model.draft_value(), Some("Ada"));
    assert_eq!(model.content(), "Hello {{text:name}}!");

    let model = update(model, Message::ExitEdit { commit: true });
    assert!(!model.is_editing_placeholder());
    assert_eq!(model.content(), "Hello Ada!");
    assert!(model.placeholders().is_empty());
    assert_eq!(model.cursor(), Cursor::at(0, 9));
}

#[test]
fn test_edit_session_ignores_cursor_moves() {
    let model = apply(
        create_test_model("{{text:a}} tail"),
        [
            Message::EnterEdit,
            Message::EditAppend('x'),
            Message::MoveCursor(Direction::Right),
            Message::InsertNewline,
            Message::Backspace,
            Message::EditAppend('y'),
        ],
    );
    assert_eq!(model.draft_value(), Some("y"));
    assert_eq!(model.cursor(), Cursor::at(0, 0));
}

#[test]
fn test_exit_without_commit_discards_draft() {
    let model = apply(
        create_test_model("{{text:a}}"),
        [
            Message::EnterEdit,
            Message::EditAppend('x'),
            Message::ExitEdit { commit: false },
        ],
    );
    assert!(!model.is_editing_placeholder());
    assert_eq!(model.content(), "{{text:a}}");
}

#[test]
fn test_enter_edit_on_list_placeholder_is_noop() {
    let model = apply(
        create_test_model("{{list:steps}}"),
        [Message::EnterEdit, Message::EditAppend('x')],
    );
    assert!(!model.is_editing_placeholder());
    assert_eq!(model.content(), "{{list:steps}}");
}

#[test]
fn test_fill_list_replaces_active_list() {
    let model = apply(
        create_test_model("Todo:\n{{list:steps}}"),
        [
            Message::NavigateNext,
            Message::FillList(vec!["write".to_string(), "test".to_string()]),
        ],
    );
    assert_eq!(model.content(), "Todo:\n- write\n- test");
    assert!(model.placeholders().is_empty());
}

#[test]
fn test_commit_preserves_other_active_state() {
    let model = apply(
        create_test_model("{{text:a}} {{list:b}}"),
        [
            Message::EnterEdit,
            Message::EditAppend('1'),
            Message::ExitEdit { commit: true },
            Message::NavigateNext,
        ],
    );
    let active = model.active_placeholder().unwrap();
    assert_eq!(active.kind, PlaceholderKind::List);
    assert_eq!(active.span.start, 2);
}

#[test]
fn test_validation_issues_follow_edits() {
    let model = create_test_model("{{text:x}} ");
    assert!(model.validation_issues().is_empty());
    let model = apply(
        model,
        [Message::MoveToLineEnd, Message::InsertText("{{text:x}}".to_string())],
    );
    assert_eq!(model.validation_issues().len(), 2);
}

// --- Read-only ---

#[test]
fn test_read_only_blocks_edits_but_allows_navigation() {
    let model = apply(
        create_test_model("a {{text:x}}").with_read_only(true),
        [
            Message::InsertChar('z'),
            Message::Backspace,
            Message::NavigateNext,
            Message::EnterEdit,
        ],
    );
    assert_eq!(model.content(), "a {{text:x}}");
    assert!(!model.is_editing_placeholder());
    assert_eq!(model.active_placeholder().unwrap().name, "x");
    assert!(!model.is_dirty());

    let model = apply(model, [Message::SetReadOnly(false), Message::InsertChar('z')]);
    assert_eq!(model.content(), "a z{{text:x}}");
}

#[test]
fn test_read_only_turns_open_commit_into_discard() {
    let model = apply(
        create_test_model("Hi {{text:a}}"),
        [
            Message::NavigateNext,
            Message::EnterEdit,
            Message::EditAppend('X'),
            Message::SetReadOnly(true),
            Message::ExitEdit { commit: true },
        ],
    );
    assert!(!model.is_editing_placeholder());
    assert_eq!(model.content(), "Hi {{text:a}}");
    assert!(!model.is_dirty());
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(""), Message::Quit);
    assert!(model.should_quit);
}
