use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;

/// Text shown in the status bar.
pub fn status_text(model: &Model) -> String {
    let mode = if model.is_editing_placeholder() {
        "PLACEHOLDER EDIT"
    } else if model.read_only {
        "READ-ONLY"
    } else {
        "COMPOSE"
    };
    let dirty_indicator = if model.is_dirty() { " [modified]" } else { "" };
    let cursor = model.cursor();
    let counts = format!(
        "{} chars, {} lines  Ln {}, Col {}",
        model.char_count(),
        model.line_count(),
        cursor.line + 1,
        cursor.col + 1
    );

    let issues = match model.validation_issues().len() {
        0 => String::new(),
        1 => "  [1 warning]".to_string(),
        n => format!("  [{n} warnings]"),
    };
    let active = model
        .active_placeholder()
        .map(|ph| format!("  {}:{}", ph.kind, ph.name))
        .unwrap_or_default();
    let error = model
        .last_error()
        .map(|err| format!("  error: {err}"))
        .unwrap_or_default();
    let hints = if model.is_editing_placeholder() {
        "  Enter/Esc:done"
    } else {
        "  Tab:next  i:edit  Ctrl+Q:quit"
    };

    let percent = model.viewport.scroll_percent();

    format!(" {mode}{dirty_indicator}  {counts}{active}{issues}{error}{hints}  {percent}%")
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let style = if model.last_error().is_some() {
        Style::default().bg(Color::Red).fg(Color::White)
    } else if model.is_editing_placeholder() {
        Style::default().bg(Color::Magenta).fg(Color::White)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    let status_bar = Paragraph::new(status_text(model)).style(style);
    frame.render_widget(status_bar, area);
}
