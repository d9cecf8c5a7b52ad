use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::Model;
use crate::editor::Placeholder;

use super::status;

const CURSOR_STYLE: Style = Style::new().bg(Color::White).fg(Color::Black);
const PLACEHOLDER_STYLE: Style = Style::new().fg(Color::Cyan);
const ACTIVE_PLACEHOLDER_STYLE: Style = Style::new().bg(Color::Blue).fg(Color::White);
const INVALID_PLACEHOLDER_STYLE: Style = Style::new().fg(Color::Yellow);
const DRAFT_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::UNDERLINED);

/// One terminal cell worth of text, tagged with the buffer column it
/// came from.
#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    style: Style,
    col: usize,
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let editor_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    render_editor(model, frame, editor_area);
    status::render_status_bar(model, frame, status_area);
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let content: Vec<Line> = model
        .visible_range()
        .map(|line_idx| editor_line(model, line_idx))
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// Build the styled line for `line_idx`, scrolled to the viewport's left
/// column.
fn editor_line(model: &Model, line_idx: usize) -> Line<'static> {
    let buffer = model.buffer();
    let chars: Vec<char> = buffer.line_at(line_idx).unwrap_or_default().chars().collect();
    let line_start = buffer.line_start(line_idx);
    let line_end = line_start + chars.len();
    let editing = model.editing_target();
    let cursor = model.cursor();
    let cursor_here = cursor.line == line_idx;

    let on_line: Vec<(usize, &Placeholder)> = model
        .placeholders()
        .iter()
        .enumerate()
        .filter(|(_, ph)| ph.span.start >= line_start && ph.span.end <= line_end)
        .collect();

    let mut cells = Vec::with_capacity(chars.len() + 1);
    let mut col = 0;
    while col < chars.len() {
        let slot = on_line
            .iter()
            .find(|(_, ph)| ph.span.start == line_start + col);
        let Some(&(index, ph)) = slot else {
            cells.push(plain_cell(chars[col], col, cursor_here && cursor.col == col));
            col += 1;
            continue;
        };

        if editing == Some(index) {
            let draft = model.draft_value().unwrap_or_default();
            cells.extend(draft.chars().map(|ch| Cell {
                ch,
                style: DRAFT_STYLE,
                col,
            }));
            cells.push(Cell {
                ch: ' ',
                style: CURSOR_STYLE,
                col,
            });
        } else {
            let style = placeholder_style(ph);
            for (offset, &ch) in chars[col..col + ph.span.len()].iter().enumerate() {
                let at = col + offset;
                let style = if editing.is_none() && cursor_here && cursor.col == at {
                    CURSOR_STYLE
                } else {
                    style
                };
                cells.push(Cell { ch, style, col: at });
            }
        }
        col += ph.span.len();
    }
    if editing.is_none() && cursor_here && cursor.col >= chars.len() {
        cells.push(Cell {
            ch: ' ',
            style: CURSOR_STYLE,
            col: chars.len(),
        });
    }

    let left = model.viewport.left_column();
    Line::from(group_cells(cells.into_iter().filter(|cell| cell.col >= left)))
}

const fn plain_cell(ch: char, col: usize, is_cursor: bool) -> Cell {
    let style = if is_cursor {
        CURSOR_STYLE
    } else {
        Style::new()
    };
    Cell { ch, style, col }
}

const fn placeholder_style(ph: &Placeholder) -> Style {
    if ph.active {
        ACTIVE_PLACEHOLDER_STYLE
    } else if ph.valid {
        PLACEHOLDER_STYLE
    } else {
        INVALID_PLACEHOLDER_STYLE
    }
}

/// Merge runs of equally styled cells into spans.
fn group_cells(cells: impl Iterator<Item = Cell>) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::new();
    for cell in cells {
        if cell.style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = cell.style;
        run.push(cell.ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    spans
}
