//! Benchmarks for the per-keystroke update path.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use promptpad::app::{Message, Model, update};
use promptpad::editor::Direction;

fn long_prompt() -> String {
    (0..1_000)
        .map(|i| format!("Line {i} mentions {{{{text:slot_{i}}}}} once.\n"))
        .collect()
}

fn bench_typing(c: &mut Criterion) {
    let text = long_prompt();
    c.bench_function("type_80_chars_in_long_prompt", |b| {
        b.iter_batched(
            || update(Model::new(&text, (120, 40)), Message::SetCursor(500, 0)),
            |model| {
                (0..80).fold(model, |m, i| {
                    update(m, Message::InsertChar(black_box(if i % 2 == 0 { 'x' } else { ' ' })))
                })
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_cursor_movement(c: &mut Criterion) {
    let text = long_prompt();
    c.bench_function("move_down_200_lines", |b| {
        b.iter_batched(
            || Model::new(&text, (120, 40)),
            |model| {
                (0..200).fold(model, |m, _| update(m, Message::MoveCursor(Direction::Down)))
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_navigation(c: &mut Criterion) {
    let text = long_prompt();
    c.bench_function("navigate_next_100_placeholders", |b| {
        b.iter_batched(
            || Model::new(&text, (120, 40)),
            |model| (0..100).fold(model, |m, _| update(m, Message::NavigateNext)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_typing, bench_cursor_movement, bench_navigation);
criterion_main!(benches);
