use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::perf::{self, TraceEvent};

impl App {
    /// Run the main event loop.
    ///
    /// On return, [`final_text`](Self::final_text) holds the composed text.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = perf::scope("app.run.total");

        let init_scope = perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - promptpad requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = Model::new(&self.text, (size.width, size.height))
            .with_read_only(self.read_only)
            .with_wrap_navigation(self.wrap_navigation)
            .with_tab_width(self.tab_width);
        tracing::info!(
            lines = model.line_count(),
            placeholders = model.placeholders().len(),
            "composer started"
        );

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model));

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        self.final_text = Some(model.content());
        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                perf::record(&TraceEvent::Frame {
                    index: frame_idx,
                    draw: draw_start.elapsed(),
                });
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            if let Some(msg) = Self::handle_event(&event::read()?, model) {
                perf::record(&TraceEvent::Message {
                    frame: frame_idx,
                    message: &msg,
                });
                Self::apply(model, msg);
                needs_render = true;
            }

            // Coalesce key repeat bursts and pastes into a single render.
            let mut drained = 0_u32;
            while event::poll(Duration::from_millis(0))? {
                if let Some(msg) = Self::handle_event(&event::read()?, model) {
                    drained += 1;
                    Self::apply(model, msg);
                    needs_render = true;
                }
            }
            if drained > 0 {
                perf::record(&TraceEvent::Drained {
                    frame: frame_idx,
                    count: drained,
                });
            }
        }
        Ok(())
    }

    fn apply(model: &mut Model, msg: Message) {
        *model = update(std::mem::take(model), msg);
    }
}
