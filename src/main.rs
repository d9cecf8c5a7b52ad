//! Promptpad - A terminal prompt composer with template placeholders.
//!
//! # Usage
//!
//! ```bash
//! promptpad prompt.md
//! promptpad --text 'Summarize {{text:topic}} for {{text:audience}}'
//! promptpad --check prompt.md
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use promptpad::app::App;
use promptpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use promptpad::editor::{Placeholder, PlaceholderIndex, ValidationIssue};
use promptpad::perf;

/// A terminal prompt composer with template placeholders
#[derive(Parser, Debug)]
#[command(name = "promptpad", version, about, long_about = None)]
struct Cli {
    /// Template file to open
    #[arg(value_name = "FILE", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Start from this text instead of a file
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Print the placeholders and issues of FILE as JSON and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["file", "text"])]
    check: Option<PathBuf>,

    /// Stop Tab/Shift-Tab at the last/first placeholder instead of wrapping
    #[arg(long)]
    no_wrap: bool,

    /// Spaces inserted by Tab when the text has no placeholders
    #[arg(long, value_name = "N")]
    tab_width: Option<usize>,

    /// Open without allowing edits
    #[arg(long)]
    read_only: bool,

    /// Enable performance timing scopes
    #[arg(long)]
    perf: bool,

    /// Write detailed event/frame debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Write tracing output to a file (filtered by `RUST_LOG`)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    placeholders: &'a [Placeholder],
    issues: &'a [ValidationIssue],
}

/// Initialize logging.
///
/// The TUI owns the terminal, so tracing output only goes to a file.
/// Check mode writes warnings to stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn run_check(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let index = PlaceholderIndex::from_content(&content);
    for issue in index.issues() {
        tracing::warn!(file = %path.display(), "{issue}");
    }
    let report = CheckReport {
        placeholders: index.placeholders(),
        issues: index.issues(),
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.check.is_none())?;

    if let Some(path) = &cli.check {
        return run_check(path);
    }

    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "effective flags");

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("PROMPTPAD_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?debug_log_path,
            %err,
            "failed to initialize debug log"
        );
    }

    let text = match (&cli.text, &cli.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };

    let mut app = App::new(text)
        .with_read_only(effective.read_only)
        .with_wrap_navigation(!effective.no_wrap)
        .with_tab_width(effective.tab_width.unwrap_or(promptpad::app::DEFAULT_TAB_WIDTH));

    let result = app.run().context("Application error");
    if let Err(err) = perf::set_debug_log_path(None) {
        tracing::warn!(%err, "failed to close debug log");
    }
    result?;

    if let Some(text) = app.final_text() {
        println!("{text}");
    }
    Ok(())
}
