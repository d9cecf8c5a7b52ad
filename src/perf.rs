//! Timing scopes and the `--debug-log` event trace.
//!
//! Scopes are inert unless `--perf` is given. A finished scope emits a
//! `tracing` event on the `promptpad::perf` target and is folded into
//! per-name totals. The debug log records frames, applied messages and
//! scope timings as they happen, and ends with the totals when closed.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

static ENABLED: AtomicBool = AtomicBool::new(false);
static TRACE: LazyLock<Mutex<Trace>> = LazyLock::new(|| Mutex::new(Trace::new()));

/// Times the enclosing block; reports on drop.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed = self.start.elapsed();
        tracing::debug!(
            target: "promptpad::perf",
            scope = self.name,
            elapsed_ms = millis(elapsed),
            "scope finished"
        );
        trace().finish_scope(self.name, elapsed);
    }
}

/// Something worth a line in the debug log.
#[derive(Debug)]
pub enum TraceEvent<'a> {
    /// A frame was drawn.
    Frame { index: u64, draw: Duration },
    /// A message was applied to the model.
    Message {
        frame: u64,
        message: &'a dyn fmt::Debug,
    },
    /// Extra queued events were applied before the next frame.
    Drained { frame: u64, count: u32 },
    /// The terminal changed size.
    Resize { width: u16, height: u16 },
    /// A timing scope finished.
    Scope {
        name: &'static str,
        elapsed: Duration,
    },
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame { index, draw } => {
                write!(f, "frame.draw: frame={index} draw_ms={:.3}", millis(*draw))
            }
            Self::Message { frame, message } => {
                write!(f, "event.message: frame={frame} msg={message:?}")
            }
            Self::Drained { frame, count } => {
                write!(f, "event.drain: frame={frame} drained={count}")
            }
            Self::Resize { width, height } => {
                write!(f, "event.resize: width={width} height={height}")
            }
            Self::Scope { name, elapsed } => write!(f, "{name}: {:.3} ms", millis(*elapsed)),
        }
    }
}

/// Accumulated timings for one scope name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeTotals {
    pub count: u64,
    pub total: Duration,
    pub max: Duration,
}

impl ScopeTotals {
    fn add(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.max = self.max.max(elapsed);
    }

    /// Mean time per finished scope.
    pub fn mean(&self) -> Duration {
        u32::try_from(self.count)
            .ok()
            .and_then(|count| self.total.checked_div(count))
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct Trace {
    start: Instant,
    writer: Option<BufWriter<File>>,
    totals: BTreeMap<&'static str, ScopeTotals>,
}

impl Trace {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
            totals: BTreeMap::new(),
        }
    }

    fn finish_scope(&mut self, name: &'static str, elapsed: Duration) {
        self.totals.entry(name).or_default().add(elapsed);
        self.write(&TraceEvent::Scope { name, elapsed });
    }

    fn write(&mut self, event: &TraceEvent<'_>) {
        let elapsed_ms = millis(self.start.elapsed());
        if let Some(writer) = self.writer.as_mut() {
            let _ = writeln!(writer, "[{elapsed_ms:>10.3} ms] {event}");
            let _ = writer.flush();
        }
    }

    fn summary(&self) -> Vec<String> {
        self.totals
            .iter()
            .map(|(name, totals)| {
                format!(
                    "{name}: n={} total_ms={:.3} mean_ms={:.3} max_ms={:.3}",
                    totals.count,
                    millis(totals.total),
                    millis(totals.mean()),
                    millis(totals.max)
                )
            })
            .collect()
    }

    fn close(&mut self) -> std::io::Result<()> {
        let summary = self.summary();
        if let Some(mut writer) = self.writer.take() {
            writeln!(writer, "scope totals:")?;
            for line in summary {
                writeln!(writer, "  {line}")?;
            }
            writer.flush()?;
        }
        Ok(())
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn trace() -> MutexGuard<'static, Trace> {
    TRACE.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Totals for every scope finished so far, sorted by name.
pub fn scope_totals() -> Vec<(&'static str, ScopeTotals)> {
    trace()
        .totals
        .iter()
        .map(|(name, totals)| (*name, *totals))
        .collect()
}

/// Start writing the event trace to `path`, or with `None` close it.
///
/// Closing (or replacing) an open trace appends the scope totals.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut trace = trace();
    trace.close()?;
    if let Some(path) = path {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "promptpad debug log start")?;
        writer.flush()?;
        trace.start = Instant::now();
        trace.writer = Some(writer);
    }
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    trace().writer.is_some()
}

/// Append `event` to the debug log, if one is open.
pub fn record(event: &TraceEvent<'_>) {
    let mut trace = trace();
    if trace.writer.is_some() {
        trace.write(event);
    }
}
