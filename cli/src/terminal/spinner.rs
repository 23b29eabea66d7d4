use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use portsweep_common::network::target::ScanTarget;

use crate::terminal::colors;

const TICK: Duration = Duration::from_millis(100);

pub struct SpinnerHandle {
    spinner: ProgressBar,
}

impl SpinnerHandle {
    pub fn set_message(&self, msg: String) {
        self.spinner.set_message(msg);
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }

    /// Runs `f` with the spinner line cleared, redrawing it afterwards.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.spinner.suspend(f)
    }
}

static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> SpinnerHandle {
    let pb: ProgressBar = ProgressBar::new_spinner();
    let style: ProgressStyle = ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(TICK);

    SpinnerHandle { spinner: pb }
}

/// Clears the spinner if one was ever started.
pub fn finish() {
    if let Some(handle) = SPINNER.get() {
        handle.finish_and_clear();
    }
}

fn suspended<F: FnOnce() -> R, R>(f: F) -> R {
    match SPINNER.get() {
        Some(handle) => handle.suspend(f),
        None => f(),
    }
}

pub fn report_scan_progress(index: usize, total: usize, target: &ScanTarget) {
    get_spinner().set_message(format!(
        "Scanning {}: {} of {}",
        target.as_str().color(colors::PRIMARY),
        index.to_string().green().bold(),
        total.to_string().bold()
    ));
}

/// Log output, written to stderr around the spinner.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        suspended(|| io::stderr().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Report output, written to stdout around the spinner.
pub struct SuspendedStdout;

impl Write for SuspendedStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        suspended(|| io::stdout().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        suspended(|| io::stdout().flush())
    }
}
