//! # Report Emitter
//!
//! Writes parsed hosts out in one of two formats:
//!
//! * [`TextEmitter`]: a readable summary per host (open ports, OS guesses).
//! * [`TabularEmitter`]: one CSV row per host, one column per planned port.

use portsweep_common::error::Result;
use portsweep_common::report::HostResult;

mod tabular;
mod text;

pub use tabular::{CsvSink, TabularEmitter, open_output_file, output_file_name};
pub use text::TextEmitter;

/// Consumes hosts one at a time.
///
/// Errors are [`SweepError::Write`](portsweep_common::SweepError::Write)
/// failures; the pipeline logs them and keeps going.
pub trait ReportEmitter: Send {
    fn emit_host(&mut self, host: &HostResult) -> Result<()>;
}

/// Destination for CSV-style rows. Owned by the [`TabularEmitter`] for the
/// whole run; dropping it releases the underlying handle.
pub trait RowSink: Send {
    fn write_row(&mut self, row: &[String]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}
