use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use portsweep_common::error::{Result, SweepError};
use portsweep_common::network::ports::{PortPlan, Protocol};
use portsweep_common::report::HostResult;
use tracing::warn;

use super::{ReportEmitter, RowSink};

/// [`RowSink`] backed by a `csv::Writer`.
pub struct CsvSink<W: Write + Send> {
    writer: csv::Writer<W>,
}

impl<W: Write + Send> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        let writer = csv::WriterBuilder::new().flexible(true).from_writer(inner);
        Self { writer }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| SweepError::write(e.to_string()))
    }
}

impl<W: Write + Send> RowSink for CsvSink<W> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.writer
            .write_record(row)
            .map_err(|e| SweepError::write(e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| SweepError::write(e.to_string()))
    }
}

/// One row per host: the address, then each port's state in the order nmap
/// reported it.
///
/// Columns line up with the header purely by position. The scanner is asked
/// for ports from the same [`PortPlan`] that built the header, and the plan
/// keeps nmap's own ordering, so the two agree. A record that still lands
/// under the wrong column is logged.
pub struct TabularEmitter {
    sink: Box<dyn RowSink>,
    header: Vec<String>,
    columns: Vec<(Protocol, u16)>,
}

impl TabularEmitter {
    /// Takes ownership of `sink` for the rest of the run.
    pub fn new(sink: Box<dyn RowSink>, plan: &PortPlan) -> Self {
        Self {
            sink,
            header: plan.header(),
            columns: plan.entries().to_vec(),
        }
    }

    /// Writes `address,tcp/..,udp/..`. Only needed for a fresh output file.
    pub fn write_header(&mut self) -> Result<()> {
        let header: Vec<String> = self.header.clone();
        self.write_flushed(&header)
    }

    pub fn row(host: &HostResult) -> Vec<String> {
        std::iter::once(host.address().to_string())
            .chain(host.ports().iter().map(|port| port.state.state.clone()))
            .collect()
    }

    /// Header columns whose position holds some other port in `host`.
    pub fn misplaced(&self, host: &HostResult) -> Vec<String> {
        host.ports()
            .iter()
            .zip(&self.columns)
            .filter(|(record, (protocol, port))| {
                record.port_id != *port || record.protocol.parse::<Protocol>().ok() != Some(*protocol)
            })
            .map(|(record, (protocol, port))| {
                format!("{protocol}/{port} holds {}/{}", record.protocol, record.port_id)
            })
            .collect()
    }

    fn write_flushed(&mut self, row: &[String]) -> Result<()> {
        self.sink.write_row(row)?;
        self.sink.flush()
    }
}

impl ReportEmitter for TabularEmitter {
    fn emit_host(&mut self, host: &HostResult) -> Result<()> {
        let row: Vec<String> = Self::row(host);
        if row.len() != self.header.len() {
            warn!(
                "{} reported {} ports, header has {} port columns",
                host.address(),
                row.len() - 1,
                self.header.len() - 1
            );
        }

        let misplaced: Vec<String> = self.misplaced(host);
        if !misplaced.is_empty() {
            warn!("{}: column mismatch, {}", host.address(), misplaced.join(", "));
        }

        self.write_flushed(&row)
    }
}

pub fn output_file_name(started_at: u64) -> String {
    format!("output_{started_at}.csv")
}

/// Opens `output_<started_at>.csv` under `dir` for appending, creating it if
/// needed. The flag tells whether the file is empty and still needs a header.
pub fn open_output_file(dir: &Path, started_at: u64) -> Result<(File, PathBuf, bool)> {
    let path: PathBuf = dir.join(output_file_name(started_at));
    let file: File = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .map_err(|e| SweepError::config(format!("cannot open {}: {e}", path.display())))?;

    let is_empty: bool = file
        .metadata()
        .map(|meta| meta.len() == 0)
        .map_err(|e| SweepError::config(format!("cannot inspect {}: {e}", path.display())))?;

    Ok((file, path, is_empty))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
