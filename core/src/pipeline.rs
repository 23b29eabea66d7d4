//! # Sweep Pipeline
//!
//! Drives targets through scan, parse and report, strictly one at a time.
//!
//! Failure policy per stage:
//! 1. **Target source** errors abort the sweep.
//! 2. **Scanner** problems are already logged by the scanner; its output is
//!    parsed regardless.
//! 3. **Parse** errors abort the sweep. Rows written for earlier targets stay
//!    in the output, later targets are never scanned.
//! 4. **Emitter** write errors are logged and counted, the sweep goes on.
//!    An emitter error that [`SweepError::is_fatal`] aborts it.

use portsweep_common::error::{Result, SweepError};
use portsweep_common::network::ports::PortPlan;
use portsweep_common::network::target::ScanTarget;
use portsweep_common::report::ScanReport;
use tracing::{debug, error, info, warn};

use crate::parser;
use crate::report::ReportEmitter;
use crate::scanner::PortScanner;

/// Called before each scan with the 1-based target index.
pub type ProgressCallback = Box<dyn Fn(usize, &ScanTarget) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub targets: usize,
    pub hosts: usize,
    pub open_ports: usize,
    pub write_failures: usize,
}

pub struct Sweep {
    scanner: Box<dyn PortScanner>,
    emitter: Box<dyn ReportEmitter>,
    plan: PortPlan,
    on_target: Option<ProgressCallback>,
}

impl Sweep {
    pub fn new(
        scanner: Box<dyn PortScanner>,
        emitter: Box<dyn ReportEmitter>,
        plan: PortPlan,
    ) -> Self {
        Self {
            scanner,
            emitter,
            plan,
            on_target: None,
        }
    }

    pub fn with_progress(mut self, on_target: ProgressCallback) -> Self {
        self.on_target = Some(on_target);
        self
    }

    /// Scans every target in order and reports each host found.
    ///
    /// Returns at the first target source or parse error.
    pub async fn run<I>(&mut self, targets: I) -> Result<SweepSummary>
    where
        I: IntoIterator<Item = Result<ScanTarget>>,
    {
        let mut summary: SweepSummary = SweepSummary::default();

        for target in targets {
            let target: ScanTarget = target?;
            summary.targets += 1;

            if let Some(on_target) = &self.on_target {
                on_target(summary.targets, &target);
            }
            if target.is_empty() {
                warn!("target #{} is blank, passing it to the scanner as is", summary.targets);
            }

            let output: Vec<u8> = self.scanner.scan(&target, &self.plan).await;
            debug!(addr = %target, bytes = output.len(), "{} finished", self.scanner.name());

            let report: ScanReport = parser::parse_report(&output).inspect_err(|e| {
                error!(addr = %target, "{e}; stopping before the remaining targets");
            })?;

            emit_report(&report, self.emitter.as_mut(), &mut summary)?;
        }

        info!(
            "{} targets scanned, {} hosts reported",
            summary.targets, summary.hosts
        );
        Ok(summary)
    }
}

/// Parses output captured earlier and reports its hosts.
pub fn report_bytes(bytes: &[u8], emitter: &mut dyn ReportEmitter) -> Result<SweepSummary> {
    let report: ScanReport = parser::parse_report(bytes)?;
    let mut summary: SweepSummary = SweepSummary::default();
    emit_report(&report, emitter, &mut summary)?;
    Ok(summary)
}

/// Hands every host to `emitter`. Only a fatal error stops the run, anything
/// else is logged and counted.
fn emit_report(
    report: &ScanReport,
    emitter: &mut dyn ReportEmitter,
    summary: &mut SweepSummary,
) -> Result<()> {
    if report.hosts.is_empty() {
        warn!("{} reported no hosts for '{}'", report.scanner, report.args);
    }

    for host in &report.hosts {
        summary.hosts += 1;
        summary.open_ports += host.open_ports().count();

        match emitter.emit_host(host) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                summary.write_failures += 1;
                log_write_failure(&e);
            }
        }
    }

    Ok(())
}

fn log_write_failure(err: &SweepError) {
    error!("{err}; continuing with the next host");
}
