use std::path::Path;
use std::time::Instant;

use portsweep_common::config::Config;
use portsweep_common::error::SweepError;
use portsweep_core::pipeline::{self, SweepSummary};

use super::{emitter_for, print_summary, unix_now};
use crate::terminal::print;

/// Emits a saved `nmap -oX` document as if it had just been scanned.
pub fn report(xml: &Path, cfg: &Config) -> anyhow::Result<()> {
    print::header("reading saved scan", cfg.quiet);
    let start_time: Instant = Instant::now();

    let bytes: Vec<u8> = std::fs::read(xml)
        .map_err(|e| SweepError::config(format!("cannot read {}: {e}", xml.display())))?;
    print::aligned_line("Input", xml.display().to_string());

    let (mut emitter, destination) = emitter_for(cfg, unix_now())?;
    let summary: SweepSummary = pipeline::report_bytes(&bytes, emitter.as_mut())?;

    print_summary(&summary, start_time.elapsed(), destination.as_deref(), cfg);
    Ok(())
}
