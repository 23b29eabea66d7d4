use std::time::{Duration, Instant};

use colored::*;
use portsweep_common::config::Config;
use portsweep_common::error::Result;
use portsweep_common::network::target::ScanTarget;
use portsweep_core::pipeline::{Sweep, SweepSummary};
use portsweep_core::scanner::NmapScanner;
use portsweep_core::targets::TargetSource;

use super::{emitter_for, print_summary, unix_now};
use crate::terminal::{colors, print, spinner};

pub async fn scan(cfg: &Config) -> anyhow::Result<()> {
    print::header("preparing sweep", cfg.quiet);
    let mut source: TargetSource = TargetSource::open(&cfg.input)?;
    let total: usize = source.target_count()?;
    let started_at: u64 = unix_now();

    let (emitter, destination) = emitter_for(cfg, started_at)?;
    print_plan(cfg, &source, total, destination.as_deref().map(|p| p.display().to_string()));

    let scanner: NmapScanner = NmapScanner::new(cfg.nmap.clone());
    let mut sweep: Sweep = Sweep::new(Box::new(scanner), emitter, cfg.ports.clone())
        .with_progress(Box::new(move |index: usize, target: &ScanTarget| {
            spinner::report_scan_progress(index, total, target)
        }));

    print::header("sweeping targets", cfg.quiet);
    let start_time: Instant = Instant::now();
    let result: Result<SweepSummary> = sweep.run(source.targets()).await;
    spinner::finish();

    let summary: SweepSummary = result?;
    let elapsed: Duration = start_time.elapsed();
    print_summary(&summary, elapsed, destination.as_deref(), cfg);
    Ok(())
}

fn print_plan(cfg: &Config, source: &TargetSource, total: usize, destination: Option<String>) {
    let sheets: String = source.sheet_names().join(", ");
    let output: String = destination.unwrap_or_else(|| "stdout".to_string());
    let elevate: &str = cfg.nmap.elevate.as_deref().unwrap_or("none");

    print::align_keys(&["Input", "Sheets", "Targets", "Ports", "Scanner", "Elevation", "Output"]);
    print::aligned_line("Input", source.path().display().to_string());
    print::aligned_line("Sheets", sheets);
    print::aligned_line("Targets", total.to_string());
    print::aligned_line(
        "Ports",
        format!("{} columns", cfg.ports.len()).color(colors::ACCENT),
    );
    print::aligned_line("Scanner", cfg.nmap.binary.as_str());
    print::aligned_line("Elevation", elevate);
    print::aligned_line("Output", format!("{output} ({})", cfg.format));
}
