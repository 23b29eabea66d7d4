pub mod ports;
pub mod report;
pub mod scan;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::*;
use portsweep_common::config::{
    Config, DEFAULT_ELEVATE, DEFAULT_INPUT, DEFAULT_MAX_RETRIES, DEFAULT_NMAP, NmapOptions,
    OutputFormat,
};
use portsweep_common::error::Result;
use portsweep_common::network::ports::PortPlan;
use portsweep_core::pipeline::SweepSummary;
use portsweep_core::report::{
    CsvSink, ReportEmitter, TabularEmitter, TextEmitter, open_output_file,
};
use tracing::{info, warn};

use crate::terminal::spinner::SuspendedStdout;
use crate::terminal::{colors, print};

#[derive(Parser)]
#[command(name = "portsweep", version)]
#[command(about = "Sweeps a spreadsheet of hosts with nmap and reports their ports.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat to keep errors only
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Skip the title bar
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan every address listed in a workbook
    #[command(alias = "s")]
    Scan {
        /// Workbook with one address per cell
        #[arg(short, long, value_name = "PATH", default_value = DEFAULT_INPUT)]
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        ports: PortArgs,
        #[command(flatten)]
        nmap: NmapArgs,
    },
    /// Report on nmap XML saved from an earlier run
    #[command(alias = "r")]
    Report {
        xml: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        ports: PortArgs,
    },
    /// Show the port plan and the CSV header it yields
    #[command(alias = "p")]
    Ports {
        #[command(flatten)]
        ports: PortArgs,
    },
}

#[derive(Args)]
pub struct OutputArgs {
    /// csv or text
    #[arg(short, long, default_value = "csv")]
    pub format: OutputFormat,

    /// Directory receiving output_<unixtime>.csv
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct PortArgs {
    /// TCP ports, e.g. 22,80,8000-8010 [default: built-in list]
    #[arg(long, value_name = "LIST")]
    pub tcp_ports: Option<String>,

    /// UDP ports [default: built-in list]
    #[arg(long, value_name = "LIST")]
    pub udp_ports: Option<String>,
}

impl PortArgs {
    pub fn plan(&self) -> Result<PortPlan> {
        PortPlan::with_defaults(self.tcp_ports.as_deref(), self.udp_ports.as_deref())
    }
}

#[derive(Args)]
pub struct NmapArgs {
    /// nmap executable
    #[arg(long, value_name = "PATH", default_value = DEFAULT_NMAP)]
    pub nmap: String,

    /// Privilege wrapper run in front of nmap
    #[arg(long, value_name = "CMD", default_value = DEFAULT_ELEVATE)]
    pub elevate: String,

    /// Run nmap directly, even when not root
    #[arg(long, conflicts_with = "elevate")]
    pub no_elevate: bool,

    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Leave --append-output off the nmap command line
    #[arg(long)]
    pub no_append_output: bool,
}

impl From<&NmapArgs> for NmapOptions {
    fn from(args: &NmapArgs) -> Self {
        NmapOptions {
            binary: args.nmap.clone(),
            elevate: (!args.no_elevate).then(|| args.elevate.clone()),
            max_retries: args.max_retries,
            append_output: !args.no_append_output,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Everything the chosen command needs, port lists validated.
    pub fn config(&self) -> Result<Config> {
        let mut cfg: Config = Config {
            quiet: self.quiet,
            no_banner: self.no_banner,
            ..Config::default()
        };

        match &self.command {
            Commands::Scan {
                input,
                output,
                ports,
                nmap,
            } => {
                cfg.input = input.clone();
                cfg.format = output.format;
                cfg.output_dir = output.output_dir.clone();
                cfg.ports = ports.plan()?;
                cfg.nmap = NmapOptions::from(nmap);
            }
            Commands::Report { xml, output, ports } => {
                cfg.input = xml.clone();
                cfg.format = output.format;
                cfg.output_dir = output.output_dir.clone();
                cfg.ports = ports.plan()?;
            }
            Commands::Ports { ports } => {
                cfg.ports = ports.plan()?;
            }
        }

        Ok(cfg)
    }
}

/// Seconds since the epoch, naming the CSV file for this run.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Builds the emitter for `cfg.format`. In CSV mode also returns the file
/// rows go to.
pub(crate) fn emitter_for(
    cfg: &Config,
    started_at: u64,
) -> Result<(Box<dyn ReportEmitter>, Option<PathBuf>)> {
    match cfg.format {
        OutputFormat::Text => {
            let emitter: Box<dyn ReportEmitter> =
                Box::new(TextEmitter::new(BufWriter::new(SuspendedStdout)));
            Ok((emitter, None))
        }
        OutputFormat::Csv => {
            let (file, path, fresh) = open_output_file(&cfg.output_dir, started_at)?;
            let sink: CsvSink<File> = CsvSink::new(file);
            let mut emitter: TabularEmitter = TabularEmitter::new(Box::new(sink), &cfg.ports);

            if fresh {
                if let Err(e) = emitter.write_header() {
                    warn!("{e}; rows follow without a header");
                }
            } else {
                info!("appending to existing {}", path.display());
            }
            let emitter: Box<dyn ReportEmitter> = Box::new(emitter);
            Ok((emitter, Some(path)))
        }
    }
}

pub(crate) fn print_summary(
    summary: &SweepSummary,
    elapsed: Duration,
    destination: Option<&Path>,
    cfg: &Config,
) {
    let hosts: ColoredString = format!("{} hosts", summary.hosts).bold().green();
    let open: ColoredString = format!("{} open ports", summary.open_ports)
        .bold()
        .color(colors::OPEN_PORT);
    let took: ColoredString = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Sweep Complete: {hosts} with {open} in {took}").color(colors::TEXT_DEFAULT);

    if summary.write_failures > 0 {
        warn!("{} hosts could not be written", summary.write_failures);
    }

    if cfg.quiet > 0 {
        return;
    }

    print::fat_separator();
    print::centerln(&output.to_string());
    if let Some(path) = destination {
        print::centerln(&path.display().to_string().color(colors::PRIMARY).to_string());
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
