use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::SweepError;
use crate::network::ports::PortPlan;

pub const DEFAULT_INPUT: &str = "iplist.xlsx";
pub const DEFAULT_NMAP: &str = "nmap";
pub const DEFAULT_ELEVATE: &str = "sudo";
pub const DEFAULT_MAX_RETRIES: u32 = 8;

pub struct Config {
    /// Workbook holding one address per cell.
    pub input: PathBuf,
    pub format: OutputFormat,
    /// Directory receiving `output_<unixtime>.csv` in CSV mode.
    pub output_dir: PathBuf,
    pub ports: PortPlan,
    pub nmap: NmapOptions,
    /// 0 prints everything, 1 drops headers and the banner, 2 also drops info logs.
    pub quiet: u8,
    pub no_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            format: OutputFormat::Csv,
            output_dir: PathBuf::from("."),
            ports: PortPlan::default(),
            nmap: NmapOptions::default(),
            quiet: 0,
            no_banner: false,
        }
    }
}

/// How nmap gets invoked for each target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NmapOptions {
    pub binary: String,
    /// Privilege wrapper placed in front of nmap (`sudo`). Skipped when running as root.
    pub elevate: Option<String>,
    /// Forwarded as `--max-retries`; nmap owns the retry policy.
    pub max_retries: u32,
    pub append_output: bool,
}

impl Default for NmapOptions {
    fn default() -> Self {
        Self {
            binary: DEFAULT_NMAP.to_string(),
            elevate: Some(DEFAULT_ELEVATE.to_string()),
            max_retries: DEFAULT_MAX_RETRIES,
            append_output: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable host summaries on stdout.
    Text,
    /// One row per host in `output_<unixtime>.csv`.
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(SweepError::config(format!("unknown output format '{other}'"))),
        }
    }
}
