use colored::*;
use portsweep_common::config::Config;
use portsweep_common::network::ports::Protocol;

use crate::terminal::{colors, print};

/// Prints what a sweep with these flags would ask nmap for, and the CSV header
/// it would write. The header itself goes to stdout.
pub fn ports(cfg: &Config) {
    let plan = &cfg.ports;
    print::header("port plan", cfg.quiet);

    print::align_keys(&["TCP", "UDP", "Columns", "nmap -p"]);
    print::aligned_line("TCP", plan.ports(Protocol::Tcp).count().to_string());
    print::aligned_line("UDP", plan.ports(Protocol::Udp).count().to_string());
    print::aligned_line("Columns", (plan.len() + 1).to_string().color(colors::ACCENT));
    print::aligned_line("nmap -p", plan.nmap_spec());

    println!("{}", plan.header().join(","));
}
