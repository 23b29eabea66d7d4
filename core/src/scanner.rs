//! The **abstraction** over the external port scanner.
//!
//! The pipeline only depends on [`PortScanner`]; [`NmapScanner`] is the
//! implementation that shells out to nmap. Tests swap in scanners that return
//! canned XML.

use async_trait::async_trait;
use portsweep_common::network::ports::PortPlan;
use portsweep_common::network::target::ScanTarget;

mod nmap;

pub use nmap::NmapScanner;

/// Runs one scan and hands back the raw XML the scanner printed.
#[async_trait]
pub trait PortScanner: Send + Sync {
    /// Scans `target` for every port in `plan`.
    ///
    /// Never fails: when the scanner cannot be started or exits non-zero the
    /// problem is logged and whatever output was produced (possibly nothing)
    /// is returned. Garbage surfaces later as a parse error.
    async fn scan(&self, target: &ScanTarget, plan: &PortPlan) -> Vec<u8>;

    /// Short name used in log lines.
    fn name(&self) -> &str;
}
