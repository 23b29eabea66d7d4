//! # Portsweep Common
//!
//! Types shared by every layer of `portsweep`:
//!
//! * **[`network`]**: scan targets and the ordered port plan.
//! * **[`report`]**: the parsed shape of one nmap run.
//! * **[`config`]**: the run configuration assembled by the CLI.
//! * **[`error`]**: the error kinds and their run-level policy.

pub mod config;
pub mod error;
pub mod network;
pub mod report;

pub use error::{Result, SweepError};
