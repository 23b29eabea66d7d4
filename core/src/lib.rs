//! # Portsweep Core
//!
//! The sweep pipeline, one stage per module:
//!
//! * **[`targets`]**: reads addresses out of a spreadsheet workbook.
//! * **[`scanner`]**: runs nmap against one address and captures its XML.
//! * **[`parser`]**: turns that XML into a [`ScanReport`](portsweep_common::report::ScanReport).
//! * **[`report`]**: writes hosts out as text or CSV rows.
//! * **[`pipeline`]**: drives the stages strictly one target at a time.

pub mod parser;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod targets;
