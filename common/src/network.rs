//! Scan inputs: what to scan ([`target`]) and which ports to ask for ([`ports`]).

pub mod ports;
pub mod target;
