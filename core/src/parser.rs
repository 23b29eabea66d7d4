//! # Result Parser
//!
//! Strict deserialization of `nmap -oX` output into a [`ScanReport`].
//!
//! Malformed output is never skipped: a document that is empty, rooted
//! somewhere other than `<nmaprun>`, or fails to deserialize yields
//! [`SweepError::Parse`], which stops the sweep.

use quick_xml::Reader;
use quick_xml::events::Event;
use portsweep_common::error::{Result, SweepError};
use portsweep_common::report::ScanReport;

const ROOT_ELEMENT: &[u8] = b"nmaprun";

pub fn parse_report(bytes: &[u8]) -> Result<ScanReport> {
    let root: Vec<u8> = root_element(bytes)?;
    if root != ROOT_ELEMENT {
        return Err(SweepError::parse(format!(
            "expected <nmaprun> root element, found <{}>",
            String::from_utf8_lossy(&root)
        )));
    }

    quick_xml::de::from_reader(bytes).map_err(|e| SweepError::parse(e.to_string()))
}

/// Name of the first element in the document, skipping the XML declaration,
/// doctype, stylesheet instruction and comments nmap writes before it.
fn root_element(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf: Vec<u8> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => return Ok(e.name().as_ref().to_vec()),
            Ok(Event::Eof) => return Err(SweepError::parse("document is empty")),
            Ok(_) => {}
            Err(e) => {
                return Err(SweepError::parse(format!(
                    "at byte {}: {e}",
                    reader.error_position()
                )));
            }
        }
        buf.clear();
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
