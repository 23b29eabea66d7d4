use std::io::Write;

use portsweep_common::error::{Result, SweepError};
use portsweep_common::report::{HostResult, OsClass};

use super::ReportEmitter;

/// Prints each host as:
///
/// ```text
/// 192.168.0.32
/// Open ports:
/// - 22	ssh	OpenSSH	8.9p1
/// Matching OSes:
/// - Linux	Linux	general purpose	98
///
/// ```
pub struct TextEmitter<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> TextEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_host(&mut self, host: &HostResult) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "{}", host.address())?;

        let mut open = host.open_ports().peekable();
        if open.peek().is_none() {
            writeln!(w, "No open ports.")?;
        } else {
            writeln!(w, "Open ports:")?;
            for port in open {
                writeln!(
                    w,
                    "- {}\t{}\t{}\t{}",
                    port.port_id, port.service.name, port.service.product, port.service.version
                )?;
            }
        }

        if !host.os.is_empty() {
            writeln!(w, "Matching OSes:")?;
            let unknown: OsClass = OsClass::default();
            for entry in &host.os {
                let class: &OsClass = entry.class().unwrap_or(&unknown);
                writeln!(
                    w,
                    "- {}\t{}\t{}\t{}",
                    class.family, class.vendor, class.kind, class.accuracy
                )?;
            }
        }

        writeln!(w)?;
        w.flush()
    }
}

impl<W: Write + Send> ReportEmitter for TextEmitter<W> {
    fn emit_host(&mut self, host: &HostResult) -> Result<()> {
        self.write_host(host)
            .map_err(|e| SweepError::write(format!("{}: {e}", host.address())))
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
