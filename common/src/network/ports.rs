//! # Port Plan
//!
//! The ordered list of `(protocol, port)` pairs a sweep asks nmap about.
//!
//! The same [`PortPlan`] produces both the nmap `-p` argument and the CSV
//! header, so the header columns and the scanned ports always share one order:
//! every TCP port in list order, then every UDP port in list order.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SweepError};

/// TCP ports probed when no list is given: common IT services plus industrial
/// control protocols (S7, Modbus, BACnet, OPC UA, EtherNet/IP, ...).
pub const DEFAULT_TCP_PORTS: &[u16] = &[
    21, 22, 23, 25, 80, 102, 104, 111, 135, 137, 400, 401,
    402, 443, 502, 545, 771, 777, 808, 1023, 1025, 1026, 1027, 1029,
    1089, 1090, 1091, 1101, 1217, 1330, 1331, 1332, 1433, 1883, 2074, 2075,
    2076, 2077, 2078, 2079, 2101, 2102, 2222, 2223, 2308, 2323, 2404, 2700,
    2947, 3060, 3250, 3306, 3389, 3622, 4120, 4121, 4122, 4123, 4124, 4125,
    4241, 4242, 4322, 4410, 4445, 4446, 4502, 4503, 4592, 4840, 4843, 5000,
    5159, 5241, 5413, 5450, 5457, 5458, 5481, 5500, 5501, 5502, 5503, 5504,
    5505, 5506, 5507, 5508, 5509, 5560, 5800, 5900, 6002, 6543, 7579, 7580,
    7600, 7700, 7710, 7720, 7721, 7722, 7723, 8080, 8081, 8083, 8087, 8443,
    9001, 9090, 9111, 9999, 10110, 10651, 12233, 12293, 12299, 12397, 12399, 12401,
    14000, 18245, 18246, 19999, 20000, 20222, 21379, 27017, 28017, 34962, 34963, 34964,
    38080, 40000, 44818, 46822, 46823, 46824, 47808, 49281, 50523, 50777, 54321, 57176,
    58723, 60093,
];

/// UDP ports probed when no list is given.
pub const DEFAULT_UDP_PORTS: &[u16] = &[
    22, 23, 67, 68, 69, 104, 111, 123, 135, 137, 161, 502,
    1023, 1089, 1090, 1091, 1883, 2101, 2102, 2222, 3306, 3389, 3622, 4840,
    4843, 5000, 10110, 10260, 11234, 17185, 20034, 28017, 34962, 34963, 34964, 40000,
    44818, 47808, 48899, 55000, 55001, 55002, 55003,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }

    /// Prefix nmap expects in a mixed `-p` specification.
    fn nmap_prefix(&self) -> &'static str {
        match self {
            Protocol::Tcp => "T",
            Protocol::Udp => "U",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            other => Err(SweepError::config(format!("unknown protocol '{other}'"))),
        }
    }
}

/// `(protocol, port)` pairs in the order nmap reports them: TCP before UDP,
/// ascending within each protocol, each port once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortPlan {
    entries: Vec<(Protocol, u16)>,
}

impl PortPlan {
    pub fn new(tcp: &[u16], udp: &[u16]) -> Self {
        let mut entries: Vec<(Protocol, u16)> = tcp
            .iter()
            .map(|port| (Protocol::Tcp, *port))
            .chain(udp.iter().map(|port| (Protocol::Udp, *port)))
            .collect();
        entries.sort_unstable();
        entries.dedup();
        Self { entries }
    }

    /// Builds a plan from two comma separated lists such as `"22,80,8000-8002"`.
    ///
    /// Fails when a list entry is not a port or port range, or when both lists
    /// are empty.
    pub fn parse(tcp: &str, udp: &str) -> Result<Self> {
        Self::checked(parse_port_list(tcp)?, parse_port_list(udp)?)
    }

    /// Same as [`PortPlan::parse`], except that a side given as `None` falls
    /// back to its built-in list.
    pub fn with_defaults(tcp: Option<&str>, udp: Option<&str>) -> Result<Self> {
        let tcp_ports: Vec<u16> = match tcp {
            Some(list) => parse_port_list(list)?,
            None => DEFAULT_TCP_PORTS.to_vec(),
        };
        let udp_ports: Vec<u16> = match udp {
            Some(list) => parse_port_list(list)?,
            None => DEFAULT_UDP_PORTS.to_vec(),
        };
        Self::checked(tcp_ports, udp_ports)
    }

    fn checked(tcp_ports: Vec<u16>, udp_ports: Vec<u16>) -> Result<Self> {
        if tcp_ports.is_empty() && udp_ports.is_empty() {
            return Err(SweepError::config("no TCP or UDP ports to scan"));
        }
        Ok(Self::new(&tcp_ports, &udp_ports))
    }

    pub fn entries(&self) -> &[(Protocol, u16)] {
        &self.entries
    }

    pub fn ports(&self, protocol: Protocol) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .iter()
            .filter(move |(proto, _)| *proto == protocol)
            .map(|(_, port)| *port)
    }

    pub fn has(&self, protocol: Protocol) -> bool {
        self.ports(protocol).next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The nmap `-p` argument, e.g. `T:22,80,U:53`. An empty side is left out.
    pub fn nmap_spec(&self) -> String {
        [Protocol::Tcp, Protocol::Udp]
            .into_iter()
            .filter(|protocol| self.has(*protocol))
            .map(|protocol| {
                let ports: Vec<String> = self.ports(protocol).map(|p| p.to_string()).collect();
                format!("{}:{}", protocol.nmap_prefix(), ports.join(","))
            })
            .collect::<Vec<String>>()
            .join(",")
    }

    /// CSV header: `address`, then one `<protocol>/<port>` column per entry.
    pub fn header(&self) -> Vec<String> {
        std::iter::once("address".to_string())
            .chain(
                self.entries
                    .iter()
                    .map(|(protocol, port)| format!("{protocol}/{port}")),
            )
            .collect()
    }
}

impl Default for PortPlan {
    fn default() -> Self {
        Self::new(DEFAULT_TCP_PORTS, DEFAULT_UDP_PORTS)
    }
}

/// Parses `"21,22,8000-8002"` into ports. Order and repeats are left to
/// [`PortPlan::new`].
pub fn parse_port_list(list: &str) -> Result<Vec<u16>> {
    let mut ports: Vec<u16> = Vec::new();

    for part in list.split(',') {
        let part: &str = part.trim();
        if part.is_empty() {
            continue;
        }

        match part.split_once('-') {
            Some((start, end)) => {
                let start: u16 = parse_port(start)?;
                let end: u16 = parse_port(end)?;
                if start > end {
                    return Err(SweepError::config(format!(
                        "port range '{part}' ends before it starts"
                    )));
                }
                ports.extend(start..=end);
            }
            None => ports.push(parse_port(part)?),
        }
    }

    Ok(ports)
}

fn parse_port(s: &str) -> Result<u16> {
    match s.trim().parse::<u16>() {
        Ok(0) => Err(SweepError::config("port 0 cannot be scanned")),
        Ok(port) => Ok(port),
        Err(e) => Err(SweepError::config(format!("invalid port '{}': {e}", s.trim()))),
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
