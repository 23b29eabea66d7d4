//! # Scan Report Model
//!
//! The parsed form of one `nmap -oX` document. Field names mirror nmap's own
//! XML attributes (`@portid`, `@osfamily`, ...), so the structs deserialize
//! straight from the scanner output.
//!
//! Anything nmap may leave out defaults to an empty string or zero instead of
//! failing: a port without a `<service>` block still has a [`Service`], just
//! an empty one.

use serde::Deserialize;

/// Root `<nmaprun>` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanReport {
    #[serde(rename = "@scanner", default)]
    pub scanner: String,
    #[serde(rename = "@args", default)]
    pub args: String,
    #[serde(rename = "@start", default)]
    pub start: u64,
    #[serde(rename = "@startstr", default)]
    pub start_str: String,
    #[serde(default)]
    pub verbose: Verbose,
    #[serde(rename = "host", default)]
    pub hosts: Vec<HostResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Verbose {
    #[serde(rename = "@level", default)]
    pub level: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostResult {
    #[serde(rename = "@starttime", default)]
    pub start_time: u64,
    #[serde(rename = "address", default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub hostnames: Hostnames,
    #[serde(default)]
    pub ports: PortList,
    #[serde(rename = "os", default)]
    pub os: Vec<OsEntry>,
}

impl HostResult {
    /// The scanned address: the first IPv4/IPv6 entry, since nmap also lists
    /// the MAC address of LAN hosts as an `<address>`.
    pub fn address(&self) -> &str {
        self.addresses
            .iter()
            .find(|addr| addr.is_ip())
            .or_else(|| self.addresses.first())
            .map(|addr| addr.addr.as_str())
            .unwrap_or("")
    }

    pub fn hostnames(&self) -> &[Hostname] {
        &self.hostnames.entries
    }

    /// Port records in the order nmap reported them.
    pub fn ports(&self) -> &[PortRecord] {
        &self.ports.entries
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &PortRecord> {
        self.ports().iter().filter(|port| port.is_open())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    #[serde(rename = "@addr", default)]
    pub addr: String,
    #[serde(rename = "@addrtype", default)]
    pub addr_type: String,
    #[serde(rename = "@level", default)]
    pub level: String,
}

impl Address {
    pub fn is_ip(&self) -> bool {
        matches!(self.addr_type.as_str(), "ipv4" | "ipv6")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hostnames {
    #[serde(rename = "hostname", default)]
    pub entries: Vec<Hostname>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Hostname {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortList {
    #[serde(rename = "port", default)]
    pub entries: Vec<PortRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PortRecord {
    #[serde(rename = "@protocol", default)]
    pub protocol: String,
    #[serde(rename = "@portid", default)]
    pub port_id: u16,
    #[serde(default)]
    pub state: PortState,
    #[serde(default)]
    pub service: Service,
}

impl PortRecord {
    pub fn is_open(&self) -> bool {
        self.state.state == "open"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PortState {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@reason", default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Service {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@product", default)]
    pub product: String,
    #[serde(rename = "@version", default)]
    pub version: String,
    #[serde(rename = "@extrainfo", default)]
    pub extra_info: String,
}

/// One `<os>` block.
///
/// nmap nests `<osclass>` inside each `<osmatch>`; older documents carry it
/// directly under `<os>`. Both shapes are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsEntry {
    #[serde(rename = "osmatch", default)]
    pub matches: Vec<OsMatch>,
    #[serde(rename = "osclass", default)]
    pub classes: Vec<OsClass>,
}

impl OsEntry {
    /// nmap lists matches by descending accuracy, so the first is the best guess.
    pub fn best_match(&self) -> Option<&OsMatch> {
        self.matches.first()
    }

    pub fn class(&self) -> Option<&OsClass> {
        self.best_match()
            .and_then(|best| best.classes.first())
            .or_else(|| self.classes.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OsMatch {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@accuracy", default)]
    pub accuracy: u8,
    #[serde(rename = "osclass", default)]
    pub classes: Vec<OsClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OsClass {
    #[serde(rename = "@type", default)]
    pub kind: String,
    #[serde(rename = "@vendor", default)]
    pub vendor: String,
    #[serde(rename = "@osfamily", default)]
    pub family: String,
    #[serde(rename = "@osgen", default)]
    pub generation: String,
    #[serde(rename = "@accuracy", default)]
    pub accuracy: u8,
}
