#![cfg(test)]
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portsweep_common::error::Result;
use portsweep_common::network::ports::PortPlan;
use portsweep_common::network::target::ScanTarget;
use portsweep_core::scanner::PortScanner;

/// Hands back canned nmap XML per target and remembers who was scanned.
#[derive(Clone, Default)]
pub struct CannedScanner {
    outputs: HashMap<String, String>,
    scanned: Arc<Mutex<Vec<String>>>,
}

impl CannedScanner {
    pub fn with(mut self, target: &str, xml: String) -> Self {
        self.outputs.insert(target.to_string(), xml);
        self
    }

    pub fn scanned(&self) -> Vec<String> {
        self.scanned.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortScanner for CannedScanner {
    async fn scan(&self, target: &ScanTarget, _plan: &PortPlan) -> Vec<u8> {
        self.scanned.lock().unwrap().push(target.to_string());
        self.outputs
            .get(target.as_str())
            .map(|xml| xml.as_bytes().to_vec())
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// `Write` handle whose bytes stay readable after the emitter is boxed away.
#[derive(Clone, Default)]
pub struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn targets(addrs: &[&str]) -> Vec<Result<ScanTarget>> {
    addrs.iter().map(|addr| Ok(ScanTarget::new(addr))).collect()
}

/// `(protocol, port, state, service)`
pub type PortLine<'a> = (&'a str, u16, &'a str, &'a str);

/// One-host `nmap -oX -` document.
pub fn host_xml(addr: &str, ports: &[PortLine], os_family: Option<&str>) -> String {
    let ports: String = ports
        .iter()
        .map(|(protocol, id, state, service)| {
            format!(
                r#"<port protocol="{protocol}" portid="{id}"><state state="{state}" reason="syn-ack" reason_ttl="64"/><service name="{service}" method="table" conf="3"/></port>"#
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    let os: String = os_family
        .map(|family| {
            format!(
                r#"<os><osmatch name="{family} generic" accuracy="93" line="1"><osclass type="general purpose" vendor="{family}" osfamily="{family}" accuracy="93"/></osmatch></os>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<nmaprun scanner="nmap" args="nmap {addr} -oX -" start="1718000000" version="7.94" xmloutputversion="1.05">
<verbose level="0"/>
<host starttime="1718000001" endtime="1718000002"><status state="up" reason="arp-response" reason_ttl="0"/>
<address addr="{addr}" addrtype="ipv4"/>
<hostnames></hostnames>
<ports>{ports}</ports>
{os}
</host>
<runstats><finished time="1718000002" exit="success"/><hosts up="1" down="0" total="1"/></runstats>
</nmaprun>
"#
    )
}

/// A run where nmap found nothing to report.
pub fn empty_run_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="nmap 10.0.0.250 -oX -" start="1718000000">
<runstats><finished time="1718000003" exit="success"/><hosts up="0" down="1" total="1"/></runstats>
</nmaprun>
"#
    .to_string()
}
