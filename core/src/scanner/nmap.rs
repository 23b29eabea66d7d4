use std::process::{Output, Stdio};

use async_trait::async_trait;
use is_root::is_root;
use portsweep_common::config::NmapOptions;
use portsweep_common::error::SweepError;
use portsweep_common::network::ports::{PortPlan, Protocol};
use portsweep_common::network::target::ScanTarget;
use tokio::process::Command;
use tracing::{debug, error};

use super::PortScanner;

/// Invokes nmap once per target, XML on stdout.
pub struct NmapScanner {
    options: NmapOptions,
    elevate: bool,
}

impl NmapScanner {
    pub fn new(options: NmapOptions) -> Self {
        let elevate: bool = options.elevate.is_some() && !is_root();
        Self { options, elevate }
    }

    /// Program and arguments for one target, shaped like
    /// `sudo nmap <addr> -p T:..,U:.. -sU -sT -d --append-output --max-retries 8 -oX -`.
    pub fn command_line(&self, target: &ScanTarget, plan: &PortPlan) -> (String, Vec<String>) {
        let mut args: Vec<String> = vec![
            target.to_string(),
            "-p".to_string(),
            plan.nmap_spec(),
        ];

        if plan.has(Protocol::Udp) {
            args.push("-sU".to_string());
        }
        if plan.has(Protocol::Tcp) {
            args.push("-sT".to_string());
        }
        args.push("-d".to_string());
        if self.options.append_output {
            args.push("--append-output".to_string());
        }
        args.extend([
            "--max-retries".to_string(),
            self.options.max_retries.to_string(),
            "-oX".to_string(),
            "-".to_string(),
        ]);

        match self.options.elevate.as_ref().filter(|_| self.elevate) {
            Some(wrapper) => {
                args.insert(0, self.options.binary.clone());
                (wrapper.clone(), args)
            }
            None => (self.options.binary.clone(), args),
        }
    }
}

#[async_trait]
impl PortScanner for NmapScanner {
    async fn scan(&self, target: &ScanTarget, plan: &PortPlan) -> Vec<u8> {
        let (program, args) = self.command_line(target, plan);
        debug!(addr = %target, "running {} {}", program, args.join(" "));

        let result: std::io::Result<Output> = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output: Output = match result {
            Ok(output) => output,
            Err(e) => {
                let err = SweepError::ExternalProcess {
                    program,
                    target: target.to_string(),
                    reason: format!("could not start: {e}"),
                };
                error!("{err}");
                return Vec::new();
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if output.status.success() {
            if !stderr.trim().is_empty() {
                debug!(addr = %target, "nmap stderr: {}", stderr.trim());
            }
        } else {
            let err = SweepError::ExternalProcess {
                program,
                target: target.to_string(),
                reason: format!("{} ({})", output.status, stderr.trim()),
            };
            error!("{err}");
        }

        output.stdout
    }

    fn name(&self) -> &str {
        &self.options.binary
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
