#![cfg(test)]
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use portsweep_common::config::NmapOptions;
use portsweep_common::error::{Result, SweepError};
use portsweep_common::network::ports::PortPlan;
use portsweep_common::network::target::ScanTarget;
use portsweep_common::report::HostResult;
use portsweep_core::pipeline::{self, Sweep, SweepSummary};
use portsweep_core::report::{CsvSink, ReportEmitter, TabularEmitter, TextEmitter, open_output_file};
use portsweep_core::scanner::NmapScanner;
use tempfile::TempDir;

use crate::fixtures::{CannedScanner, SharedBuffer, empty_run_xml, host_xml, targets};

fn plan() -> PortPlan {
    PortPlan::parse("22,80", "53").unwrap()
}

/// CSV emitter over a fresh `output_<t>.csv`, header already written.
fn csv_emitter(dir: &TempDir, plan: &PortPlan) -> (Box<dyn ReportEmitter>, PathBuf) {
    let (file, path, fresh) = open_output_file(dir.path(), 1_718_000_000).unwrap();
    assert!(fresh);
    let mut emitter: TabularEmitter = TabularEmitter::new(Box::new(CsvSink::<File>::new(file)), plan);
    emitter.write_header().unwrap();
    (Box::new(emitter), path)
}

fn lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

struct FailingEmitter;

impl ReportEmitter for FailingEmitter {
    fn emit_host(&mut self, host: &HostResult) -> Result<()> {
        Err(SweepError::write(format!("{}: disk full", host.address())))
    }
}

struct ClosedOutputEmitter;

impl ReportEmitter for ClosedOutputEmitter {
    fn emit_host(&mut self, _host: &HostResult) -> Result<()> {
        Err(SweepError::config("output file was removed"))
    }
}

#[tokio::test]
async fn typed_port_order_still_lines_up_with_nmap_rows() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let plan: PortPlan = PortPlan::parse("443,80,80", "").unwrap();
    let (emitter, path) = csv_emitter(&dir, &plan);

    // nmap lists ports ascending, whatever order they were requested in.
    let scanner: CannedScanner = CannedScanner::default().with(
        "10.0.0.1",
        host_xml("10.0.0.1", &[("tcp", 80, "open", "http"), ("tcp", 443, "closed", "https")], None),
    );

    let mut sweep: Sweep = Sweep::new(Box::new(scanner), emitter, plan);
    sweep.run(targets(&["10.0.0.1"])).await.unwrap();

    assert_eq!(lines(&path), vec!["address,tcp/80,tcp/443", "10.0.0.1,open,closed"]);
}

#[tokio::test]
async fn fatal_emitter_error_stops_the_sweep() {
    let scanner: CannedScanner = CannedScanner::default()
        .with("10.0.0.1", host_xml("10.0.0.1", &[("tcp", 22, "open", "ssh")], None))
        .with("10.0.0.2", host_xml("10.0.0.2", &[("tcp", 22, "open", "ssh")], None));

    let mut sweep: Sweep = Sweep::new(Box::new(scanner.clone()), Box::new(ClosedOutputEmitter), plan());
    let err: SweepError = sweep.run(targets(&["10.0.0.1", "10.0.0.2"])).await.unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert_eq!(scanner.scanned(), vec!["10.0.0.1"]);
}

#[tokio::test]
async fn csv_rows_line_up_with_header() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let plan: PortPlan = plan();
    let (emitter, path) = csv_emitter(&dir, &plan);

    let scanner: CannedScanner = CannedScanner::default()
        .with(
            "10.0.0.1",
            host_xml(
                "10.0.0.1",
                &[("tcp", 22, "open", "ssh"), ("tcp", 80, "closed", "http"), ("udp", 53, "open", "domain")],
                None,
            ),
        )
        .with(
            "10.0.0.2",
            host_xml(
                "10.0.0.2",
                &[("tcp", 22, "filtered", "ssh"), ("tcp", 80, "open", "http"), ("udp", 53, "open|filtered", "domain")],
                None,
            ),
        );

    let mut sweep: Sweep = Sweep::new(Box::new(scanner.clone()), emitter, plan.clone());
    let summary: SweepSummary = sweep.run(targets(&["10.0.0.1", " 10.0.0.2\u{a0}"])).await.unwrap();

    assert_eq!(
        summary,
        SweepSummary {
            targets: 2,
            hosts: 2,
            open_ports: 3,
            write_failures: 0,
        }
    );
    assert_eq!(scanner.scanned(), vec!["10.0.0.1", "10.0.0.2"]);

    let lines: Vec<String> = lines(&path);
    assert_eq!(
        lines,
        vec![
            "address,tcp/22,tcp/80,udp/53",
            "10.0.0.1,open,closed,open",
            "10.0.0.2,filtered,open,open|filtered",
        ]
    );
    for line in &lines {
        assert_eq!(line.split(',').count(), plan.header().len());
    }
}

#[tokio::test]
async fn parse_failure_stops_sweep_and_keeps_written_rows() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let plan: PortPlan = plan();
    let (emitter, path) = csv_emitter(&dir, &plan);

    let scanner: CannedScanner = CannedScanner::default()
        .with(
            "10.0.0.1",
            host_xml(
                "10.0.0.1",
                &[("tcp", 22, "open", "ssh"), ("tcp", 80, "closed", "http"), ("udp", 53, "open", "domain")],
                None,
            ),
        )
        .with("10.0.0.2", "<nmaprun scanner=\"nmap\"><host><ports>".to_string())
        .with("10.0.0.3", empty_run_xml());

    let mut sweep: Sweep = Sweep::new(Box::new(scanner.clone()), emitter, plan);
    let result = sweep.run(targets(&["10.0.0.1", "10.0.0.2", "10.0.0.3"])).await;

    let err: SweepError = result.unwrap_err();
    assert!(matches!(err, SweepError::Parse(_)));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(scanner.scanned(), vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(lines(&path), vec!["address,tcp/22,tcp/80,udp/53", "10.0.0.1,open,closed,open"]);
}

#[tokio::test]
async fn silent_scanner_is_a_parse_failure() {
    let scanner: CannedScanner = CannedScanner::default();
    let mut sweep: Sweep = Sweep::new(
        Box::new(scanner),
        Box::new(TextEmitter::new(SharedBuffer::default())),
        plan(),
    );

    let result = sweep.run(targets(&["10.0.0.9"])).await;
    assert!(matches!(result, Err(SweepError::Parse(_))));
}

#[tokio::test]
async fn missing_nmap_binary_ends_as_parse_failure() {
    let options: NmapOptions = NmapOptions {
        binary: "/nonexistent/nmap".to_string(),
        elevate: None,
        ..NmapOptions::default()
    };
    let mut sweep: Sweep = Sweep::new(
        Box::new(NmapScanner::new(options)),
        Box::new(TextEmitter::new(SharedBuffer::default())),
        plan(),
    );

    let err: SweepError = sweep.run(targets(&["127.0.0.1"])).await.unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn write_failures_are_counted_not_fatal() {
    let scanner: CannedScanner = CannedScanner::default()
        .with("10.0.0.1", host_xml("10.0.0.1", &[("tcp", 22, "open", "ssh")], None))
        .with("10.0.0.2", host_xml("10.0.0.2", &[("tcp", 22, "closed", "ssh")], None));

    let mut sweep: Sweep = Sweep::new(Box::new(scanner.clone()), Box::new(FailingEmitter), plan());
    let summary: SweepSummary = sweep.run(targets(&["10.0.0.1", "10.0.0.2"])).await.unwrap();

    assert_eq!(summary.hosts, 2);
    assert_eq!(summary.write_failures, 2);
    assert_eq!(scanner.scanned().len(), 2);
}

#[tokio::test]
async fn target_source_error_aborts_before_next_scan() {
    let scanner: CannedScanner = CannedScanner::default()
        .with("10.0.0.1", host_xml("10.0.0.1", &[("tcp", 22, "open", "ssh")], None));
    let mut sweep: Sweep = Sweep::new(
        Box::new(scanner.clone()),
        Box::new(TextEmitter::new(SharedBuffer::default())),
        plan(),
    );

    let input: Vec<Result<ScanTarget>> = vec![
        Ok(ScanTarget::new("10.0.0.1")),
        Err(SweepError::config("sheet 'Plant B' could not be read")),
        Ok(ScanTarget::new("10.0.0.3")),
    ];
    let err: SweepError = sweep.run(input).await.unwrap_err();

    assert!(matches!(err, SweepError::Configuration(_)));
    assert_eq!(scanner.scanned(), vec!["10.0.0.1"]);
}

#[tokio::test]
async fn text_mode_lists_open_ports_and_os_guesses() {
    let buffer: SharedBuffer = SharedBuffer::default();
    let scanner: CannedScanner = CannedScanner::default()
        .with(
            "10.0.0.1",
            host_xml(
                "10.0.0.1",
                &[("tcp", 22, "open", "ssh"), ("tcp", 80, "closed", "http")],
                Some("Linux"),
            ),
        )
        .with("10.0.0.2", host_xml("10.0.0.2", &[("tcp", 22, "filtered", "ssh")], None))
        .with("10.0.0.3", empty_run_xml());

    let mut sweep: Sweep = Sweep::new(
        Box::new(scanner),
        Box::new(TextEmitter::new(buffer.clone())),
        plan(),
    );
    let summary: SweepSummary = sweep
        .run(targets(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]))
        .await
        .unwrap();

    assert_eq!(summary.targets, 3);
    assert_eq!(summary.hosts, 2);
    assert_eq!(summary.open_ports, 1);
    assert_eq!(
        buffer.contents(),
        "10.0.0.1\n\
         Open ports:\n\
         - 22\tssh\t\t\n\
         Matching OSes:\n\
         - Linux\tLinux\tgeneral purpose\t93\n\
         \n\
         10.0.0.2\n\
         No open ports.\n\
         \n"
    );
}

#[tokio::test]
async fn progress_callback_sees_every_target_in_order() {
    let seen: Arc<Mutex<Vec<(usize, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let record = seen.clone();

    let scanner: CannedScanner = CannedScanner::default()
        .with("10.0.0.1", empty_run_xml())
        .with("10.0.0.2", empty_run_xml());
    let mut sweep: Sweep = Sweep::new(
        Box::new(scanner),
        Box::new(TextEmitter::new(SharedBuffer::default())),
        plan(),
    )
    .with_progress(Box::new(move |index: usize, target: &ScanTarget| {
        record.lock().unwrap().push((index, target.to_string()));
    }));

    sweep.run(targets(&["10.0.0.1", "10.0.0.2"])).await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(1, "10.0.0.1".to_string()), (2, "10.0.0.2".to_string())]
    );
}

#[test]
fn saved_report_is_emitted_like_a_live_scan() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let plan: PortPlan = plan();
    let (mut emitter, path) = csv_emitter(&dir, &plan);

    let xml: String = host_xml(
        "192.168.0.32",
        &[("tcp", 22, "open", "ssh"), ("tcp", 80, "closed", "http"), ("udp", 53, "closed", "domain")],
        Some("Linux"),
    );
    let summary: SweepSummary = pipeline::report_bytes(xml.as_bytes(), emitter.as_mut()).unwrap();
    drop(emitter);

    assert_eq!(summary.hosts, 1);
    assert_eq!(summary.open_ports, 1);
    assert_eq!(lines(&path)[1], "192.168.0.32,open,closed,closed");
}

#[test]
fn rerun_appends_without_second_header() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let plan: PortPlan = plan();
    let (mut first, path) = csv_emitter(&dir, &plan);
    let xml: String = host_xml("10.0.0.1", &[("tcp", 22, "open", "ssh")], None);
    pipeline::report_bytes(xml.as_bytes(), first.as_mut()).unwrap();
    drop(first);

    let (file, _, fresh) = open_output_file(dir.path(), 1_718_000_000).unwrap();
    assert!(!fresh);
    let mut second: TabularEmitter = TabularEmitter::new(Box::new(CsvSink::new(file)), &plan);
    pipeline::report_bytes(xml.as_bytes(), &mut second).unwrap();
    drop(second);

    assert_eq!(
        lines(&path),
        vec!["address,tcp/22,tcp/80,udp/53", "10.0.0.1,open", "10.0.0.1,open"]
    );
}
