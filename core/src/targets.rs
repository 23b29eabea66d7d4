//! # Target Source
//!
//! Reads scan targets from a spreadsheet workbook (`.xlsx`, `.xls`, `.xlsb`,
//! `.ods`). Sheets are visited in workbook order, then rows, then cells; every
//! cell becomes one [`ScanTarget`].
//!
//! Sheets are loaded lazily, one at a time, as the iterator advances.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use portsweep_common::error::{Result, SweepError};
use portsweep_common::network::target::ScanTarget;
use tracing::debug;

pub struct TargetSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl TargetSource {
    /// Opens the workbook at `path`.
    ///
    /// A missing or unreadable file is a [`SweepError::Configuration`]: the
    /// run cannot start without targets.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SweepError::config(format!(
                "ensure the file {} exists",
                path.display()
            )));
        }

        let workbook = open_workbook_auto(path).map_err(|e| {
            SweepError::config(format!("cannot read workbook {}: {e}", path.display()))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Number of targets [`TargetSource::targets`] will yield. Reads every
    /// sheet once.
    pub fn target_count(&mut self) -> Result<usize> {
        let mut count: usize = 0;
        for sheet in self.workbook.sheet_names() {
            let range: Range<Data> = self
                .workbook
                .worksheet_range(&sheet)
                .map_err(|e| worksheet_error(&sheet, e))?;
            count += row_targets(&range).len();
        }
        Ok(count)
    }

    /// Consumes the source and yields targets in file order.
    pub fn targets(self) -> Targets {
        let sheets: VecDeque<String> = self.workbook.sheet_names().into();
        Targets {
            workbook: self.workbook,
            sheets,
            current: Vec::new().into_iter(),
        }
    }
}

pub struct Targets {
    workbook: Sheets<BufReader<File>>,
    sheets: VecDeque<String>,
    current: std::vec::IntoIter<ScanTarget>,
}

impl Iterator for Targets {
    type Item = Result<ScanTarget>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(target) = self.current.next() {
                return Some(Ok(target));
            }

            let sheet: String = self.sheets.pop_front()?;
            match self.workbook.worksheet_range(&sheet) {
                Ok(range) => {
                    let targets: Vec<ScanTarget> = row_targets(&range);
                    debug!(sheet = %sheet, cells = targets.len(), "loaded worksheet");
                    self.current = targets.into_iter();
                }
                Err(e) => {
                    self.sheets.clear();
                    return Some(Err(worksheet_error(&sheet, e)));
                }
            }
        }
    }
}

fn worksheet_error(sheet: &str, e: impl std::fmt::Display) -> SweepError {
    SweepError::config(format!("cannot read worksheet '{sheet}': {e}"))
}

/// Flattens one worksheet into targets, row by row.
///
/// Blank cells between populated ones pass through as empty targets. Blank
/// cells after the last populated cell of a row only exist because the sheet
/// range is rectangular, so they are dropped.
pub fn row_targets(range: &Range<Data>) -> Vec<ScanTarget> {
    let mut targets: Vec<ScanTarget> = Vec::new();

    for row in range.rows() {
        let populated: usize = row
            .iter()
            .rposition(|cell| !matches!(cell, Data::Empty))
            .map_or(0, |last| last + 1);

        targets.extend(
            row[..populated]
                .iter()
                .map(|cell| ScanTarget::new(&cell.to_string())),
        );
    }

    targets
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
