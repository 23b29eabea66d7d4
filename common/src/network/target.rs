//! # Scan Target Model
//!
//! A single address handed to the scanner, exactly as it was found in the
//! input workbook minus surrounding whitespace. No validation happens here:
//! nmap is the judge of what is scannable.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanTarget(String);

impl ScanTarget {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScanTarget {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for ScanTarget {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
