// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use invoicer::domain::Invoice;
use rust_decimal_macros::dec;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Invoice with items [("A", 10.00, 2), ("B", 5.00, 3)] at the default 8% rate
pub fn standard_invoice() -> Invoice {
    let mut invoice = Invoice::new("Acme Corp");
    invoice.add_item("A", dec!(10.00), 2);
    invoice.add_item("B", dec!(5.00), 3);
    invoice
}

/// Helper to write a fixture file into a fresh temporary directory
pub fn write_fixture(name: &str, contents: &str) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join(name);
    fs::write(&path, contents)?;
    Ok((path, temp_dir))
}

/// Number of 40-dash separator lines in a summary
pub fn separator_count(summary: &str) -> usize {
    summary.lines().filter(|l| *l == "-".repeat(40)).count()
}
