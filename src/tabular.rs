//! Tabular payload parsing
//!
//! The export service produces plain comma-separated text with a header
//! line. There is no quoting or escaping: a comma inside a cell splits it
//! and shifts every later cell in that row. This matches what the service
//! actually emits, so the parser keeps the limitation instead of guessing.

pub const DELIMITER: char = ',';

/// Parsed header and data rows
///
/// Rows are not padded or truncated to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularResult {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularResult {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows whose cell count differs from the header
    pub fn ragged_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.len() != self.header.len()).count()
    }
}

fn split_line(line: &str) -> Vec<String> {
    line.split(DELIMITER).map(|cell| cell.to_string()).collect()
}

/// Parse delimited text; never fails
pub fn parse(raw: &str) -> TabularResult {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());

    let header = match lines.next() {
        Some(line) => split_line(line),
        None => return TabularResult::default(),
    };
    let rows = lines.map(split_line).collect();

    TabularResult { header, rows }
}

#[cfg(test)]
#[path = "tabular_test.rs"]
mod tabular_test;
