/// Preview window and CSV download
///
/// Both operate on a borrowed result owned by the session:
/// - The preview shows the header and at most `PREVIEW_ROWS` data rows
/// - The download writes the header and every row back out as CSV
use crate::request::UNNAMED;
use crate::session::CompletedExport;
use crate::tabular::{DELIMITER, TabularResult};
use log::debug;
use serde_json::json;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const PREVIEW_ROWS: usize = 250;

/// Bounded, read-only view of a result
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    header: &'a [String],
    rows: &'a [Vec<String>],
    total_rows: usize,
}

impl<'a> Preview<'a> {
    pub fn new(result: &'a TabularResult) -> Self {
        let shown = result.rows.len().min(PREVIEW_ROWS);
        Self { header: &result.header, rows: &result.rows[..shown], total_rows: result.rows.len() }
    }

    pub fn header(&self) -> &'a [String] {
        self.header
    }

    pub fn rows(&self) -> &'a [Vec<String>] {
        self.rows
    }

    /// Rows shown: `min(total_rows, PREVIEW_ROWS)`
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }

    pub fn caption(&self) -> String {
        format!("Previewing {} Records", self.count())
    }

    pub fn to_json(&self, name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "total_rows": self.total_rows,
            "preview_rows": self.count(),
            "header": self.header,
            "rows": self.rows,
        })
    }
}

fn join_cells(cells: &[String]) -> String {
    cells.join(&DELIMITER.to_string())
}

/// Serialize header and all rows; cells are written without escaping
pub fn serialize(result: &TabularResult) -> String {
    if result.is_empty() {
        return String::new();
    }
    std::iter::once(join_cells(&result.header))
        .chain(result.rows.iter().map(|row| join_cells(row)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<display-name>.csv`, with characters that would escape the directory replaced
pub fn file_name(display_name: &str) -> String {
    let cleaned: String =
        display_name.trim().chars().map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c }).collect();
    let stem = match cleaned.as_str() {
        "" | "." | ".." => UNNAMED,
        s => s,
    };
    format!("{}.csv", stem)
}

/// Write the full export into `dir` and return the final path.
///
/// The data goes to a temporary file in `dir` first and is renamed into
/// place; the temporary file is removed if anything fails.
pub fn save_csv(export: &CompletedExport, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let target = dir.join(file_name(&export.display_name));

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(serialize(&export.result).as_bytes())?;
    temp.flush()?;
    temp.persist(&target).map_err(|e| e.error)?;

    debug!("saved {} rows to {:?}", export.result.row_count(), target);
    Ok(target)
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;
