/// Console formatting module - Pure rendering concerns
///
/// This module handles:
/// - Boxed table layout for the preview and the column catalog
/// - Column width fitting against the terminal width
/// - Text truncation and padding (unicode aware)
///
/// Everything renders into any `std::io::Write`, so the same code prints
/// to stdout and into string buffers for tests.

use crate::columns::ColumnDescriptor;
use crate::preview::Preview;
use std::io::{self, Write};
use std::sync::OnceLock;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single column may get before truncation
const MAX_CELL_WIDTH: usize = 40;

/// Narrowest a column is shrunk to when fitting the terminal
const MIN_CELL_WIDTH: usize = 3;

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write text in bold when colors are on
    fn write_bold(&mut self, text: &str) -> io::Result<()> {
        if self.use_colors { write!(self.writer, "\x1b[1m{}\x1b[0m", text) } else { write!(self.writer, "{}", text) }
    }

    fn write_border(&mut self, widths: &[usize], left: char, mid: char, right: char) -> io::Result<()> {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        writeln!(self.writer, "{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn write_cells(&mut self, cells: &[String], widths: &[usize], bold: bool) -> io::Result<()> {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| truncate_with_padding(cells.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect();
        let line = format!("│ {} │", padded.join(" │ "));
        if bold {
            self.write_bold(&line)?;
        } else {
            write!(self.writer, "{}", line)?;
        }
        writeln!(self.writer)
    }

    /// Write a boxed table. Rows may be ragged; missing cells render empty.
    pub fn write_table(&mut self, header: &[String], rows: &[Vec<String>], max_width: usize) -> io::Result<()> {
        let widths = fit_column_widths(header, rows, max_width);
        if widths.is_empty() {
            return Ok(());
        }

        self.write_border(&widths, '┌', '┬', '┐')?;
        self.write_cells(header, &widths, true)?;
        self.write_border(&widths, '├', '┼', '┤')?;
        for row in rows {
            self.write_cells(row, &widths, false)?;
        }
        self.write_border(&widths, '└', '┴', '┘')
    }

    /// Write the preview caption and table
    pub fn write_preview(&mut self, preview: &Preview<'_>, max_width: usize) -> io::Result<()> {
        writeln!(self.writer, "{}", preview.caption())?;
        if preview.is_truncated() {
            writeln!(
                self.writer,
                "(showing the first {} of {} rows; the download contains all of them)",
                preview.count(),
                preview.total_rows()
            )?;
        }
        if preview.header().is_empty() {
            return writeln!(self.writer, "(the export is empty)");
        }
        self.write_table(preview.header(), preview.rows(), max_width)
    }

    /// Write the column catalog, marking selected ids
    pub fn write_catalog(
        &mut self,
        catalog: &[ColumnDescriptor],
        is_selected: impl Fn(&str) -> bool,
        max_width: usize,
    ) -> io::Result<()> {
        let header = ["", "Column", "Table", "Field", "Id"].map(String::from);
        let rows: Vec<Vec<String>> = catalog
            .iter()
            .map(|c| {
                let mark = if is_selected(c.id) { "✓" } else { "" };
                vec![
                    mark.to_string(),
                    c.label.to_string(),
                    c.table().to_string(),
                    c.field().to_string(),
                    c.id.to_string(),
                ]
            })
            .collect();
        self.write_table(&header, &rows, max_width)
    }
}

/// Natural width of each column, capped, then shrunk until the table fits
pub fn fit_column_widths(header: &[String], rows: &[Vec<String>], max_width: usize) -> Vec<usize> {
    let columns = rows.iter().map(Vec::len).chain(std::iter::once(header.len())).max().unwrap_or(0);
    let mut widths = vec![1usize; columns];

    for line in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell).min(MAX_CELL_WIDTH));
        }
    }

    // "│ " + cells joined by " │ " + " │"
    let table_width = |w: &[usize]| w.iter().sum::<usize>() + 3 * w.len() + 1;
    while table_width(&widths) > max_width {
        let Some((widest, &w)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else { break };
        if w <= MIN_CELL_WIDTH {
            break;
        }
        widths[widest] = w - 1;
    }

    widths
}

/// Print the catalog to stdout
pub fn print_catalog(catalog: &[ColumnDescriptor], is_selected: impl Fn(&str) -> bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors());
    let _ = writer.write_catalog(catalog, is_selected, console_width());
}

fn use_colors() -> bool {
    term::stdout().is_some()
}

//
// Console width
//

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Override the detected console width (first call wins)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width);
}

/// Console width override, else terminal width, else 120
pub fn console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(get_terminal_width)
}

fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() { w as usize } else { 120 }
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }

    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }

    // A wide char may leave a gap
    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }

    result
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
