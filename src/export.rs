//! CSV export: row streaming, field cleaning, and output naming.

use crate::error::Result;
use crate::extent::Extent;
use crate::grid::{CellValue, Grid};
use crate::workbook::WorkbookParser;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Quoting policy for CSV fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteMode {
    /// Quote only fields that need it (default).
    #[default]
    Minimal,
    /// Quote every non-numeric field.
    NonNumeric,
    /// Quote every field.
    Always,
    /// Never quote.
    Never,
}

impl From<QuoteMode> for csv::QuoteStyle {
    fn from(mode: QuoteMode) -> Self {
        match mode {
            QuoteMode::Minimal => csv::QuoteStyle::Necessary,
            QuoteMode::NonNumeric => csv::QuoteStyle::NonNumeric,
            QuoteMode::Always => csv::QuoteStyle::Always,
            QuoteMode::Never => csv::QuoteStyle::Never,
        }
    }
}

/// Options for CSV export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Field quoting policy.
    pub quote: QuoteMode,
}

impl ExportOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quoting policy.
    pub fn with_quote(mut self, quote: QuoteMode) -> Self {
        self.quote = quote;
        self
    }

    /// Build a CSV writer over `w` honoring these options.
    pub fn writer<W: Write>(&self, w: W) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .quote_style(self.quote.into())
            .from_writer(w)
    }
}

/// Result of a completed conversion.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Number of CSV records written.
    pub rows: u64,
    /// Path of the CSV file produced.
    pub output: PathBuf,
}

/// Derive the output CSV name from an input path.
///
/// The leading directories and the extension are stripped and `.csv` is
/// appended; the result is relative, so it lands in the current working
/// directory.
pub fn output_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{}.csv", stem))
}

/// Clean a cell for output: text cells are trimmed, everything else passes
/// through unchanged.
fn clean_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.trim().to_string(),
        other => other.render(),
    }
}

/// Stream the extent rectangle as CSV records.
///
/// Rows `2..=extent.last_row` are emitted, one record of
/// `extent.last_column` fields each. `observer` is called once per written
/// record with the running count; it has no effect on the output. Returns
/// the number of records written. A zero-column extent writes nothing.
pub fn write_rows<W: Write>(
    grid: &Grid,
    extent: Extent,
    writer: &mut csv::Writer<W>,
    mut observer: impl FnMut(u64),
) -> Result<u64> {
    let mut count = 0u64;

    if extent.last_column == 0 {
        return Ok(count);
    }

    for row in 2..=extent.last_row {
        let record: Vec<String> = (1..=extent.last_column)
            .map(|col| clean_field(grid.value(row, col)))
            .collect();
        writer.write_record(&record)?;
        count += 1;
        observer(count);
    }

    Ok(count)
}

/// Convert a workbook file to a CSV in the current working directory.
pub fn convert_file(path: impl AsRef<Path>) -> Result<Summary> {
    convert_file_with(path, ExportOptions::default(), |_| {})
}

/// Convert a workbook file with explicit options and a per-row observer.
pub fn convert_file_with(
    path: impl AsRef<Path>,
    options: ExportOptions,
    observer: impl FnMut(u64),
) -> Result<Summary> {
    let path = path.as_ref();

    let mut parser = WorkbookParser::open(path)?;
    let grid = parser.parse_active_sheet()?;
    let extent = Extent::detect(&grid);

    let output = output_name(path);
    let file = std::fs::File::create(&output)?;
    let mut writer = options.writer(file);

    let rows = write_rows(&grid, extent, &mut writer, observer)?;
    writer.flush()?;

    Ok(Summary { rows, output })
}
