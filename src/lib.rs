//! # xl2csv
//!
//! Excel workbook to CSV conversion with populated-extent detection.
//!
//! The pipeline is a single linear pass: load the active sheet of an xlsx
//! workbook into a cell grid, detect the rectangle of populated data (row 2
//! fixes the last column, column 1 fixes the last row), then stream the
//! rectangle as CSV records with string cells trimmed.
//!
//! ## Quick Start
//!
//! ```no_run
//! // One-call conversion: writes `data.csv` in the current directory.
//! let summary = xl2csv::convert_file("data.xlsx")?;
//! println!("Wrote {} rows to '{}'", summary.rows, summary.output.display());
//! # Ok::<(), xl2csv::Error>(())
//! ```
//!
//! ## Composed pipeline
//!
//! ```no_run
//! use xl2csv::{Extent, ExportOptions, WorkbookParser};
//!
//! let mut parser = WorkbookParser::open("data.xlsx")?;
//! let grid = parser.parse_active_sheet()?;
//! let extent = Extent::detect(&grid);
//!
//! let mut writer = ExportOptions::new().writer(std::io::stdout());
//! let rows = xl2csv::write_rows(&grid, extent, &mut writer, |_| {})?;
//! writer.flush()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod container;
pub mod detect;
pub mod error;
pub mod export;
pub mod extent;
pub mod grid;
pub mod workbook;

// Re-exports
pub use container::XlsxContainer;
pub use error::{Error, Result};
pub use export::{
    convert_file, convert_file_with, output_name, write_rows, ExportOptions, QuoteMode, Summary,
};
pub use extent::{last_data_column, last_data_row, Extent};
pub use grid::{CellValue, Grid};
pub use workbook::WorkbookParser;
