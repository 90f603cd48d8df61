//! Excel workbook loader.
//!
//! Opens an xlsx package and exposes the active sheet as a [`Grid`] of
//! evaluated cell values.
//!
//! # Example
//!
//! ```no_run
//! use xl2csv::workbook::WorkbookParser;
//!
//! let mut parser = WorkbookParser::open("data.xlsx")?;
//! let grid = parser.parse_active_sheet()?;
//! println!("{} x {}", grid.row_count(), grid.column_count());
//! # Ok::<(), xl2csv::Error>(())
//! ```
//!
//! [`Grid`]: crate::grid::Grid

mod parser;
mod shared_strings;
mod styles;

pub use parser::WorkbookParser;
