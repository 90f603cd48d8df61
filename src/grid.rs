//! Worksheet grid model.
//!
//! A [`Grid`] is the loader's output: a 1-indexed, read-only table of
//! formula-evaluated cell values for one worksheet. Downstream components
//! (extent detection, CSV export) only ever read from it.

/// A single evaluated cell value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    /// No value stored for this position.
    #[default]
    Empty,
    /// A text cell (shared, inline, or formula string result).
    Text(String),
    /// A numeric cell.
    Number(f64),
    /// A boolean cell.
    Bool(bool),
    /// A date or datetime cell, rendered as an ISO-8601 string.
    DateTime(String),
}

impl CellValue {
    /// The single blank predicate used by both extent scans.
    ///
    /// A cell is blank when it is empty, an empty string, or numeric zero.
    /// Treating zero as blank matches the truthiness rule the scans were
    /// specified with: a legitimate `0` in row 2 or column 1 truncates
    /// detection. Zero cells inside the export rectangle are unaffected.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0,
            CellValue::Bool(_) => false,
            CellValue::DateTime(s) => s.is_empty(),
        }
    }

    /// Render the value as a CSV field.
    ///
    /// Integral numbers are rendered without a fractional part so a cell
    /// holding 500 comes out as `500`, not `500.0`.
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
            CellValue::DateTime(s) => s.clone(),
        }
    }
}

/// A 1-indexed, sparse worksheet grid.
///
/// Positions outside the populated region read as [`CellValue::Empty`].
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: u32,
}

const EMPTY: CellValue = CellValue::Empty;

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value at a 1-indexed (row, column) position.
    ///
    /// The grid grows as needed; gaps are filled with empty cells.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        let r = (row - 1) as usize;
        let c = (col - 1) as usize;
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize_with(c + 1, CellValue::default);
        }
        cells[c] = value;
        self.width = self.width.max(col);
    }

    /// Read the value at a 1-indexed (row, column) position.
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get((row - 1) as usize)
            .and_then(|cells| cells.get((col - 1) as usize))
            .unwrap_or(&EMPTY)
    }

    /// Physical height: the highest row index holding any stored cell.
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Physical width: the highest column index holding any stored cell.
    pub fn column_count(&self) -> u32 {
        self.width
    }

    /// Whether no cells have been stored at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
