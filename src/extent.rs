//! Populated-extent detection.
//!
//! The export rectangle is defined by two probe scans: row 2 fixes the last
//! data column, column 1 fixes the last data row. Both scans stop at the
//! first blank cell under the shared [`CellValue::is_blank`] predicate, so
//! a zero or empty-string value in a probe position truncates detection.
//! That is a documented limitation of the probe scheme, not something this
//! module papers over.

use crate::grid::Grid;

/// The inclusive rectangle of data to export, anchored at row 2, column 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Last populated column per the row-2 scan.
    pub last_column: u32,
    /// Last populated row per the column-1 scan.
    pub last_row: u32,
}

impl Extent {
    /// Run both probe scans against a grid.
    pub fn detect(grid: &Grid) -> Self {
        Self {
            last_column: last_data_column(grid),
            last_row: last_data_row(grid),
        }
    }

    /// Whether the rectangle contains no exportable rows or columns.
    pub fn is_degenerate(&self) -> bool {
        self.last_column == 0 || self.last_row < 2
    }
}

/// Last column containing a non-blank cell in row 2.
///
/// Scans row 2 left to right with a counter starting at 0: each non-blank
/// cell advances the counter, the first blank one ends the scan. A fully
/// populated row returns the grid's physical width.
pub fn last_data_column(grid: &Grid) -> u32 {
    let mut last = 0;

    for col in 1..=grid.column_count() {
        if grid.value(2, col).is_blank() {
            return last;
        }
        last += 1;
    }

    last
}

/// Last row containing a non-blank cell in column 1.
///
/// Scans column 1 downward from row 2 with a counter starting at 1 (not 0,
/// unlike the column scan): each non-blank cell advances the counter, the
/// first blank one ends the scan. M populated cells therefore yield M + 1.
/// The asymmetry is deliberate; the export range `2..=last_row` relies on
/// it to emit exactly M records.
pub fn last_data_row(grid: &Grid) -> u32 {
    let mut last = 1;

    for row in 2..=grid.row_count() {
        if grid.value(row, 1).is_blank() {
            return last;
        }
        last += 1;
    }

    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    /// Header in row 1, probe row 2, probe column 1, `rows` data rows of
    /// `cols` columns.
    fn populated_grid(rows: u32, cols: u32) -> Grid {
        let mut grid = Grid::new();
        for col in 1..=cols {
            grid.set(1, col, text(&format!("h{}", col)));
        }
        for row in 2..=(rows + 1) {
            for col in 1..=cols {
                grid.set(row, col, text(&format!("r{}c{}", row, col)));
            }
        }
        grid
    }

    #[test]
    fn test_last_column_counts_consecutive_cells() {
        // K populated cells in row 2 followed by a blank => last_column == K
        let mut grid = populated_grid(3, 5);
        grid.set(2, 4, CellValue::Empty);
        assert_eq!(last_data_column(&grid), 3);
    }

    #[test]
    fn test_last_column_fully_populated() {
        let grid = populated_grid(3, 5);
        assert_eq!(last_data_column(&grid), 5);
    }

    #[test]
    fn test_last_column_leading_blank_yields_zero() {
        let mut grid = populated_grid(3, 3);
        grid.set(2, 1, CellValue::Empty);
        assert_eq!(last_data_column(&grid), 0);
    }

    #[test]
    fn test_last_column_zero_truncates() {
        // Numeric zero in the probe row reads as blank
        let mut grid = populated_grid(3, 4);
        grid.set(2, 3, CellValue::Number(0.0));
        assert_eq!(last_data_column(&grid), 2);
    }

    #[test]
    fn test_last_row_off_by_one() {
        // M populated cells in column 1 from row 2 => last_row == M + 1
        let mut grid = populated_grid(5, 3);
        grid.set(5, 1, CellValue::Empty);
        // Rows 2..=4 populated in column 1: M = 3
        assert_eq!(last_data_row(&grid), 4);
    }

    #[test]
    fn test_last_row_fully_populated() {
        // 5 data rows, column 1 populated throughout: M = 5
        let grid = populated_grid(5, 3);
        assert_eq!(last_data_row(&grid), 6);
    }

    #[test]
    fn test_last_row_blank_at_start() {
        let mut grid = populated_grid(3, 3);
        grid.set(2, 1, CellValue::Empty);
        assert_eq!(last_data_row(&grid), 1);
    }

    #[test]
    fn test_last_row_empty_string_truncates() {
        let mut grid = populated_grid(4, 2);
        grid.set(3, 1, text(""));
        assert_eq!(last_data_row(&grid), 2);
    }

    #[test]
    fn test_detect_empty_grid() {
        let grid = Grid::new();
        let extent = Extent::detect(&grid);
        assert_eq!(
            extent,
            Extent {
                last_column: 0,
                last_row: 1
            }
        );
        assert!(extent.is_degenerate());
    }

    #[test]
    fn test_detect_spec_example() {
        // Row 2: 3 populated cells; column 1 from row 2: 3 populated cells
        let grid = populated_grid(3, 3);
        let extent = Extent::detect(&grid);
        assert_eq!(extent.last_column, 3);
        assert_eq!(extent.last_row, 4);
        assert!(!extent.is_degenerate());
    }
}
