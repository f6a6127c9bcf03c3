//! Material flags inferred from cell background fills
//!
//! The export marks suitable materials by coloring the flag cell instead of
//! writing a value. Empty flag cells become `1` when filled and `0` otherwise.

use crate::schema::{BOOLEAN_COLUMNS, FIRST_DATA_ROW, KEY_COLUMN};
use crate::types::{CellValue, Grid};

/// Last row holding a value in the key column, if any
pub fn last_key_row(grid: &Grid) -> Option<usize> {
    (0..grid.height())
        .rev()
        .find(|&row| !grid.value(row, KEY_COLUMN).is_empty())
}

/// Fill empty flag cells from their background. Returns the number of cells set.
///
/// Rows without a key value are skipped. An entirely empty key column means
/// zero rows are processed.
pub fn populate_booleans(grid: &mut Grid) -> usize {
    let Some(last_row) = last_key_row(grid) else {
        return 0;
    };

    let mut populated = 0;
    for row in FIRST_DATA_ROW..=last_row {
        if grid.value(row, KEY_COLUMN).is_empty() {
            continue;
        }

        for col in BOOLEAN_COLUMNS {
            if grid.value(row, col).is_empty() {
                let flag = if grid.has_fill(row, col) { 1 } else { 0 };
                grid.set_value(row, col, CellValue::Int(flag));
                populated += 1;
            }
        }
    }
    populated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
    use std::collections::HashSet;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_fills_empty_flags_from_background() {
        let cells = vec![
            Cell::new(0, KEY_COLUMN, text("Title")),
            Cell::new(1, KEY_COLUMN, text("Drill")),
            Cell::new(1, 4, CellValue::Int(7)),
        ];
        let filled: HashSet<_> = [(1, 3), (1, 4), (1, 7)].into_iter().collect();
        let mut grid = Grid::from_cells(cells, filled);

        let populated = populate_booleans(&mut grid);

        assert_eq!(populated, 4);
        assert_eq!(grid.value(1, 3), &CellValue::Int(1));
        // Existing values are kept even when the cell is filled
        assert_eq!(grid.value(1, 4), &CellValue::Int(7));
        assert_eq!(grid.value(1, 5), &CellValue::Int(0));
        assert_eq!(grid.value(1, 6), &CellValue::Int(0));
        assert_eq!(grid.value(1, 7), &CellValue::Int(1));
        // Title row is never touched
        assert_eq!(grid.value(0, 3), &CellValue::Empty);
    }

    #[test]
    fn test_rows_without_key_are_skipped() {
        let cells = vec![
            Cell::new(1, KEY_COLUMN, text("Drill")),
            Cell::new(2, 0, text("note")),
            Cell::new(3, KEY_COLUMN, text("Mill")),
        ];
        let mut grid = Grid::from_cells(cells, HashSet::new());

        assert_eq!(populate_booleans(&mut grid), 10);
        for col in BOOLEAN_COLUMNS {
            assert_eq!(grid.value(2, col), &CellValue::Empty);
            assert_eq!(grid.value(3, col), &CellValue::Int(0));
        }
    }

    #[test]
    fn test_empty_key_column_processes_nothing() {
        let cells = vec![Cell::new(1, 0, text("orphan"))];
        let mut grid = Grid::from_cells(cells, HashSet::new());

        assert_eq!(last_key_row(&grid), None);
        assert_eq!(populate_booleans(&mut grid), 0);
        assert_eq!(grid.width(), 1);
    }

    #[test]
    fn test_last_key_row() {
        let cells = vec![
            Cell::new(1, KEY_COLUMN, text("a")),
            Cell::new(4, KEY_COLUMN, text("b")),
            Cell::new(6, 0, text("trailing")),
        ];
        let grid = Grid::from_cells(cells, HashSet::new());
        assert_eq!(last_key_row(&grid), Some(4));
    }
}
