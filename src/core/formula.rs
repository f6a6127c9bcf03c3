//! Subtraction chains typed as text ("100-20-5") in the quantity columns

use crate::schema::FORMULA_COLUMNS;
use crate::types::{CellValue, Grid};
use tracing::debug;

/// Fold `a-b-c` into `a - b - c`. `None` when any part is not a number.
pub fn fold_subtraction(text: &str) -> Option<f64> {
    let mut parts = text.split('-');
    let first = parse_part(parts.next()?)?;
    parts.try_fold(first, |acc, part| Some(acc - parse_part(part)?))
}

fn parse_part(part: &str) -> Option<f64> {
    part.trim().parse::<f64>().ok()
}

/// Evaluate one cell. Cells outside the formula columns, non-text cells and
/// text without a hyphen pass through unchanged; unparseable chains keep
/// their text.
pub fn evaluate_cell(col: usize, value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(text) if FORMULA_COLUMNS.contains(&col) && text.contains('-') => {
            match fold_subtraction(text) {
                Some(result) => CellValue::Float(result),
                None => {
                    debug!(column = col, value = %text, "subtraction chain left as text");
                    value.clone()
                }
            }
        }
        _ => value.clone(),
    }
}

/// Evaluate every formula-column cell in place. Returns the number of cells folded.
pub fn evaluate_formulas(grid: &mut Grid) -> usize {
    let mut folded = 0;
    for row in 0..grid.height() {
        for col in FORMULA_COLUMNS {
            let current = grid.value(row, col);
            let evaluated = evaluate_cell(col, current);
            if &evaluated != current {
                grid.set_value(row, col, evaluated);
                folded += 1;
            }
        }
    }
    folded
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
    fn test_fold_subtraction_chain() {
        assert_eq!(fold_subtraction("100-20-5"), Some(75.0));
        assert_eq!(fold_subtraction("10.5-0.5"), Some(10.0));
        assert_eq!(fold_subtraction(" 8 - 3 "), Some(5.0));
    }

    #[test]
    fn test_fold_subtraction_failures() {
        assert_eq!(fold_subtraction("abc-5"), None);
        assert_eq!(fold_subtraction("-5"), None);
        assert_eq!(fold_subtraction("5-"), None);
        assert_eq!(fold_subtraction("5--2"), None);
    }

    #[test]
    fn test_evaluate_cell_in_formula_column() {
        assert_eq!(evaluate_cell(26, &text("100-20-5")), CellValue::Float(75.0));
        assert_eq!(evaluate_cell(29, &text("abc-5")), text("abc-5"));
        assert_eq!(evaluate_cell(27, &text("42")), text("42"));
        assert_eq!(evaluate_cell(28, &CellValue::Int(3)), CellValue::Int(3));
    }

    #[test]
    fn test_evaluate_cell_outside_formula_columns() {
        assert_eq!(evaluate_cell(25, &text("100-20")), text("100-20"));
        assert_eq!(evaluate_cell(30, &text("100-20")), text("100-20"));
        assert_eq!(evaluate_cell(0, &text("A-1")), text("A-1"));
    }

    #[test]
    fn test_evaluate_formulas_in_grid() {
        let cells = vec![
            Cell::new(1, 26, text("100-20-5")),
            Cell::new(1, 27, text("x-1")),
            Cell::new(2, 28, text("9-4")),
            Cell::new(2, 3, text("9-4")),
        ];
        let mut grid = Grid::from_cells(cells, HashSet::new());

        assert_eq!(evaluate_formulas(&mut grid), 2);
        assert_eq!(grid.value(1, 26), &CellValue::Float(75.0));
        assert_eq!(grid.value(1, 27), &text("x-1"));
        assert_eq!(grid.value(2, 28), &CellValue::Float(5.0));
        assert_eq!(grid.value(2, 3), &text("9-4"));
        assert_eq!(grid.value(1, 26).to_text().unwrap(), "75.0");
    }
}
