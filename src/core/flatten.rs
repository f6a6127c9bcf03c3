//! Grid → rectangular text table

use crate::error::{ToolsheetError, ToolsheetResult};
use crate::schema::SENTINEL;
use crate::types::{CellValue, Grid, RawTable};
use regex::Regex;

/// Turns the grid into sentinel-filled text
pub struct Flattener {
    whitespace_run: Regex,
}

impl Flattener {
    pub fn new() -> ToolsheetResult<Self> {
        let whitespace_run = Regex::new(r"\s\s+")
            .map_err(|e| ToolsheetError::Schema(format!("Regex error: {}", e)))?;
        Ok(Self { whitespace_run })
    }

    /// Collapse line breaks and whitespace runs into single spaces
    pub fn normalize_whitespace(&self, text: &str) -> String {
        let single_line = text.replace('\n', " ");
        self.whitespace_run
            .replace_all(&single_line, " ")
            .into_owned()
    }

    /// Text of one cell; missing values become the sentinel
    pub fn cell_text(&self, value: &CellValue) -> String {
        match value {
            CellValue::Text(text) => self.normalize_whitespace(text),
            other => other.to_text().unwrap_or_else(|| SENTINEL.to_string()),
        }
    }

    /// Convert the grid into a text table and drop trailing sentinel columns
    pub fn flatten(&self, grid: &Grid) -> RawTable {
        let records = grid
            .rows()
            .map(|row| row.iter().map(|value| self.cell_text(value)).collect())
            .collect();
        let mut table = RawTable::new(records);
        trim_empty_columns(&mut table);
        table
    }
}

/// Drop the trailing run of columns holding nothing but the sentinel.
/// Returns the number of columns removed.
pub fn trim_empty_columns(table: &mut RawTable) -> usize {
    let mut width = table.width();
    let mut removed = 0;

    while width > 0 {
        let col = width - 1;
        let all_sentinel = table
            .records
            .iter()
            .all(|record| record.get(col).map_or(true, |v| v == SENTINEL));
        if !all_sentinel {
            break;
        }
        for record in &mut table.records {
            record.truncate(col);
        }
        width = col;
        removed += 1;
    }
    removed
}
