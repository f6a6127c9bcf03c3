use std::collections::HashSet;
use std::fmt;

use crate::error::{ToolsheetError, ToolsheetResult};

//==============================================================================
// Sheet cells
//==============================================================================

/// A raw cell value as read from the workbook
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the value as table text. `None` for empty cells.
    ///
    /// Floats always keep a fractional part (`75.0`), whole numbers read from
    /// the sheet are integers (`10`), booleans are `True`/`False`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(format!("{f:?}")),
            CellValue::Bool(true) => Some("True".to_string()),
            CellValue::Bool(false) => Some("False".to_string()),
        }
    }
}

/// A single sheet position (0-based) and its value
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: CellValue,
}

impl Cell {
    pub fn new(row: usize, col: usize, value: CellValue) -> Self {
        Self { row, col, value }
    }
}

//==============================================================================
// Grid
//==============================================================================

/// Raw rectangular cell data of the active sheet.
///
/// Rows and columns run from A1 to the last row/column holding data. Fill
/// information is kept per position so that cells created later (when a stage
/// writes past the current width) still answer [`Grid::has_fill`].
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
    filled: HashSet<(usize, usize)>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from sparse cells. Cells may arrive in any order.
    pub fn from_cells<I>(cells: I, filled: HashSet<(usize, usize)>) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut grid = Grid {
            rows: Vec::new(),
            width: 0,
            filled,
        };
        for cell in cells {
            if !cell.value.is_empty() {
                grid.set_value(cell.row, cell.col, cell.value);
            }
        }
        grid
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }

    /// Set a value, growing the grid when the position lies outside it
    pub fn set_value(&mut self, row: usize, col: usize, value: CellValue) {
        if col >= self.width {
            self.width = col + 1;
            for r in &mut self.rows {
                r.resize(self.width, CellValue::Empty);
            }
        }
        while self.rows.len() <= row {
            self.rows.push(vec![CellValue::Empty; self.width]);
        }
        self.rows[row][col] = value;
    }

    /// True when the cell carries a background fill
    pub fn has_fill(&self, row: usize, col: usize) -> bool {
        self.filled.contains(&(row, col))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}

//==============================================================================
// Tables
//==============================================================================

/// Headerless table of text fields, used between flattening and classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(records: Vec<Vec<String>>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Widest record
    pub fn width(&self) -> usize {
        self.records.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Fail unless every record has at least `min` fields
    pub fn require_width(&self, min: usize, stage: &str) -> ToolsheetResult<()> {
        if let Some((idx, record)) = self
            .records
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() < min)
        {
            return Err(ToolsheetError::Schema(format!(
                "{stage}: record {idx} has {} fields, expected at least {min}",
                record.len()
            )));
        }
        Ok(())
    }
}

/// Table with named columns. Every record has exactly one field per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> ToolsheetResult<usize> {
        self.column_index(name)
            .ok_or_else(|| ToolsheetError::Schema(format!("missing column '{name}'")))
    }

    /// Values of a column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.records.iter().map(|r| r[idx].as_str()).collect())
    }

    pub fn push_record(&mut self, record: Vec<String>) -> ToolsheetResult<()> {
        if record.len() != self.header.len() {
            return Err(ToolsheetError::Schema(format!(
                "record has {} fields, header has {}",
                record.len(),
                self.header.len()
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Insert a column at `position`; `values` must have one entry per record
    pub fn insert_column(
        &mut self,
        position: usize,
        name: &str,
        values: Vec<String>,
    ) -> ToolsheetResult<()> {
        if values.len() != self.records.len() {
            return Err(ToolsheetError::Schema(format!(
                "column '{name}' has {} values for {} records",
                values.len(),
                self.records.len()
            )));
        }
        let position = position.min(self.header.len());
        self.header.insert(position, name.to_string());
        for (record, value) in self.records.iter_mut().zip(values) {
            record.insert(position, value);
        }
        Ok(())
    }

    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> ToolsheetResult<()> {
        self.insert_column(self.header.len(), name, values)
    }

    /// Remove a column, returning its values
    pub fn drop_column(&mut self, name: &str) -> ToolsheetResult<Vec<String>> {
        let idx = self.require_column(name)?;
        self.header.remove(idx);
        Ok(self.records.iter_mut().map(|r| r.remove(idx)).collect())
    }

    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> ToolsheetResult<()> {
        let idx = self.require_column(name)?;
        for (record, value) in self.records.iter_mut().zip(values) {
            record[idx] = value;
        }
        Ok(())
    }
}

//==============================================================================
// Output categories
//==============================================================================

/// Category of an output table, decided by the inventory number prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTable {
    Tool,
    Fixture,
    ThreadMaking,
}

impl SourceTable {
    pub const ALL: [SourceTable; 3] = [
        SourceTable::Tool,
        SourceTable::Fixture,
        SourceTable::ThreadMaking,
    ];

    /// Value of the `sourcetable` field
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTable::Tool => "tool",
            SourceTable::Fixture => "fixture",
            SourceTable::ThreadMaking => "thread_making",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            SourceTable::Tool => "tool_table.csv",
            SourceTable::Fixture => "fixture_table.csv",
            SourceTable::ThreadMaking => "thread_making_table.csv",
        }
    }

    /// Tool table is written even when empty, the others only with records
    pub fn always_written(&self) -> bool {
        matches!(self, SourceTable::Tool)
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One categorized table on its way to disk
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    pub category: SourceTable,
    pub table: Table,
}

impl OutputTable {
    pub fn new(category: SourceTable, table: Table) -> Self {
        Self { category, table }
    }

    pub fn should_write(&self) -> bool {
        self.category.always_written() || !self.table.is_empty()
    }
}
