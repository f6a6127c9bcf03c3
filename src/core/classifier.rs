//! Unit derivation and partition of the cleaned rows into categorized tables

use crate::error::ToolsheetResult;
use crate::schema::{
    category_header, CATEGORY_FIELD, DATA_COLUMNS, DECIMAL_EXEMPT_FIELD, FIXTURE_PREFIXES,
    NOT_APPLICABLE, THREAD_MAKING_PREFIXES, UNIT_INCH, UNIT_MM, UNIT_POSITION,
};
use crate::types::{OutputTable, RawTable, SourceTable, Table};
use tracing::warn;

/// The three categorized tables
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub tool: OutputTable,
    pub fixture: OutputTable,
    pub thread_making: OutputTable,
}

impl Classified {
    pub fn into_tables(self) -> [OutputTable; 3] {
        [self.tool, self.fixture, self.thread_making]
    }

    pub fn get(&self, category: SourceTable) -> &OutputTable {
        match category {
            SourceTable::Tool => &self.tool,
            SourceTable::Fixture => &self.fixture,
            SourceTable::ThreadMaking => &self.thread_making,
        }
    }
}

/// `inch` when the second character of the inventory number is `2`
pub fn derive_unit(inventory_number: &str) -> &'static str {
    if inventory_number.chars().nth(1) == Some('2') {
        UNIT_INCH
    } else {
        UNIT_MM
    }
}

/// Comma decimal separators become periods, except for `N/A`
pub fn normalize_decimal(value: &str) -> String {
    if value == NOT_APPLICABLE {
        value.to_string()
    } else {
        value.replace(',', ".")
    }
}

/// Category of a record by its inventory number prefix
pub fn categorize(inventory_number: &str) -> SourceTable {
    if FIXTURE_PREFIXES
        .iter()
        .any(|prefix| inventory_number.starts_with(prefix))
    {
        SourceTable::Fixture
    } else if THREAD_MAKING_PREFIXES
        .iter()
        .any(|prefix| inventory_number.starts_with(prefix))
    {
        SourceTable::ThreadMaking
    } else {
        SourceTable::Tool
    }
}

/// Rewrite decimals and insert the derived unit field
fn shape_record(mut record: Vec<String>) -> Vec<String> {
    for (idx, field) in record.iter_mut().enumerate() {
        if idx != DECIMAL_EXEMPT_FIELD {
            *field = normalize_decimal(field);
        }
    }
    let unit = derive_unit(&record[CATEGORY_FIELD]);
    record.insert(UNIT_POSITION, unit.to_string());
    record
}

/// Fit a record to the data columns and append its `sourcetable` value
fn finish_record(mut record: Vec<String>, category: SourceTable, idx: usize) -> Vec<String> {
    if record.len() != DATA_COLUMNS.len() {
        warn!(
            record = idx,
            fields = record.len(),
            expected = DATA_COLUMNS.len(),
            "record width differs from the category header"
        );
        record.resize(DATA_COLUMNS.len(), String::new());
    }
    record.push(category.as_str().to_string());
    record
}

/// Drop the residual header and trailer records, derive `unit`, rewrite
/// decimal separators and partition the rows by inventory number.
pub fn classify(mut table: RawTable) -> ToolsheetResult<Classified> {
    if !table.is_empty() {
        table.records.remove(0);
    }
    table.records.pop();
    table.require_width(CATEGORY_FIELD + 1, "classify")?;

    let mut tool = Table::new(category_header());
    let mut fixture = Table::new(category_header());
    let mut thread_making = Table::new(category_header());

    for (idx, record) in table.records.into_iter().enumerate() {
        let category = categorize(&record[CATEGORY_FIELD]);
        let record = finish_record(shape_record(record), category, idx);
        match category {
            SourceTable::Tool => tool.push_record(record)?,
            SourceTable::Fixture => fixture.push_record(record)?,
            SourceTable::ThreadMaking => thread_making.push_record(record)?,
        }
    }

    Ok(Classified {
        tool: OutputTable::new(SourceTable::Tool, tool),
        fixture: OutputTable::new(SourceTable::Fixture, fixture),
        thread_making: OutputTable::new(SourceTable::ThreadMaking, thread_making),
    })
}
