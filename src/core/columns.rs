//! Dual-unit tip diameter columns
//!
//! `tipdia` is replaced by `tipdia_mm` and `tipdia_inch`, placed right after
//! `holdertype`. The tool table converts between units; fixture and
//! thread-making tables only route the original value.

use crate::error::ToolsheetResult;
use crate::schema::{
    HOLDERTYPE_COLUMN, MM_PER_INCH, TIPDIA_COLUMN, TIPDIA_INCH_COLUMN, TIPDIA_MM_COLUMN,
    UNIT_COLUMN, UNIT_INCH, UNIT_MM,
};
use crate::types::Table;
use tracing::debug;

/// (mm, inch) text for a diameter given in `unit`, with conversion.
/// `None` when the diameter is not a number or the unit is unknown.
pub fn convert_diameter(tipdia: &str, unit: &str) -> Option<(String, String)> {
    let value = match tipdia.trim().parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            debug!(tipdia, "tip diameter is not a number");
            return None;
        }
    };

    match unit {
        UNIT_MM => Some((tipdia.to_string(), format!("{:.4}", value / MM_PER_INCH))),
        UNIT_INCH => Some((format!("{:.2}", value * MM_PER_INCH), tipdia.to_string())),
        _ => None,
    }
}

/// (mm, inch) text for a diameter given in `unit`, routed without conversion
pub fn route_diameter(tipdia: &str, unit: &str) -> (String, String) {
    match unit {
        UNIT_MM => (tipdia.to_string(), String::new()),
        UNIT_INCH => (String::new(), tipdia.to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Derive the diameter columns of the tool table, converting between units
pub fn derive_diameters(table: &mut Table) -> ToolsheetResult<()> {
    table.require_column(TIPDIA_COLUMN)?;
    replace_diameter_columns(table, |tipdia, unit| {
        convert_diameter(tipdia, unit).unwrap_or_default()
    })
}

/// Derive the diameter columns without conversion. No-op without `tipdia`.
pub fn derive_diameters_verbatim(table: &mut Table) -> ToolsheetResult<()> {
    if !table.has_column(TIPDIA_COLUMN) {
        return Ok(());
    }
    replace_diameter_columns(table, route_diameter)
}

fn replace_diameter_columns<F>(table: &mut Table, derive: F) -> ToolsheetResult<()>
where
    F: Fn(&str, &str) -> (String, String),
{
    let tipdia_idx = table.require_column(TIPDIA_COLUMN)?;
    let unit_idx = table.require_column(UNIT_COLUMN)?;

    let (mm, inch): (Vec<String>, Vec<String>) = table
        .records
        .iter()
        .map(|record| derive(&record[tipdia_idx], &record[unit_idx]))
        .unzip();

    table.drop_column(TIPDIA_COLUMN)?;
    let position = table.require_column(HOLDERTYPE_COLUMN)? + 1;
    table.insert_column(position, TIPDIA_MM_COLUMN, mm)?;
    table.insert_column(position + 1, TIPDIA_INCH_COLUMN, inch)?;
    Ok(())
}
