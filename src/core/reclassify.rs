//! Subtype assignment and tooltype reclassification
//!
//! `subtype` keeps the raw tooltype code, `tooltype` becomes its label. A
//! [`SubtypedTable`] can only come out of [`assign_subtype`], so `subtype` is a
//! verbatim copy of `tooltype` whenever [`reclassify`] runs.

use crate::error::ToolsheetResult;
use crate::mapping::ToolTypeLookup;
use crate::schema::{SUBTYPE_COLUMN, TOOLTYPE_COLUMN};
use crate::types::Table;

/// A table whose `subtype` column (if any) mirrors `tooltype`
#[derive(Debug, Clone, PartialEq)]
pub struct SubtypedTable(Table);

impl SubtypedTable {
    pub fn table(&self) -> &Table {
        &self.0
    }

    pub fn into_inner(self) -> Table {
        self.0
    }
}

/// Append `subtype` as a copy of `tooltype`. Tables without `tooltype` pass through.
pub fn assign_subtype(mut table: Table) -> ToolsheetResult<SubtypedTable> {
    let tooltypes: Option<Vec<String>> = table
        .column(TOOLTYPE_COLUMN)
        .map(|values| values.into_iter().map(String::from).collect());
    if let Some(values) = tooltypes {
        table.push_column(SUBTYPE_COLUMN, values)?;
    }
    Ok(SubtypedTable(table))
}

/// Replace every tooltype with the label of its subtype. Unknown subtypes
/// become the tooltype themselves.
pub fn reclassify<L>(table: SubtypedTable, lookup: &L) -> ToolsheetResult<Table>
where
    L: ToolTypeLookup + ?Sized,
{
    let mut table = table.into_inner();
    if !table.has_column(TOOLTYPE_COLUMN) {
        return Ok(table);
    }

    let labels: Option<Vec<String>> = table.column(SUBTYPE_COLUMN).map(|subtypes| {
        subtypes
            .into_iter()
            .map(|code| lookup.label(code).unwrap_or(code).to_string())
            .collect()
    });
    if let Some(labels) = labels {
        table.set_column(TOOLTYPE_COLUMN, labels)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table() -> Table {
        let mut table = Table::new(vec!["tooltype".to_string(), "qty".to_string()]);
        for (code, qty) in [("DR01", "3"), ("XX99", "1")] {
            table
                .push_record(vec![code.to_string(), qty.to_string()])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_assign_subtype_copies_tooltype() {
        let subtyped = assign_subtype(table()).unwrap();
        let table = subtyped.table();
        assert_eq!(table.header, vec!["tooltype", "qty", "subtype"]);
        assert_eq!(table.column("subtype").unwrap(), vec!["DR01", "XX99"]);
    }

    #[test]
    fn test_assign_subtype_without_tooltype() {
        let plain = Table::new(vec!["qty".to_string()]);
        let subtyped = assign_subtype(plain.clone()).unwrap();
        assert_eq!(subtyped.into_inner(), plain);
    }

    #[test]
    fn test_reclassify_with_fallback() {
        let mapping: HashMap<String, String> =
            [("DR01".to_string(), "Drill".to_string())].into_iter().collect();

        let table = reclassify(assign_subtype(table()).unwrap(), &mapping).unwrap();

        assert_eq!(table.column("tooltype").unwrap(), vec!["Drill", "XX99"]);
        assert_eq!(table.column("subtype").unwrap(), vec!["DR01", "XX99"]);
    }

    #[test]
    fn test_reclassify_without_subtype_is_noop() {
        let mapping: HashMap<String, String> = HashMap::new();
        let plain = Table::new(vec!["qty".to_string()]);
        let result = reclassify(assign_subtype(plain.clone()).unwrap(), &mapping).unwrap();
        assert_eq!(result, plain);
    }
}
