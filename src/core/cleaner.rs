//! Row cleanup of the flattened table

use crate::error::ToolsheetResult;
use crate::schema::{CLEAN_KEY_FIELD, METADATA_FIELDS, SENTINEL};
use crate::types::RawTable;

/// Counts reported by [`clean_rows`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub without_key: usize,
    pub blank: usize,
    pub kept: usize,
}

/// Remove keyless and blank records, trim every field and drop the two
/// leading metadata fields.
pub fn clean_rows(table: &mut RawTable) -> ToolsheetResult<CleanStats> {
    table.require_width(CLEAN_KEY_FIELD + 1, "clean")?;
    let mut stats = CleanStats::default();

    let before = table.len();
    table
        .records
        .retain(|record| record[CLEAN_KEY_FIELD] != SENTINEL);
    stats.without_key = before - table.len();

    for record in &mut table.records {
        for field in record.iter_mut() {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }

    let before = table.len();
    table
        .records
        .retain(|record| !record.iter().all(|field| field.trim().is_empty()));
    stats.blank = before - table.len();

    for record in &mut table.records {
        record.drain(..METADATA_FIELDS);
    }

    stats.kept = table.len();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolsheetError;

    fn raw(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_clean_rows() {
        let mut table = raw(&[
            &["1", "x", " Drill ", "  10 "],
            &["2", "y", SENTINEL, "5"],
            &[" ", "", "  ", ""],
            &["3", "z", "Mill", SENTINEL],
        ]);

        let stats = clean_rows(&mut table).unwrap();

        assert_eq!(
            stats,
            CleanStats {
                without_key: 1,
                blank: 1,
                kept: 2
            }
        );
        assert_eq!(table, raw(&[&["Drill", "10"], &["Mill", SENTINEL]]));
    }

    #[test]
    fn test_sentinel_in_key_is_matched_before_trimming() {
        let mut table = raw(&[&["a", "b", " emptyCell", "c"]]);
        clean_rows(&mut table).unwrap();
        assert_eq!(table, raw(&[&[SENTINEL, "c"]]));
    }

    #[test]
    fn test_clean_rejects_narrow_tables() {
        let mut table = raw(&[&["a", "b"]]);
        assert!(matches!(
            clean_rows(&mut table),
            Err(ToolsheetError::Schema(_))
        ));
    }

    #[test]
    fn test_clean_empty_table() {
        let mut table = RawTable::default();
        let stats = clean_rows(&mut table).unwrap();
        assert_eq!(stats.kept, 0);
    }
}
