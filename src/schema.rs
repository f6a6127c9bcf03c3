//! Positional contract between pipeline stages
//!
//! The inventory export is addressed by position until classification and by
//! column name afterwards. All positions here are 0-based.

use std::ops::RangeInclusive;

/// Marks a missing cell, distinct from intentionally blank text
pub const SENTINEL: &str = "emptyCell";

/// Field delimiter of every table written by the pipeline
pub const DELIMITER: u8 = b';';

//------------------------------------------------------------------------------
// Sheet layout (grid stages)
//------------------------------------------------------------------------------

/// Tool type column (sheet column C); drives the boolean fill
pub const KEY_COLUMN: usize = 2;

/// First data row; row 0 holds the sheet title
pub const FIRST_DATA_ROW: usize = 1;

/// Material flag columns (sheet columns D..H)
pub const BOOLEAN_COLUMNS: RangeInclusive<usize> = 3..=7;

/// Quantity columns that may hold a subtraction chain (sheet columns AA..AD)
pub const FORMULA_COLUMNS: [usize; 4] = [26, 27, 28, 29];

//------------------------------------------------------------------------------
// Flattened table layout (row stages)
//------------------------------------------------------------------------------

/// A row is discarded when this field holds the sentinel
pub const CLEAN_KEY_FIELD: usize = 2;

/// Leading metadata fields removed by the cleaner
pub const METADATA_FIELDS: usize = 2;

/// Inventory number; decides unit and category
pub const CATEGORY_FIELD: usize = 7;

/// Where the derived `unit` field is inserted
pub const UNIT_POSITION: usize = 8;

/// Field left untouched by the decimal separator rewrite (pre-insertion index)
pub const DECIMAL_EXEMPT_FIELD: usize = 26;

/// Value never rewritten by the decimal separator rewrite
pub const NOT_APPLICABLE: &str = "N/A";

/// Inventory prefixes of fixtures
pub const FIXTURE_PREFIXES: [&str; 2] = ["A", "C"];

/// Inventory prefixes of thread-making tools
pub const THREAD_MAKING_PREFIXES: [&str; 8] =
    ["119", "129", "411", "421", "412", "422", "511", "521"];

//------------------------------------------------------------------------------
// Categorized tables (named stages)
//------------------------------------------------------------------------------

/// Data columns of every categorized table, `unit` included
pub const DATA_COLUMNS: [&str; 36] = [
    "tooltype",
    "steel",
    "stainless",
    "castiron",
    "aluminum",
    "universal",
    "catnum",
    "invnum",
    "unit",
    "grinded",
    "mfr",
    "holdertype",
    "tipdia",
    "shankdia",
    "pitch",
    "neckdia",
    "tslotdp",
    "toollen",
    "splen",
    "worklen",
    "bladecnt",
    "tiptype",
    "tipsize",
    "material",
    "coating",
    "inserttype",
    "cabinet",
    "qty",
    "issued",
    "avail",
    "minqty",
    "secocab",
    "sandvikcab",
    "kennacab",
    "niagaracab",
    "extcab",
];

pub const SOURCE_TABLE_COLUMN: &str = "sourcetable";
pub const TOOLTYPE_COLUMN: &str = "tooltype";
pub const SUBTYPE_COLUMN: &str = "subtype";
pub const UNIT_COLUMN: &str = "unit";
pub const HOLDERTYPE_COLUMN: &str = "holdertype";
pub const TIPDIA_COLUMN: &str = "tipdia";
pub const TIPDIA_MM_COLUMN: &str = "tipdia_mm";
pub const TIPDIA_INCH_COLUMN: &str = "tipdia_inch";

pub const UNIT_MM: &str = "mm";
pub const UNIT_INCH: &str = "inch";
pub const MM_PER_INCH: f64 = 25.4;

/// Fixed header of the categorized tables: data columns plus `sourcetable`
pub fn category_header() -> Vec<String> {
    DATA_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(SOURCE_TABLE_COLUMN))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_header_layout() {
        let header = category_header();
        assert_eq!(header.len(), 37);
        assert_eq!(header.join(";"), "tooltype;steel;stainless;castiron;aluminum;universal;catnum;invnum;unit;grinded;mfr;holdertype;tipdia;shankdia;pitch;neckdia;tslotdp;toollen;splen;worklen;bladecnt;tiptype;tipsize;material;coating;inserttype;cabinet;qty;issued;avail;minqty;secocab;sandvikcab;kennacab;niagaracab;extcab;sourcetable");
    }

    #[test]
    fn test_positions_agree_with_header() {
        assert_eq!(DATA_COLUMNS[UNIT_POSITION], UNIT_COLUMN);
        assert_eq!(DATA_COLUMNS[CATEGORY_FIELD], "invnum");
    }
}
