//! Conversion stages, applied in order by the pipeline

pub mod boolean_filler;
pub mod classifier;
pub mod cleaner;
pub mod columns;
pub mod flatten;
pub mod formula;
pub mod reclassify;

pub use boolean_filler::populate_booleans;
pub use classifier::{classify, Classified};
pub use cleaner::{clean_rows, CleanStats};
pub use columns::{derive_diameters, derive_diameters_verbatim};
pub use flatten::Flattener;
pub use formula::evaluate_formulas;
pub use reclassify::{assign_subtype, reclassify, SubtypedTable};
