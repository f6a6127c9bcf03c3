//! Excel import for the inventory export
//!
//! Values come from calamine, background fills from the package parts.

mod loader;
mod styles;

pub use loader::{convert_data, WorkbookLoader};
pub use styles::{filled_cells, parse_cell_ref, FillStyle, StyleSheet};
