//! Toolsheet - tool inventory workbook to CSV tables
//!
//! Reads the active sheet of a tool inventory workbook, fills material flags
//! from cell backgrounds, and splits the rows into `;`-delimited tool,
//! fixture and thread-making tables with dual-unit tip diameters and
//! reclassified tooltypes.
//!
//! # Example
//!
//! ```no_run
//! use toolsheet::mapping::ToolTypeMapping;
//! use toolsheet::pipeline::{Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! let mapping = ToolTypeMapping::load(Path::new("tooltypes.yaml"))?;
//! let pipeline = Pipeline::new(PipelineConfig::default(), &mapping);
//! let report = pipeline.run(Path::new("inventory.xlsx"))?;
//!
//! println!("{}", report.status_message());
//! # Ok::<(), toolsheet::error::ToolsheetError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod mapping;
pub mod pipeline;
pub mod schema;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{ToolsheetError, ToolsheetResult};
pub use mapping::{ToolTypeLookup, ToolTypeMapping};
pub use pipeline::{Pipeline, PipelineConfig, RunReport};
pub use types::{CellValue, Grid, RawTable, SourceTable, Table};
