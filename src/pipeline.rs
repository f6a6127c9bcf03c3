//! Pipeline driver
//!
//! Runs the stages in order on one workbook:
//!
//! 1. load the active sheet
//! 2. fill material flags from cell backgrounds
//! 3. fold subtraction chains in the quantity columns
//! 4. flatten to text → `output_list.csv`
//! 5. clean rows → `output_list_modified.csv`
//! 6. classify into tool / fixture / thread-making tables
//! 7. derive diameter columns, assign subtypes, reclassify tooltypes
//!
//! Intermediate files are removed when the run ends, successful or not,
//! unless the configuration keeps them.

use crate::core::{
    assign_subtype, classify, clean_rows, derive_diameters, derive_diameters_verbatim,
    evaluate_formulas, populate_booleans, reclassify, Flattener,
};
use crate::error::ToolsheetResult;
use crate::excel::WorkbookLoader;
use crate::mapping::ToolTypeLookup;
use crate::types::{OutputTable, SourceTable};
use crate::writer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FLATTENED_FILE: &str = "output_list.csv";
pub const CLEANED_FILE: &str = "output_list_modified.csv";

/// Run settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory for output and intermediate files
    pub output_dir: PathBuf,
    /// Keep `output_list.csv` and `output_list_modified.csv` after the run
    pub keep_intermediate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            keep_intermediate: false,
        }
    }
}

/// One output file of a run
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenTable {
    pub category: SourceTable,
    pub path: PathBuf,
    pub records: usize,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub tool_table: PathBuf,
    pub written: Vec<WrittenTable>,
    /// Categories left out because they had no records
    pub skipped: Vec<SourceTable>,
}

impl RunReport {
    /// Status line for the user
    pub fn status_message(&self) -> String {
        format!("Final CSV ready at {}", self.tool_table.display())
    }

    pub fn records(&self, category: SourceTable) -> usize {
        self.written
            .iter()
            .find(|w| w.category == category)
            .map_or(0, |w| w.records)
    }
}

/// Removes intermediate files when dropped
struct IntermediateFiles {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl IntermediateFiles {
    fn new(keep: bool) -> Self {
        Self {
            paths: Vec::new(),
            keep,
        }
    }

    fn track(&mut self, path: PathBuf) -> &Path {
        self.paths.push(path);
        &self.paths[self.paths.len() - 1]
    }
}

impl Drop for IntermediateFiles {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for path in &self.paths {
            if path.exists() {
                match fs::remove_file(path) {
                    Ok(()) => debug!(path = %path.display(), "removed intermediate file"),
                    Err(e) => warn!(path = %path.display(), error = %e, "could not remove intermediate file"),
                }
            }
        }
    }
}

/// The coordinating driver
pub struct Pipeline<'a, L: ToolTypeLookup + ?Sized> {
    config: PipelineConfig,
    lookup: &'a L,
}

impl<'a, L: ToolTypeLookup + ?Sized> Pipeline<'a, L> {
    pub fn new(config: PipelineConfig, lookup: &'a L) -> Self {
        Self { config, lookup }
    }

    /// Run every stage on `input`
    pub fn run(&self, input: &Path) -> ToolsheetResult<RunReport> {
        info!(path = %input.display(), "Opening file");
        let mut grid = WorkbookLoader::new(input).load()?;

        info!("Populating booleans");
        let populated = populate_booleans(&mut grid);
        let folded = evaluate_formulas(&mut grid);
        debug!(populated, folded, "grid prepared");

        fs::create_dir_all(&self.config.output_dir)?;
        let mut intermediates = IntermediateFiles::new(self.config.keep_intermediate);

        info!("Converting xls to csv");
        let flattened = Flattener::new()?.flatten(&grid);
        drop(grid);
        let flattened_path = intermediates.track(self.config.output_dir.join(FLATTENED_FILE));
        writer::write_raw_file(flattened_path, &flattened)?;
        debug!(
            rows = flattened.len(),
            columns = flattened.width(),
            path = %flattened_path.display(),
            "flattened table written"
        );

        info!("Cleaning csv");
        let mut cleaned = writer::read_raw_file(flattened_path)?;
        let stats = clean_rows(&mut cleaned)?;
        debug!(
            without_key = stats.without_key,
            blank = stats.blank,
            kept = stats.kept,
            "rows cleaned"
        );
        let cleaned_path = intermediates.track(self.config.output_dir.join(CLEANED_FILE));
        writer::write_raw_file(cleaned_path, &cleaned)?;

        info!("Separating csv files");
        let classified = classify(writer::read_raw_file(cleaned_path)?)?;

        let mut tables = classified.into_tables();
        info!("Adding diameter columns");
        for output in &mut tables {
            match output.category {
                SourceTable::Tool => derive_diameters(&mut output.table)?,
                _ => derive_diameters_verbatim(&mut output.table)?,
            }
        }

        info!("Adding subtype columns");
        let mut subtyped = Vec::with_capacity(tables.len());
        for output in tables {
            subtyped.push((output.category, assign_subtype(output.table)?));
        }

        info!("Updating tooltypes");
        let mut finished = Vec::with_capacity(subtyped.len());
        for (category, table) in subtyped {
            finished.push(OutputTable::new(category, reclassify(table, self.lookup)?));
        }

        let report = self.write_outputs(&finished)?;
        info!(
            tool = report.records(SourceTable::Tool),
            fixture = report.records(SourceTable::Fixture),
            thread_making = report.records(SourceTable::ThreadMaking),
            "Finished"
        );
        Ok(report)
    }

    fn write_outputs(&self, tables: &[OutputTable]) -> ToolsheetResult<RunReport> {
        let mut written = Vec::new();
        let mut skipped = Vec::new();

        for output in tables {
            if !output.should_write() {
                debug!(category = %output.category, "no records, file not written");
                skipped.push(output.category);
                continue;
            }
            let path = self.config.output_dir.join(output.category.file_name());
            writer::write_table_file(&path, &output.table)?;
            written.push(WrittenTable {
                category: output.category,
                path,
                records: output.table.len(),
            });
        }

        Ok(RunReport {
            tool_table: self.config.output_dir.join(SourceTable::Tool.file_name()),
            written,
            skipped,
        })
    }
}

/// Status line for any run outcome
pub fn status_message(result: &ToolsheetResult<RunReport>) -> String {
    match result {
        Ok(report) => report.status_message(),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolsheetError;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_intermediate_files_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FLATTENED_FILE);
        {
            let mut files = IntermediateFiles::new(false);
            let tracked = files.track(path.clone());
            fs::write(tracked, "a;b\n").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_intermediate_files_kept_on_request() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CLEANED_FILE);
        {
            let mut files = IntermediateFiles::new(true);
            fs::write(files.track(path.clone()), "a;b\n").unwrap();
        }
        assert!(path.exists());
    }

    #[test]
    fn test_load_error_stops_before_any_output() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            output_dir: dir.path().join("out"),
            keep_intermediate: false,
        };
        let mapping: HashMap<String, String> = HashMap::new();
        let pipeline = Pipeline::new(config, &mapping);

        let result = pipeline.run(&dir.path().join("missing.xlsx"));

        assert!(matches!(result, Err(ToolsheetError::Load(_))));
        assert!(status_message(&result).starts_with("Error loading the Excel file"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_report_status_message() {
        let report = RunReport {
            tool_table: PathBuf::from("out/tool_table.csv"),
            written: vec![WrittenTable {
                category: SourceTable::Tool,
                path: PathBuf::from("out/tool_table.csv"),
                records: 4,
            }],
            skipped: vec![SourceTable::Fixture],
        };
        assert_eq!(report.status_message(), "Final CSV ready at out/tool_table.csv");
        assert_eq!(report.records(SourceTable::Tool), 4);
        assert_eq!(report.records(SourceTable::Fixture), 0);
    }
}
