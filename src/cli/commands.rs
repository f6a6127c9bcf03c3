use crate::error::{ToolsheetError, ToolsheetResult};
use crate::mapping::ToolTypeMapping;
use crate::pipeline::{Pipeline, PipelineConfig, RunReport};
use colored::Colorize;
use std::path::PathBuf;

/// Load the mapping file, or an empty mapping when none is given
fn load_mapping(path: Option<&PathBuf>, verbose: bool) -> ToolsheetResult<ToolTypeMapping> {
    let Some(path) = path else {
        if verbose {
            println!(
                "{}",
                "   No mapping file, tooltypes fall back to their subtype".yellow()
            );
        }
        return Ok(ToolTypeMapping::new());
    };

    let mapping = ToolTypeMapping::load(path).map_err(|e| match e {
        ToolsheetError::Io(io) => {
            ToolsheetError::Mapping(format!("Cannot read '{}': {}", path.display(), io))
        }
        other => other,
    })?;
    if verbose {
        println!("   Mapping: {} ({} entries)", path.display(), mapping.len());
    }
    Ok(mapping)
}

fn print_report(report: &RunReport) {
    for written in &report.written {
        println!(
            "   {} {} ({} records)",
            written.category.to_string().bright_blue(),
            written.path.display(),
            written.records
        );
    }
    for category in &report.skipped {
        println!("   {} skipped, no records", category.to_string().dimmed());
    }
}

/// Execute the convert command
pub fn convert(
    input: PathBuf,
    output_dir: PathBuf,
    mapping: Option<PathBuf>,
    keep_intermediate: bool,
    verbose: bool,
) -> ToolsheetResult<RunReport> {
    println!("{}", "Toolsheet - Workbook conversion".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output_dir.display());

    let lookup = load_mapping(mapping.as_ref(), verbose)?;

    let config = PipelineConfig {
        output_dir,
        keep_intermediate,
    };
    let pipeline = Pipeline::new(config, &lookup);

    let report = match pipeline.run(&input) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e.to_string().red().bold());
            return Err(e);
        }
    };

    print_report(&report);
    if keep_intermediate && verbose {
        println!("   Intermediate files kept");
    }
    println!("\n{}", report.status_message().bold().green());
    Ok(report)
}

/// Execute the mapping command - print the entries of a mapping file
pub fn mapping(file: PathBuf) -> ToolsheetResult<()> {
    println!("{}", "Toolsheet - Tooltype mapping".bold().green());
    println!("   File: {}\n", file.display());

    let lookup = load_mapping(Some(&file), false)?;
    if lookup.is_empty() {
        println!("{}", "   No entries".yellow());
        return Ok(());
    }

    let yaml = serde_yaml::to_string(lookup.entries())?;
    print!("{yaml}");
    println!("\n   {} entries", lookup.len());
    Ok(())
}
