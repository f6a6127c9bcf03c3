use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolsheet::cli;
use toolsheet::error::{ToolsheetError, ToolsheetResult};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toolsheet")]
#[command(about = "Convert a tool inventory workbook into ;-delimited CSV tables")]
#[command(long_about = "Toolsheet - tool inventory workbook to CSV tables

Reads the active sheet of an .xlsx inventory export and writes:
  tool_table.csv            - always
  fixture_table.csv         - when fixture rows exist (inventory A*, C*)
  thread_making_table.csv   - when thread-making rows exist (119, 129, 411, ...)

COMMANDS:
  convert   - Run the full conversion on one workbook
  mapping   - Print the entries of a tooltype mapping file

EXAMPLES:
  toolsheet convert inventory.xlsx
  toolsheet convert inventory.xlsx -o out --mapping tooltypes.yaml
  toolsheet mapping tooltypes.csv

Set RUST_LOG to control log output (default: toolsheet=info).")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert a workbook into tool, fixture and thread-making tables.

Material flag cells are set from their background fill, quantity
subtractions are folded, rows are cleaned and classified, and tip
diameters are written in both mm and inch.

The intermediate files output_list.csv and output_list_modified.csv
are removed after the run unless --keep-intermediate is given.")]
    /// Convert a workbook into CSV tables
    Convert {
        /// Path to the .xlsx workbook
        input: PathBuf,

        /// Directory for output and intermediate files
        #[arg(short, long, env = "TOOLSHEET_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Tooltype mapping file (.yaml/.yml, or ;-delimited id;code;label)
        #[arg(short, long, env = "TOOLSHEET_MAPPING")]
        mapping: Option<PathBuf>,

        /// Keep output_list.csv and output_list_modified.csv
        #[arg(long)]
        keep_intermediate: bool,

        /// Show debug logging and per-file details
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the entries of a tooltype mapping file
    Mapping {
        /// Path to the mapping file
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "toolsheet=debug" } else { "toolsheet=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ToolsheetResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output_dir,
            mapping,
            keep_intermediate,
            verbose,
        } => {
            init_tracing(verbose);
            match cli::convert(input, output_dir, mapping, keep_intermediate, verbose) {
                Ok(_) => Ok(()),
                // Already reported as the status line
                Err(ToolsheetError::Load(_)) => std::process::exit(1),
                Err(e) => Err(e),
            }
        }

        Commands::Mapping { file } => {
            init_tracing(false);
            cli::mapping(file)
        }
    }
}
