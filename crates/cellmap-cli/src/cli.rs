//! CLI argument definitions for the consolidator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cellmap",
    version,
    about = "Consolidate estimate workbooks into one sheet of live cross-file formulas",
    long_about = "Consolidate values from many estimate workbooks into a single target sheet.\n\n\
                  A mapping table (Source Sheet, Source Cell, Destination Column) decides\n\
                  which source cell feeds which destination column. Each source file\n\
                  becomes one row of external reference formulas with an item number."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Consolidate source workbooks into a new copy of the target workbook.
    Run(RunArgs),

    /// Check mapping, target and sources without writing anything.
    Check(SetupArgs),

    /// List the sheets of a workbook, or the headers of one sheet.
    Inspect(InspectArgs),
}

/// Inputs shared by `run` and `check`.
#[derive(Args, Clone, Debug)]
pub struct SetupArgs {
    /// Source estimate workbooks, processed in the order given.
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Target consolidation workbook (.xlsx or .xlsm).
    #[arg(long = "target", short = 't', value_name = "PATH")]
    pub target: PathBuf,

    /// Mapping table workbook (default: "Cell Map.xlsx" in the current
    /// directory, then next to the executable).
    #[arg(long = "mapping", short = 'm', value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Settings file (TOML). Flags given on the command line take precedence.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory every source path must stay inside.
    #[arg(long = "base-dir", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Name of the consolidation sheet in the target workbook.
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Row holding the destination column headers.
    #[arg(long = "header-row", value_name = "ROW")]
    pub header_row: Option<u32>,

    /// First row new data may be written to.
    #[arg(long = "data-start-row", value_name = "ROW")]
    pub data_start_row: Option<u32>,

    /// Keep existing rows instead of clearing them before writing.
    #[arg(long = "keep-existing")]
    pub keep_existing: bool,

    /// Header of the item number column.
    #[arg(long = "item-column", value_name = "NAME")]
    pub item_column: Option<String>,

    /// Header of the column receiving each source file name.
    #[arg(long = "file-name-column", value_name = "NAME", conflicts_with = "no_file_name_column")]
    pub file_name_column: Option<String>,

    /// Do not write source file names.
    #[arg(long = "no-file-name-column")]
    pub no_file_name_column: bool,

    /// How formulas reference source files.
    #[arg(long = "link-style", value_enum)]
    pub link_style: Option<LinkStyleArg>,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Output workbook (default: Consolidation_AutoLinked_<timestamp>.xlsx
    /// next to the target).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write a JSON run report.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Write recorded errors as CSV.
    #[arg(long = "error-log", value_name = "PATH")]
    pub error_log: Option<PathBuf>,

    /// Run the checks of `check` and stop.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Workbook to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Show the headers of this sheet.
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Row to read headers from.
    #[arg(long = "header-row", value_name = "ROW", default_value_t = cellmap_model::DEFAULT_HEADER_ROW)]
    pub header_row: u32,
}

/// CLI link style choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LinkStyleArg {
    /// Full directory path plus file name.
    Absolute,
    /// File name only, resolved next to the consolidated workbook.
    FileName,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
