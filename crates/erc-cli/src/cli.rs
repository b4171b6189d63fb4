//! CLI argument definitions for the `erc` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use erc_model::DataSource;

#[derive(Parser)]
#[command(
    name = "erc",
    version,
    about = "Load economic indicator files into the ERC database",
    long_about = "Load tourism, investment, services and goods-trade indicator files.\n\n\
                  Files are normalized, validated, reshaped from one column per year\n\
                  into one row per observation, and written without duplicating rows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: erc.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
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
    /// Transform a file and upload it to its destination table.
    Upload(UploadArgs),

    /// List the supported data sources.
    Sources,

    /// Create the destination tables.
    InitDb(InitDbArgs),
}

#[derive(Parser)]
pub struct UploadArgs {
    /// Data source the file belongs to.
    #[arg(value_name = "SOURCE", value_enum)]
    pub source: SourceArg,

    /// CSV, xlsx, xls or xlsb file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Storage alias to write to.
    #[arg(long = "alias", default_value = "erc")]
    pub alias: String,

    /// Fail on rows that already exist instead of skipping them.
    #[arg(long = "append")]
    pub append: bool,

    /// Transform and preview without writing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Rows shown by --dry-run.
    #[arg(long = "preview-rows", default_value_t = 10)]
    pub preview_rows: usize,
}

#[derive(Parser)]
pub struct InitDbArgs {
    /// Storage alias to initialize.
    #[arg(long = "alias", default_value = "erc")]
    pub alias: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Turismo,
    Inversion,
    Servicios,
    Bienes,
}

impl From<SourceArg> for DataSource {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Turismo => DataSource::Turismo,
            SourceArg::Inversion => DataSource::Inversion,
            SourceArg::Servicios => DataSource::Servicios,
            SourceArg::Bienes => DataSource::Bienes,
        }
    }
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
