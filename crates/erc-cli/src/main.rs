//! ERC indicator ingestion CLI.

use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::{ColorChoice, Parser};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use erc_cli::config::AppConfig;
use erc_cli::logging::{LogConfig, LogFormat, init_logging};
use erc_cli::pipeline::exit_code;
use erc_model::ErcError;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{UploadOutcome, run_init_db, run_sources, run_upload};
use crate::summary::print_preview;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Command::Sources => {
            run_sources();
            Ok(0)
        }
        Command::Upload(args) => {
            match load_config(cli).and_then(|config| run_upload(args, &config)) {
                Ok(UploadOutcome::Uploaded(response)) => {
                    print_json(&response)?;
                    Ok(0)
                }
                Ok(UploadOutcome::Preview(preview)) => {
                    print_preview(&preview, args.preview_rows);
                    Ok(0)
                }
                Err(error) => report_error(&error),
            }
        }
        Command::InitDb(args) => {
            match load_config(cli).and_then(|config| run_init_db(args, &config)) {
                Ok(tables) => {
                    println!(
                        "Destination tables ready on '{}': {}",
                        args.alias,
                        tables.join(", ")
                    );
                    Ok(0)
                }
                Err(error) => report_error(&error),
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, ErcError> {
    AppConfig::resolve(cli.config.as_deref())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize response")?;
    println!("{json}");
    Ok(())
}

/// Prints the structured error and picks the exit status.
fn report_error(error: &ErcError) -> anyhow::Result<i32> {
    print_json(&error.to_response())?;
    Ok(exit_code(error))
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
