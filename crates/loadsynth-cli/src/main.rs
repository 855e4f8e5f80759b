//! LoadSynth CLI - Command-line interface for time-domain load synthesis
//!
//! This binary provides commands for validating load definitions, generating
//! their time series and spectra, and inspecting expressions and tables.

mod cli_args;

use clap::Parser;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use loadsynth_cli::commands;
use loadsynth_cli::logger;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose, cli.quiet));

    let result = match cli.command {
        Commands::Generate {
            spec,
            out,
            optimize,
            strategy,
            json,
        } => {
            let options = commands::generate::GenerateOptions {
                out,
                optimize,
                strategy,
            };
            commands::generate::run(&spec, &options, json)
        }
        Commands::Eval {
            expr,
            at,
            end_time,
            dt,
            json,
        } => commands::eval::run(&expr, at, end_time, dt, json),
        Commands::Table { input, at, json } => commands::table::run(&input, at, json),
        Commands::Validate { spec, json } => commands::validate::run(&spec, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
