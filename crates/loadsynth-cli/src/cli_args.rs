//! CLI argument definitions for the LoadSynth command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgGroup, Parser, Subcommand};
use loadsynth_backend_signal::OptimizeStrategy;

/// LoadSynth - Time-Domain Load Synthesis
#[derive(Parser)]
#[command(name = "loadsynth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate time series and spectra for every load in a definition file
    Generate {
        /// Path to the load definition file (one definition or an array)
        #[arg(short, long)]
        spec: String,

        /// Write the generated loads, with computed arrays, to this JSON file
        #[arg(short, long)]
        out: Option<String>,

        /// Replace PWM harmonics with N optimized harmonics before generating
        #[arg(long, value_name = "N")]
        optimize: Option<usize>,

        /// Harmonic optimization strategy (fourier, error-search)
        #[arg(long, default_value_t = OptimizeStrategy::FourierSeries)]
        strategy: OptimizeStrategy,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Evaluate an expression at one time or over a time grid
    #[command(group(ArgGroup::new("when").required(true).args(["at", "end_time"])))]
    Eval {
        /// Expression in t (e.g. "1000*sin(2*pi*50*t)")
        #[arg(short, long, allow_hyphen_values = true)]
        expr: String,

        /// Single evaluation time in seconds
        #[arg(long, allow_hyphen_values = true)]
        at: Option<f64>,

        /// End of the evaluation grid in seconds
        #[arg(long, requires = "dt")]
        end_time: Option<f64>,

        /// Grid spacing in seconds
        #[arg(long)]
        dt: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Parse a pasted time/amplitude table and optionally resample it
    Table {
        /// Path to the text file holding the table
        #[arg(short, long)]
        input: String,

        /// Resample the table at this time in seconds
        #[arg(long, allow_hyphen_values = true)]
        at: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a load definition file without generating
    Validate {
        /// Path to the load definition file (one definition or an array)
        #[arg(short, long)]
        spec: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "loadsynth",
            "generate",
            "--spec",
            "loads.json",
            "--optimize",
            "5",
            "--strategy",
            "error-search",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                spec,
                out,
                optimize,
                strategy,
                json,
            } => {
                assert_eq!(spec, "loads.json");
                assert_eq!(out, None);
                assert_eq!(optimize, Some(5));
                assert_eq!(strategy, OptimizeStrategy::ErrorSearch);
                assert!(!json);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_strategy_defaults_to_fourier() {
        let cli = Cli::try_parse_from(["loadsynth", "generate", "--spec", "loads.json"]).unwrap();
        match cli.command {
            Commands::Generate { strategy, .. } => {
                assert_eq!(strategy, OptimizeStrategy::FourierSeries)
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_strategy() {
        let err = Cli::try_parse_from([
            "loadsynth",
            "generate",
            "--spec",
            "loads.json",
            "--strategy",
            "magic",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_cli_eval_requires_a_time() {
        assert!(Cli::try_parse_from(["loadsynth", "eval", "--expr", "t"]).is_err());
        assert!(
            Cli::try_parse_from(["loadsynth", "eval", "--expr", "t", "--end-time", "1"]).is_err()
        );
        assert!(Cli::try_parse_from(["loadsynth", "eval", "--expr", "t", "--at", "-0.5"]).is_ok());
        assert!(Cli::try_parse_from([
            "loadsynth",
            "eval",
            "--expr",
            "-t",
            "--end-time",
            "1",
            "--dt",
            "0.1"
        ])
        .is_ok());
    }

    #[test]
    fn test_cli_global_verbosity() {
        let cli = Cli::try_parse_from(["loadsynth", "validate", "--spec", "a.json", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert!(Cli::try_parse_from(["loadsynth", "-q", "-v", "validate", "--spec", "a.json"]).is_err());
    }
}
