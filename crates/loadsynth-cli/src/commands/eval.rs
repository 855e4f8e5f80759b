//! Eval command implementation
//!
//! Evaluates an expression at one time or over a uniform time grid.

use std::process::ExitCode;

use anyhow::{bail, Result};
use colored::Colorize;
use loadsynth_backend_signal::{time_grid, Expr, SignalError};
use loadsynth_spec::sample_count;

use super::json_output::{error_codes, print_json, JsonError, Point, SeriesOutput};

/// Where to evaluate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalTimes {
    /// One time.
    At(f64),
    /// `t_i = i·dt` up to `end_time`.
    Grid { end_time: f64, dt: f64 },
}

impl EvalTimes {
    /// Builds from the command-line options; exactly one form must be given.
    pub fn from_args(at: Option<f64>, end_time: Option<f64>, dt: Option<f64>) -> Result<Self> {
        match (at, end_time, dt) {
            (Some(t), None, None) => Ok(EvalTimes::At(t)),
            (None, Some(end_time), Some(dt)) => Ok(EvalTimes::Grid { end_time, dt }),
            _ => bail!("expected either --at T or --end-time T --dt DT"),
        }
    }

    fn times(self) -> Result<Vec<f64>, SignalError> {
        match self {
            EvalTimes::At(t) => Ok(vec![t]),
            EvalTimes::Grid { end_time, dt } => Ok(time_grid(sample_count(end_time, dt)?, dt)),
        }
    }
}

/// Parses `expr` and evaluates it at `when`.
pub fn evaluate_points(expr: &str, when: EvalTimes) -> Result<Vec<Point>, SignalError> {
    let parsed = Expr::parse(expr)?;
    let times = when.times()?;
    Ok(times
        .into_iter()
        .map(|t| Point {
            t,
            value: parsed.eval(t),
        })
        .collect())
}

/// Run the eval command
///
/// # Returns
/// Exit code: 0 on success, 1 if the expression or grid is invalid
pub fn run(
    expr: &str,
    at: Option<f64>,
    end_time: Option<f64>,
    dt: Option<f64>,
    json_output: bool,
) -> Result<ExitCode> {
    let when = match EvalTimes::from_args(at, end_time, dt) {
        Ok(when) => when,
        Err(err) if json_output => {
            print_json(&SeriesOutput::failure(JsonError::from_anyhow(
                error_codes::ARGUMENTS,
                &err,
            )))?;
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err),
    };

    match evaluate_points(expr, when) {
        Ok(points) if json_output => {
            print_json(&SeriesOutput::success(points))?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(points) => {
            for point in &points {
                println!("{}\t{}", point.t, point.value);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if json_output => {
            print_json(&SeriesOutput::failure(JsonError::from(&err)))?;
            Ok(ExitCode::from(1))
        }
        Err(err) => {
            eprintln!("{} [{}] {}", "error".red().bold(), err.code(), err);
            Ok(ExitCode::from(1))
        }
    }
}
