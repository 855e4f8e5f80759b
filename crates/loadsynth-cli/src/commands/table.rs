//! Table command implementation
//!
//! Parses pasted time/amplitude text, then prints the parsed knots or the
//! table resampled at one time.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use loadsynth_backend_signal::{SignalError, TabularSeries};

use super::json_output::{error_codes, print_json, JsonError, Point, SeriesOutput};
use crate::input::read_text;

/// Parses `text` and returns the knots, or the single resampled point at `at`.
pub fn table_points(text: &str, at: Option<f64>) -> Result<Vec<Point>, SignalError> {
    let series = TabularSeries::parse(text)?;
    Ok(match at {
        Some(t) => vec![Point {
            t,
            value: series.resample(t),
        }],
        None => series
            .times()
            .iter()
            .zip(series.amplitudes())
            .map(|(&t, &value)| Point { t, value })
            .collect(),
    })
}

/// Run the table command
///
/// # Returns
/// Exit code: 0 on success, 1 if the table does not parse
pub fn run(input_path: &str, at: Option<f64>, json_output: bool) -> Result<ExitCode> {
    let text = match read_text(Path::new(input_path)) {
        Ok(text) => text,
        Err(err) if json_output => {
            print_json(&SeriesOutput::failure(JsonError::from_anyhow(
                error_codes::INPUT,
                &err,
            )))?;
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err),
    };

    match table_points(&text, at) {
        Ok(points) if json_output => {
            print_json(&SeriesOutput::success(points))?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(points) => {
            if at.is_none() {
                println!(
                    "{} {} point(s) from {}",
                    "Parsed:".cyan().bold(),
                    points.len(),
                    input_path
                );
            }
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
