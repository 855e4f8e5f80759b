//! Validate command implementation
//!
//! Reports every validation error of every definition in a file.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use loadsynth_spec::validation::validate_definition;
use loadsynth_spec::{LoadStore, ValidationResult};

use super::json_output::{error_codes, print_json, JsonError, ValidateLoad, ValidateOutput};
use crate::input::load_store;

/// Run the validate command
///
/// # Arguments
/// * `spec_path` - Path to the load definition file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if every definition is valid, 1 otherwise
pub fn run(spec_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(spec_path)
    } else {
        run_human(spec_path)
    }
}

fn validate_all(store: &LoadStore) -> Vec<ValidationResult> {
    store.iter().map(validate_definition).collect()
}

fn run_human(spec_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), spec_path);

    let store = load_store(Path::new(spec_path))?;
    let results = validate_all(&store);

    let mut error_count = 0;
    for (def, result) in store.iter().zip(&results) {
        if result.is_ok() {
            println!("  {} {} ({})", "ok".green(), def.name, def.input_mode());
            continue;
        }
        println!("  {} {} ({})", "invalid".red(), def.name, def.input_mode());
        for err in &result.errors {
            println!("    {} {}", err.code.to_string().red(), err.message);
            if let Some(path) = &err.path {
                println!("      {} {}", "at".dimmed(), path.dimmed());
            }
        }
        error_count += result.errors.len();
    }

    if error_count == 0 {
        println!(
            "\n{} {} load(s) valid",
            "SUCCESS".green().bold(),
            store.count()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!("\n{} {} error(s)", "FAILED".red().bold(), error_count);
        Ok(ExitCode::from(1))
    }
}

fn run_json(spec_path: &str) -> Result<ExitCode> {
    let store = match load_store(Path::new(spec_path)) {
        Ok(store) => store,
        Err(err) => {
            print_json(&ValidateOutput {
                success: false,
                loads: Vec::new(),
                errors: vec![JsonError::from_anyhow(error_codes::INPUT, &err)],
            })?;
            return Ok(ExitCode::from(1));
        }
    };

    let loads: Vec<ValidateLoad> = store
        .iter()
        .zip(validate_all(&store))
        .map(|(def, result)| ValidateLoad {
            name: def.name.clone(),
            mode: def.input_mode().to_string(),
            errors: result.errors.iter().map(JsonError::from).collect(),
        })
        .collect();
    let success = loads.iter().all(|l| l.errors.is_empty());

    print_json(&ValidateOutput {
        success,
        loads,
        errors: Vec::new(),
    })?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
