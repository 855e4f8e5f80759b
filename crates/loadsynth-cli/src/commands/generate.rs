//! Generate command implementation
//!
//! Loads a definition file into a store, optionally optimizes PWM harmonics,
//! then generates every load and its spectrum in place.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use loadsynth_backend_signal::{optimize_harmonics_with, refresh, OptimizeStrategy, SignalResult};
use loadsynth_spec::{InputMode, LoadDefinition, LoadStore};

use super::json_output::{error_codes, print_json, GenerateLoad, GenerateOutput, JsonError};
use crate::input::{load_store, write_store};

/// Options for a generate run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Write generated loads to this file.
    pub out: Option<String>,
    /// Optimize PWM loads to this many harmonics first.
    pub optimize: Option<usize>,
    /// Optimizer strategy.
    pub strategy: OptimizeStrategy,
}

/// Summary of one generated load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    /// Number of samples.
    pub samples: usize,
    /// Finite amplitude range, if any sample is finite.
    pub range: Option<(f64, f64)>,
    /// Largest non-DC spectrum bin.
    pub peak_frequency: Option<f64>,
    /// BLAKE3 hex digest of the amplitude samples.
    pub amplitude_hash: String,
}

impl LoadSummary {
    /// Summarizes the computed arrays of a generated definition.
    pub fn of(def: &LoadDefinition) -> Self {
        let amplitude = &def.computed.amplitude;
        let range = amplitude
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            });

        let peak_frequency = def
            .computed
            .fft_magnitude
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, m)| m.is_finite())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .and_then(|(i, _)| def.computed.fft_frequency.get(i).copied());

        Self {
            samples: amplitude.len(),
            range,
            peak_frequency,
            amplitude_hash: amplitude_hash(amplitude),
        }
    }
}

/// BLAKE3 hash of the samples as little-endian `f64` bytes.
pub fn amplitude_hash(samples: &[f64]) -> String {
    let mut hasher = blake3::Hasher::new();
    for sample in samples {
        hasher.update(&sample.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Optimizes (if requested and applicable) and then generates one load.
pub fn process_load(def: &mut LoadDefinition, options: &GenerateOptions) -> SignalResult<()> {
    if let Some(count) = options.optimize {
        if def.input_mode() == InputMode::Pwm {
            optimize_harmonics_with(def, count, options.strategy)?;
        } else {
            log::debug!(
                "skipping optimization of '{}' ({} mode)",
                def.name,
                def.input_mode()
            );
        }
    }
    refresh(def)
}

/// Run the generate command
///
/// # Arguments
/// * `spec_path` - Path to the load definition file
/// * `options` - Output file and optimizer settings
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if every load generated, 1 otherwise
pub fn run(spec_path: &str, options: &GenerateOptions, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(spec_path, options)
    } else {
        run_human(spec_path, options)
    }
}

fn generate_all(store: &mut LoadStore, options: &GenerateOptions) -> Vec<SignalResult<()>> {
    store
        .iter_mut()
        .map(|def| process_load(def, options))
        .collect()
}

fn run_human(spec_path: &str, options: &GenerateOptions) -> Result<ExitCode> {
    println!("{} {}", "Generating:".cyan().bold(), spec_path);
    if let Some(count) = options.optimize {
        println!(
            "{} {} harmonic(s), {}",
            "Optimize:".dimmed(),
            count,
            options.strategy
        );
    }

    let mut store = load_store(Path::new(spec_path))?;
    let results = generate_all(&mut store, options);

    let mut failures = 0;
    for (def, result) in store.iter().zip(&results) {
        match result {
            Ok(()) => print_summary(def),
            Err(err) => {
                failures += 1;
                println!(
                    "  {} {} ({})",
                    "failed".red(),
                    def.name,
                    def.input_mode()
                );
                println!("    {} {}", err.code().red(), err);
            }
        }
    }

    if let Some(out) = &options.out {
        write_store(&store, Path::new(out))?;
        println!("{} {}", "Wrote:".dimmed(), out);
    }

    if failures == 0 {
        println!(
            "\n{} {} load(s) generated",
            "SUCCESS".green().bold(),
            store.count()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} {} of {} load(s) failed",
            "FAILED".red().bold(),
            failures,
            store.count()
        );
        Ok(ExitCode::from(1))
    }
}

fn print_summary(def: &LoadDefinition) {
    let summary = LoadSummary::of(def);
    println!("  {} {} ({})", "ok".green(), def.name, def.input_mode());
    println!("    {} {}", "samples:".dimmed(), summary.samples);
    if let Some((lo, hi)) = summary.range {
        println!("    {} [{}, {}]", "range:".dimmed(), lo, hi);
    }
    if let Some(freq) = summary.peak_frequency {
        println!("    {} {:.3} Hz", "peak:".dimmed(), freq);
    }
    if let Some(settings) = def.pwm() {
        for h in &settings.harmonics {
            println!(
                "    {} {:.3} Hz  {:.3}  {:.1} deg",
                "harmonic:".dimmed(),
                h.frequency,
                h.amplitude,
                h.display_phase()
            );
        }
    }
    println!("    {} {}", "hash:".dimmed(), &summary.amplitude_hash[..16]);
}

fn run_json(spec_path: &str, options: &GenerateOptions) -> Result<ExitCode> {
    let mut store = match load_store(Path::new(spec_path)) {
        Ok(store) => store,
        Err(err) => {
            print_json(&GenerateOutput {
                success: false,
                loads: Vec::new(),
                output_file: None,
                errors: vec![JsonError::from_anyhow(error_codes::INPUT, &err)],
            })?;
            return Ok(ExitCode::from(1));
        }
    };

    let results = generate_all(&mut store, options);
    let loads: Vec<GenerateLoad> = store
        .iter()
        .zip(&results)
        .map(|(def, result)| json_load(def, result, options))
        .collect();

    let mut errors = Vec::new();
    let mut output_file = None;
    if let Some(out) = &options.out {
        match write_store(&store, Path::new(out)) {
            Ok(()) => output_file = Some(out.clone()),
            Err(err) => errors.push(JsonError::from_anyhow(error_codes::OUTPUT, &err)),
        }
    }

    let success = errors.is_empty() && loads.iter().all(|l| l.success);
    print_json(&GenerateOutput {
        success,
        loads,
        output_file,
        errors,
    })?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn json_load(
    def: &LoadDefinition,
    result: &SignalResult<()>,
    options: &GenerateOptions,
) -> GenerateLoad {
    let optimized = options.optimize.is_some() && def.input_mode() == InputMode::Pwm;
    let mut load = GenerateLoad {
        name: def.name.clone(),
        mode: def.input_mode().to_string(),
        success: result.is_ok(),
        samples: None,
        min_amplitude: None,
        max_amplitude: None,
        peak_frequency: None,
        amplitude_hash: None,
        harmonics: None,
        error: None,
    };

    match result {
        Ok(()) => {
            let summary = LoadSummary::of(def);
            load.samples = Some(summary.samples);
            load.min_amplitude = summary.range.map(|(lo, _)| lo);
            load.max_amplitude = summary.range.map(|(_, hi)| hi);
            load.peak_frequency = summary.peak_frequency;
            load.amplitude_hash = Some(summary.amplitude_hash);
            if optimized {
                load.harmonics = def.pwm().map(|s| s.harmonics.clone());
            }
        }
        Err(err) => load.error = Some(err.into()),
    }
    load
}
