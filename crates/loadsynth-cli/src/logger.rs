//! Colored stderr logger for the `log` facade.

use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes one colored line per record to stderr.
struct CliLogger {
    level: LevelFilter,
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "error".red().bold(),
            Level::Warn => "warning".yellow().bold(),
            Level::Info => "info".cyan(),
            Level::Debug => "debug".dimmed(),
            Level::Trace => "trace".dimmed(),
        };
        eprintln!("{}: {}", tag, record.args());
    }

    fn flush(&self) {}
}

/// Maps `-v`/`-q` flags to a level filter. Warnings show by default.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the logger. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    static LOGGER: std::sync::OnceLock<CliLogger> = std::sync::OnceLock::new();
    let logger = LOGGER.get_or_init(|| CliLogger {
        level: LevelFilter::Trace,
    });
    // Already installed is fine; the max level below still applies
    let _ = log::set_logger(logger);
    log::set_max_level(level);
}
