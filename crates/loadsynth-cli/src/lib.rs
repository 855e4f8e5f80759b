//! LoadSynth CLI library.
//!
//! This crate provides the core functionality for the `loadsynth` binary:
//! definition file loading, the stderr logger, and the command
//! implementations.

pub mod commands;
pub mod input;
pub mod logger;
