//! LoadSynth Load Definition Library
//!
//! This crate provides the types, validation, and storage for LoadSynth load
//! definitions. A load definition declares one excitation (a math expression,
//! a pasted time/amplitude table, or a PWM description) sampled on a uniform
//! time grid.
//!
//! # Example
//!
//! ```
//! use loadsynth_spec::{LoadDefinition, LoadInput, LoadStore};
//! use loadsynth_spec::validation::validate_definition;
//!
//! let def = LoadDefinition::new(
//!     "sine-100hz",
//!     0.01,
//!     0.0001,
//!     LoadInput::expression("1000*sin(2*pi*100*t)"),
//! );
//!
//! assert!(validate_definition(&def).is_ok());
//! assert_eq!(def.sample_count().unwrap(), 101);
//!
//! let mut store = LoadStore::new();
//! store.add(def);
//! assert_eq!(store.count(), 1);
//! ```
//!
//! # Modules
//!
//! - [`definition`]: Load definition, input groups, and computed arrays
//! - [`error`]: Validation and store error types
//! - [`store`]: Ordered, caller-owned collection of definitions
//! - [`validation`]: Definition validation functions

pub mod definition;
pub mod error;
mod samples;
pub mod store;
pub mod validation;

pub use definition::{
    sample_count, ComputedSeries, InputMode, LoadDefinition, LoadInput, PwmHarmonic, PwmSettings,
    DEFAULT_CARRIER_FREQUENCY, DEFAULT_OUTPUT_AMPLITUDE, DEFAULT_TARGET_FREQUENCY, MAX_SAMPLES,
};
pub use error::{ErrorCode, StoreError, ValidationError, ValidationResult};
pub use store::LoadStore;
pub use validation::{validate_definition, validate_tabular};
