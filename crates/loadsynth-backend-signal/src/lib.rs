//! LoadSynth Signal Backend
//!
//! This crate turns a [`LoadDefinition`](loadsynth_spec::LoadDefinition) into
//! sampled time series and their spectra. All operations are synchronous,
//! stateless, and deterministic: the same definition always produces the
//! same arrays.
//!
//! # Input modes
//!
//! - **Expression**: a math expression in `t` (see [`expr`]) evaluated at
//!   every grid time, with waveform functions from [`waveform`]
//! - **Tabular**: a pasted time/amplitude table (see [`tabular`]) linearly
//!   resampled onto the grid
//! - **Pwm**: natural-sampling PWM of a harmonic sum (see [`pwm`]), with
//!   harmonics chosen by hand or by [`optimize_harmonics`]
//!
//! # Example
//!
//! ```
//! use loadsynth_backend_signal::refresh;
//! use loadsynth_spec::{LoadDefinition, LoadInput};
//!
//! let mut def = LoadDefinition::new(
//!     "sine-100hz",
//!     0.01,
//!     0.0001,
//!     LoadInput::expression("1000*sin(2*pi*100*t)"),
//! );
//! refresh(&mut def).unwrap();
//!
//! assert_eq!(def.computed.time.len(), 101);
//! assert_eq!(def.computed.fft_frequency.len(), 51);
//! ```

pub mod error;
pub mod expr;
pub mod generate;
pub mod optimize;
pub mod pwm;
pub mod spectrum;
pub mod tabular;
pub mod waveform;

pub use error::{ExpressionError, SignalError, SignalResult, TabularParseError};
pub use expr::{evaluate, Expr};
pub use generate::{compute_fft, generate, refresh, time_grid};
pub use optimize::{optimize_harmonics, optimize_harmonics_with, OptimizeStrategy};
pub use spectrum::{compute_spectrum, Spectrum};
pub use tabular::{parse_tabular, resample, TabularSeries};
