//! Periodic and aperiodic waveform generators.
//!
//! Each periodic waveform has two call conventions:
//!
//! - **Radian**: `square(x, duty)`, `saw(x)`, `tri(x)` repeat every `2π` in `x`,
//!   like `sin(x)`.
//! - **Timed**: `square_timed(t, period, duty, delay)` and friends take an
//!   explicit period in seconds and an optional start delay.
//!
//! All generators are total: out-of-range duty, width, and delay values are
//! clamped, and a non-positive period yields `0.0`. NaN inputs propagate.

use std::f64::consts::TAU;

/// Fraction of the current cycle in `[0, 1)`, or `None` for an unusable period.
fn cycle_fraction(x: f64, period: f64, delay: f64) -> Option<f64> {
    if !period.is_finite() || period <= 0.0 {
        return None;
    }
    let frac = (x - delay).rem_euclid(period) / period;
    // rem_euclid may round up to exactly `period` for tiny negative inputs
    Some(if frac >= 1.0 { 0.0 } else { frac })
}

fn clamp_delay(delay: f64) -> f64 {
    delay.max(0.0)
}

/// Square wave over `2π`: `+1` for the first `duty` fraction of the cycle, else `-1`.
pub fn square(x: f64, duty: f64) -> f64 {
    square_timed(x, TAU, duty, 0.0)
}

/// Square wave with an explicit period in seconds and a start delay.
pub fn square_timed(t: f64, period: f64, duty: f64, delay: f64) -> f64 {
    let duty = duty.clamp(0.0, 1.0);
    match cycle_fraction(t, period, clamp_delay(delay)) {
        Some(frac) if frac < duty => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    }
}

/// Sawtooth over `2π`, ramping linearly from `-1` to `1`.
pub fn saw(x: f64) -> f64 {
    saw_timed(x, TAU, 0.0)
}

/// Sawtooth with an explicit period in seconds and a start delay.
pub fn saw_timed(t: f64, period: f64, delay: f64) -> f64 {
    match cycle_fraction(t, period, clamp_delay(delay)) {
        Some(frac) => 2.0 * frac - 1.0,
        None => 0.0,
    }
}

/// Triangle over `2π`: starts at `-1`, peaks at `+1` mid-cycle.
pub fn tri(x: f64) -> f64 {
    tri_timed(x, TAU, 0.0)
}

/// Triangle with an explicit period in seconds and a start delay.
pub fn tri_timed(t: f64, period: f64, delay: f64) -> f64 {
    match cycle_fraction(t, period, clamp_delay(delay)) {
        Some(frac) if frac < 0.5 => 4.0 * frac - 1.0,
        Some(frac) => 3.0 - 4.0 * frac,
        None => 0.0,
    }
}

/// Single rectangular pulse: `1` inside `[start, start + width)`, else `0`.
pub fn pulse(t: f64, start: f64, width: f64) -> f64 {
    let width = width.max(0.0);
    if t >= start && t < start + width {
        1.0
    } else {
        0.0
    }
}

/// Heaviside step: `1` when `t >= t0`, else `0`.
pub fn step(t: f64, t0: f64) -> f64 {
    if t >= t0 {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_square_default_duty() {
        assert_eq!(square(0.0, 0.5), 1.0);
        assert_eq!(square(PI * 0.5, 0.5), 1.0);
        assert_eq!(square(PI * 1.5, 0.5), -1.0);
        assert_eq!(square(TAU + 0.1, 0.5), 1.0);
        assert_eq!(square(-0.1, 0.5), -1.0);
    }

    #[test]
    fn test_square_duty_clamped() {
        assert_eq!(square(0.1, -3.0), -1.0);
        assert_eq!(square(6.0, 7.0), 1.0);
        assert_eq!(square(1.0, 0.1), -1.0);
    }

    #[test]
    fn test_square_timed_delay() {
        // 20 ms period, 30% duty, 1 ms delay
        assert_eq!(square_timed(0.0015, 0.02, 0.3, 0.001), 1.0);
        assert_eq!(square_timed(0.0075, 0.02, 0.3, 0.001), -1.0);
        // Negative delay is clamped to zero
        assert_eq!(
            square_timed(0.003, 0.02, 0.3, -0.5),
            square_timed(0.003, 0.02, 0.3, 0.0)
        );
    }

    #[test]
    fn test_non_positive_period_is_zero() {
        assert_eq!(square_timed(1.0, 0.0, 0.5, 0.0), 0.0);
        assert_eq!(saw_timed(1.0, -1.0, 0.0), 0.0);
        assert_eq!(tri_timed(1.0, f64::INFINITY, 0.0), 0.0);
    }

    #[test]
    fn test_saw_ramp() {
        assert!((saw(0.0) + 1.0).abs() < EPS);
        assert!(saw(PI).abs() < EPS);
        assert!((saw_timed(0.0075, 0.01, 0.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_tri_shape() {
        assert!((tri(0.0) + 1.0).abs() < EPS);
        assert!((tri(PI * 0.5)).abs() < EPS);
        assert!((tri(PI) - 1.0).abs() < EPS);
        assert!((tri(PI * 1.5)).abs() < EPS);
        assert!((tri_timed(0.0025, 0.01, 0.0)).abs() < EPS);
    }

    #[test]
    fn test_pulse_window() {
        assert_eq!(pulse(0.0009, 0.001, 0.003), 0.0);
        assert_eq!(pulse(0.001, 0.001, 0.003), 1.0);
        assert_eq!(pulse(0.0039, 0.001, 0.003), 1.0);
        assert_eq!(pulse(0.004, 0.001, 0.003), 0.0);
        assert_eq!(pulse(0.001, 0.001, -1.0), 0.0);
    }

    #[test]
    fn test_step() {
        assert_eq!(step(-0.1, 0.0), 0.0);
        assert_eq!(step(0.0, 0.0), 1.0);
        assert_eq!(step(0.004, 0.005), 0.0);
        assert_eq!(step(0.005, 0.005), 1.0);
    }

    #[test]
    fn test_radian_and_timed_agree() {
        let omega = 2.0 * PI * 50.0;
        for &t in &[0.0013, 0.0047, 0.0061, 0.0123, 0.0171, 0.0333] {
            let x = omega * t;
            assert_eq!(square(x, 0.5), square_timed(t, TAU / omega, 0.5, 0.0));
            assert!((saw(x) - saw_timed(t, TAU / omega, 0.0)).abs() < 1e-9);
            assert!((tri(x) - tri_timed(t, TAU / omega, 0.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_nan_propagates_or_stays_total() {
        assert!(saw(f64::NAN).is_nan());
        assert_eq!(step(f64::NAN, 0.0), 0.0);
    }
}
