//! Pasted time/amplitude tables and linear resampling.
//!
//! Text is parsed into strict `f64` columns at this boundary; nothing past
//! [`parse_tabular`] ever sees raw text.

use crate::error::TabularParseError;

const DELIMITERS: &[char] = &['\t', ',', ' '];

fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

/// Parses two-column text into `(times, amplitudes)`.
///
/// Blank lines are skipped. Each remaining line splits on the first run of
/// tabs, commas, or spaces into exactly two finite numbers. Times must be
/// strictly increasing. Line numbers in errors are 1-based and count blank
/// lines.
pub fn parse_tabular(text: &str) -> Result<(Vec<f64>, Vec<f64>), TabularParseError> {
    let mut times = Vec::new();
    let mut amplitudes = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (time_text, amp_text) = split_fields(line, line_no)?;
        let time = parse_field(time_text, line_no, "time")?;
        let amplitude = parse_field(amp_text, line_no, "amplitude")?;

        if let Some(&previous) = times.last() {
            if time <= previous {
                return Err(TabularParseError::NonIncreasingTime {
                    line: line_no,
                    previous,
                    time,
                });
            }
        }

        times.push(time);
        amplitudes.push(amplitude);
    }

    match times.len() {
        0 => Err(TabularParseError::NoData),
        1 => Err(TabularParseError::TooFewPoints { found: 1 }),
        _ => Ok((times, amplitudes)),
    }
}

fn split_fields(line: &str, line_no: usize) -> Result<(&str, &str), TabularParseError> {
    let Some(split_at) = line.find(is_delimiter) else {
        return Err(TabularParseError::MissingField { line: line_no });
    };

    let first = &line[..split_at];
    let rest = line[split_at..].trim_start_matches(is_delimiter);

    if rest.contains(is_delimiter) {
        let found = 1 + rest.split(is_delimiter).filter(|f| !f.is_empty()).count();
        return Err(TabularParseError::TooManyFields {
            line: line_no,
            found,
        });
    }

    Ok((first, rest))
}

fn parse_field(text: &str, line_no: usize, column: &'static str) -> Result<f64, TabularParseError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TabularParseError::InvalidNumber {
            line: line_no,
            column,
            value: text.to_string(),
        }),
    }
}

/// Linearly interpolates the table at `t`.
///
/// Outside `[times[0], times[last]]` the nearest endpoint value is returned.
/// Knot times return their amplitude exactly. An empty table yields `0.0`
/// and a NaN time yields NaN.
/// `times` must be strictly increasing and as long as `amplitudes`.
pub fn resample(times: &[f64], amplitudes: &[f64], t: f64) -> f64 {
    let len = times.len().min(amplitudes.len());
    if len == 0 {
        return 0.0;
    }
    let (times, amplitudes) = (&times[..len], &amplitudes[..len]);

    if t.is_nan() {
        return f64::NAN;
    }
    if t <= times[0] {
        return amplitudes[0];
    }
    if t >= times[len - 1] {
        return amplitudes[len - 1];
    }

    // First knot strictly after t; 1..len by the checks above
    let hi = times.partition_point(|&knot| knot <= t);
    let lo = hi - 1;
    if times[lo] == t {
        return amplitudes[lo];
    }

    let frac = (t - times[lo]) / (times[hi] - times[lo]);
    amplitudes[lo] + frac * (amplitudes[hi] - amplitudes[lo])
}

/// A parsed table ready for resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularSeries {
    times: Vec<f64>,
    amplitudes: Vec<f64>,
}

impl TabularSeries {
    /// Parses pasted text. See [`parse_tabular`].
    pub fn parse(text: &str) -> Result<Self, TabularParseError> {
        let (times, amplitudes) = parse_tabular(text)?;
        Ok(Self { times, amplitudes })
    }

    /// Knot times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Knot amplitudes.
    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// Number of knots.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false for a parsed table.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Interpolated amplitude at `t`.
    pub fn resample(&self, t: f64) -> f64 {
        resample(&self.times, &self.amplitudes, t)
    }

    /// Splits into `(times, amplitudes)`.
    pub fn into_columns(self) -> (Vec<f64>, Vec<f64>) {
        (self.times, self.amplitudes)
    }
}
