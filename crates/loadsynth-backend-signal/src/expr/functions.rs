//! Function table for expression calls.
//!
//! Calls resolve at parse time on `(name, argument count)`. A waveform name
//! has one entry per call convention; entries are searched in table order and
//! the radian convention is listed first, so an exact radian arity wins and
//! every other accepted count falls through to the timed convention.

use crate::waveform;

/// Most arguments any function accepts.
pub const MAX_ARGS: usize = 4;

/// A resolved callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
    Ceil,
    Floor,
    Min,
    Max,
    Pow,
    /// `square(x[, duty])`
    Square,
    /// `square(t, period, duty[, delay])`
    SquareTimed,
    /// `saw(x)`
    Saw,
    /// `saw(t, period[, delay])`
    SawTimed,
    /// `tri(x)`
    Tri,
    /// `tri(t, period[, delay])`
    TriTimed,
    /// `pulse(t, start, width)`
    Pulse,
    /// `step(t[, t0])`
    Step,
}

struct FunctionEntry {
    name: &'static str,
    min_args: usize,
    max_args: usize,
    builtin: Builtin,
}

const fn entry(name: &'static str, min_args: usize, max_args: usize, builtin: Builtin) -> FunctionEntry {
    FunctionEntry {
        name,
        min_args,
        max_args,
        builtin,
    }
}

const FUNCTIONS: &[FunctionEntry] = &[
    entry("sin", 1, 1, Builtin::Sin),
    entry("cos", 1, 1, Builtin::Cos),
    entry("tan", 1, 1, Builtin::Tan),
    entry("asin", 1, 1, Builtin::Asin),
    entry("acos", 1, 1, Builtin::Acos),
    entry("atan", 1, 1, Builtin::Atan),
    entry("exp", 1, 1, Builtin::Exp),
    entry("log", 1, 1, Builtin::Ln),
    entry("ln", 1, 1, Builtin::Ln),
    entry("log10", 1, 1, Builtin::Log10),
    entry("sqrt", 1, 1, Builtin::Sqrt),
    entry("abs", 1, 1, Builtin::Abs),
    entry("ceil", 1, 1, Builtin::Ceil),
    entry("floor", 1, 1, Builtin::Floor),
    entry("min", 2, 2, Builtin::Min),
    entry("max", 2, 2, Builtin::Max),
    entry("pow", 2, 2, Builtin::Pow),
    entry("square", 1, 2, Builtin::Square),
    entry("square", 3, 4, Builtin::SquareTimed),
    entry("saw", 1, 1, Builtin::Saw),
    entry("saw", 2, 3, Builtin::SawTimed),
    entry("tri", 1, 1, Builtin::Tri),
    entry("tri", 2, 3, Builtin::TriTimed),
    entry("pulse", 3, 3, Builtin::Pulse),
    entry("step", 1, 2, Builtin::Step),
];

/// Resolves a lowercased function name and argument count.
pub fn resolve(name: &str, argc: usize) -> Option<Builtin> {
    FUNCTIONS
        .iter()
        .find(|f| f.name == name && (f.min_args..=f.max_args).contains(&argc))
        .map(|f| f.builtin)
}

/// Returns true if any entry carries this name.
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.iter().any(|f| f.name == name)
}

/// Human-readable argument counts accepted under `name`, e.g. "1 to 4".
pub fn accepted_arities(name: &str) -> Option<String> {
    let (lo, hi) = FUNCTIONS
        .iter()
        .filter(|f| f.name == name)
        .fold(None, |acc: Option<(usize, usize)>, f| match acc {
            Some((lo, hi)) => Some((lo.min(f.min_args), hi.max(f.max_args))),
            None => Some((f.min_args, f.max_args)),
        })?;
    Some(if lo == hi {
        lo.to_string()
    } else {
        format!("{} to {}", lo, hi)
    })
}

impl Builtin {
    /// Evaluates the function. `args.len()` is within the resolved arity.
    pub fn call(self, args: &[f64]) -> f64 {
        let arg = |i: usize, default: f64| args.get(i).copied().unwrap_or(default);
        let x = arg(0, f64::NAN);

        match self {
            Builtin::Sin => x.sin(),
            Builtin::Cos => x.cos(),
            Builtin::Tan => x.tan(),
            Builtin::Asin => x.asin(),
            Builtin::Acos => x.acos(),
            Builtin::Atan => x.atan(),
            Builtin::Exp => x.exp(),
            Builtin::Ln => x.ln(),
            Builtin::Log10 => x.log10(),
            Builtin::Sqrt => x.sqrt(),
            Builtin::Abs => x.abs(),
            Builtin::Ceil => x.ceil(),
            Builtin::Floor => x.floor(),
            Builtin::Min => x.min(arg(1, x)),
            Builtin::Max => x.max(arg(1, x)),
            Builtin::Pow => x.powf(arg(1, 1.0)),
            Builtin::Square => waveform::square(x, arg(1, 0.5)),
            Builtin::SquareTimed => {
                waveform::square_timed(x, arg(1, f64::NAN), arg(2, 0.5), arg(3, 0.0))
            }
            Builtin::Saw => waveform::saw(x),
            Builtin::SawTimed => waveform::saw_timed(x, arg(1, f64::NAN), arg(2, 0.0)),
            Builtin::Tri => waveform::tri(x),
            Builtin::TriTimed => waveform::tri_timed(x, arg(1, f64::NAN), arg(2, 0.0)),
            Builtin::Pulse => waveform::pulse(x, arg(1, f64::NAN), arg(2, 0.0)),
            Builtin::Step => waveform::step(x, arg(1, 0.0)),
        }
    }
}
