//! Time-domain load expressions.
//!
//! An expression is parsed once into an [`Expr`] and then evaluated at every
//! sample time. Parsing reports the offending token and column; evaluation
//! is total and never allocates, so out-of-domain inputs yield NaN or
//! infinity instead of an error.
//!
//! ```
//! use loadsynth_backend_signal::expr::Expr;
//!
//! let expr = Expr::parse("1000*sin(2*pi*100*t)").unwrap();
//! assert!(expr.is_time_dependent());
//! assert!((expr.eval(0.0025) - 1000.0).abs() < 1e-9);
//! ```

pub mod functions;
mod lexer;
mod parser;

use crate::error::ExpressionError;
use functions::{Builtin, MAX_ARGS};
pub use parser::{MAX_HEIGHT, MAX_NESTING};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Expression AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal or named constant.
    Number(f64),
    /// The time variable `t`.
    Time,
    /// Unary negation.
    Neg(Box<Node>),
    /// Binary operation.
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// Function call resolved at parse time.
    Call { func: Builtin, args: Vec<Node> },
}

impl Node {
    fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
        Node::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    fn eval(&self, t: f64) -> f64 {
        match self {
            Node::Number(value) => *value,
            Node::Time => t,
            Node::Neg(inner) => -inner.eval(t),
            Node::Binary { op, lhs, rhs } => op.apply(lhs.eval(t), rhs.eval(t)),
            Node::Call { func, args } => {
                let mut values = [0.0; MAX_ARGS];
                for (slot, arg) in values.iter_mut().zip(args) {
                    *slot = arg.eval(t);
                }
                func.call(&values[..args.len()])
            }
        }
    }

    fn references_time(&self) -> bool {
        match self {
            Node::Number(_) => false,
            Node::Time => true,
            Node::Neg(inner) => inner.references_time(),
            Node::Binary { lhs, rhs, .. } => lhs.references_time() || rhs.references_time(),
            Node::Call { args, .. } => args.iter().any(Node::references_time),
        }
    }
}

/// A parsed expression of the time variable `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    source: String,
    root: Node,
}

impl Expr {
    /// Parses expression text.
    ///
    /// # Errors
    /// Returns an [`ExpressionError`] naming the offending token and column.
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let root = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// Evaluates the expression at time `t`.
    pub fn eval(&self, t: f64) -> f64 {
        self.root.eval(t)
    }

    /// Returns true if the expression references `t`.
    pub fn is_time_dependent(&self) -> bool {
        self.root.references_time()
    }

    /// The text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed tree.
    pub fn root(&self) -> &Node {
        &self.root
    }
}

impl std::str::FromStr for Expr {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parses and evaluates `expression` at a single time.
pub fn evaluate(expression: &str, t: f64) -> Result<f64, ExpressionError> {
    Ok(Expr::parse(expression)?.eval(t))
}
