//! Recursive-descent parser for load expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := ('-' | '+') unary | power
//! power := atom ('^' unary)?
//! atom  := NUMBER | 't' | 'pi' | 'e' | NAME '(' args ')' | '(' expr ')'
//! args  := expr (',' expr)*
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so
//! `-2^2 = -4` and `2^3^2 = 512`.
//!
//! Parsing and evaluation both recurse, so nesting is limited to
//! [`MAX_NESTING`] levels and trees to [`MAX_HEIGHT`] nodes from root to leaf.

use std::f64::consts::{E, PI};

use super::functions::{self, MAX_ARGS};
use super::lexer::{Lexer, SpannedToken, Token};
use super::{BinaryOp, Node};
use crate::error::ExpressionError;

/// Deepest nesting of parentheses, calls, and prefix or power operators.
pub const MAX_NESTING: usize = 64;

/// Tallest expression tree, counting operator chains such as `1+1+...+1`.
pub const MAX_HEIGHT: usize = 1024;

/// A subtree and its height.
type Parsed = (Node, usize);

/// Parses expression text into an AST.
pub fn parse(input: &str) -> Result<Node, ExpressionError> {
    let tokens = Lexer::new(input).tokenize()?;
    if tokens.len() == 1 {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
    };
    let (root, _) = parser.parse_expr()?;

    let tok = parser.peek();
    match tok.token {
        Token::Eof => Ok(root),
        Token::RParen => Err(ExpressionError::UnmatchedParen { column: tok.column }),
        _ => Err(ExpressionError::TrailingInput {
            found: tok.text.clone(),
            column: tok.column,
        }),
    }
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> &SpannedToken {
        // tokenize always ends with Eof and the parser never advances past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> SpannedToken {
        let tok = self.peek().clone();
        if tok.token != Token::Eof {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(tok: &SpannedToken, expected: &'static str) -> ExpressionError {
        match tok.token {
            Token::Eof => ExpressionError::UnexpectedEnd {
                expected,
                column: tok.column,
            },
            _ => ExpressionError::UnexpectedToken {
                found: tok.text.clone(),
                expected,
                column: tok.column,
            },
        }
    }

    /// Height of a new node over children of height `child`.
    fn grow(child: usize, at: &SpannedToken) -> Result<usize, ExpressionError> {
        if child >= MAX_HEIGHT {
            return Err(ExpressionError::TooDeep { column: at.column });
        }
        Ok(child + 1)
    }

    fn parse_expr(&mut self) -> Result<Parsed, ExpressionError> {
        let (mut lhs, mut height) = self.parse_term()?;
        loop {
            let op = match self.peek().token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok((lhs, height)),
            };
            let op_tok = self.advance();
            let (rhs, rhs_height) = self.parse_term()?;
            height = Self::grow(height.max(rhs_height), &op_tok)?;
            lhs = Node::binary(op, lhs, rhs);
        }
    }

    fn parse_term(&mut self) -> Result<Parsed, ExpressionError> {
        let (mut lhs, mut height) = self.parse_unary()?;
        loop {
            let op = match self.peek().token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => return Ok((lhs, height)),
            };
            let op_tok = self.advance();
            let (rhs, rhs_height) = self.parse_unary()?;
            height = Self::grow(height.max(rhs_height), &op_tok)?;
            lhs = Node::binary(op, lhs, rhs);
        }
    }

    /// Every recursive path passes through here, so this is where nesting is counted.
    fn parse_unary(&mut self) -> Result<Parsed, ExpressionError> {
        if self.nesting >= MAX_NESTING {
            return Err(ExpressionError::TooDeep {
                column: self.peek().column,
            });
        }
        self.nesting += 1;
        let parsed = self.parse_prefix();
        self.nesting -= 1;
        parsed
    }

    fn parse_prefix(&mut self) -> Result<Parsed, ExpressionError> {
        match self.peek().token {
            Token::Minus => {
                let op_tok = self.advance();
                let (inner, height) = self.parse_unary()?;
                Ok((Node::Neg(Box::new(inner)), Self::grow(height, &op_tok)?))
            }
            Token::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Parsed, ExpressionError> {
        let (base, base_height) = self.parse_atom()?;
        if self.peek().token == Token::Caret {
            let op_tok = self.advance();
            let (exponent, exp_height) = self.parse_unary()?;
            let height = Self::grow(base_height.max(exp_height), &op_tok)?;
            return Ok((Node::binary(BinaryOp::Pow, base, exponent), height));
        }
        Ok((base, base_height))
    }

    fn parse_atom(&mut self) -> Result<Parsed, ExpressionError> {
        let tok = self.advance();
        match tok.token {
            Token::Number(value) => Ok((Node::Number(value), 1)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect_close(&tok, "')'")?;
                Ok(inner)
            }
            Token::Ident(ref name) => {
                if self.peek().token == Token::LParen {
                    self.advance();
                    self.parse_call(name, &tok)
                } else {
                    Ok((Self::identifier(name, &tok)?, 1))
                }
            }
            Token::RParen => Err(ExpressionError::UnexpectedToken {
                found: tok.text,
                expected: "a value",
                column: tok.column,
            }),
            _ => Err(Self::unexpected(&tok, "a value")),
        }
    }

    fn identifier(name: &str, tok: &SpannedToken) -> Result<Node, ExpressionError> {
        match name {
            "t" => Ok(Node::Time),
            "pi" => Ok(Node::Number(PI)),
            "e" => Ok(Node::Number(E)),
            _ if functions::is_function(name) => Err(ExpressionError::UnexpectedToken {
                found: tok.text.clone(),
                expected: "'(' after function name",
                column: tok.column,
            }),
            _ => Err(ExpressionError::UnknownIdentifier {
                name: tok.text.clone(),
                column: tok.column,
            }),
        }
    }

    /// Parses arguments after `name(`, resolving the callee on the final count.
    fn parse_call(&mut self, name: &str, name_tok: &SpannedToken) -> Result<Parsed, ExpressionError> {
        let Some(expected) = functions::accepted_arities(name) else {
            return Err(ExpressionError::UnknownFunction {
                name: name_tok.text.clone(),
                column: name_tok.column,
            });
        };

        let mut args = Vec::new();
        let mut height = 0;
        if self.peek().token != Token::RParen {
            loop {
                let (arg, arg_height) = self.parse_expr()?;
                height = height.max(arg_height);
                args.push(arg);
                if self.peek().token != Token::Comma {
                    break;
                }
                self.advance();
            }
        }
        self.expect_close(name_tok, "',' or ')'")?;

        let func = functions::resolve(name, args.len())
            .filter(|_| args.len() <= MAX_ARGS)
            .ok_or_else(|| ExpressionError::ArityMismatch {
                name: name_tok.text.clone(),
                expected,
                found: args.len(),
                column: name_tok.column,
            })?;

        Ok((Node::Call { func, args }, Self::grow(height, name_tok)?))
    }

    /// Consumes a ')' closing the group opened at `open`.
    fn expect_close(
        &mut self,
        open: &SpannedToken,
        expected: &'static str,
    ) -> Result<(), ExpressionError> {
        let tok = self.advance();
        match tok.token {
            Token::RParen => Ok(()),
            Token::Eof => Err(ExpressionError::UnclosedParen {
                column: self.open_paren_column(open),
            }),
            _ => Err(Self::unexpected(&tok, expected)),
        }
    }

    /// Column of the '(' belonging to `open` (itself, or the one after a function name).
    fn open_paren_column(&self, open: &SpannedToken) -> usize {
        match open.token {
            Token::LParen => open.column,
            _ => self
                .tokens
                .iter()
                .find(|t| t.column > open.column && t.token == Token::LParen)
                .map_or(open.column, |t| t.column),
        }
    }
}
