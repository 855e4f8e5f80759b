//! Expression lexer.

use crate::error::ExpressionError;

/// Token types for load expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal (1, 2.5, .5, 1e-3)
    Number(f64),
    /// Identifier, lowercased (t, pi, sin, square)
    Ident(String),
    /// Plus operator
    Plus,
    /// Minus operator (binary or unary)
    Minus,
    /// Multiply operator
    Star,
    /// Divide operator
    Slash,
    /// Power operator
    Caret,
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Argument separator
    Comma,
    /// End of input
    Eof,
}

/// A token with its source text and 1-based column.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub text: String,
    pub column: usize,
}

/// Lexer for load expressions.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            column: 1,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, ExpressionError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.token == Token::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<SpannedToken, ExpressionError> {
        self.skip_whitespace();

        let column = self.column;
        let Some(c) = self.peek_char() else {
            return Ok(SpannedToken {
                token: Token::Eof,
                text: String::new(),
                column,
            });
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            c if c.is_ascii_digit() || c == '.' => return self.read_number(column),
            c if c.is_alphabetic() || c == '_' => {
                let ident = self.read_identifier();
                return Ok(SpannedToken {
                    token: Token::Ident(ident.to_lowercase()),
                    text: ident,
                    column,
                });
            }
            ch => return Err(ExpressionError::UnexpectedChar { ch, column }),
        };

        self.advance();
        Ok(SpannedToken {
            token,
            text: c.to_string(),
            column,
        })
    }

    fn read_number(&mut self, column: usize) -> Result<SpannedToken, ExpressionError> {
        let mut literal = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || c == '.' {
                literal.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // Exponent only when digits follow, so `2e` stays `2` then `e`
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            let sign = lookahead.next_if(|c| *c == '+' || *c == '-');
            if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                literal.push(self.advance().unwrap_or('e'));
                if sign.is_some() {
                    literal.push(self.advance().unwrap_or('+'));
                }
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_digit() {
                        literal.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        match literal.parse::<f64>() {
            Ok(value) => Ok(SpannedToken {
                token: Token::Number(value),
                text: literal,
                column,
            }),
            Err(_) => Err(ExpressionError::InvalidNumber { literal, column }),
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.column += 1;
        }
        c
    }
}
