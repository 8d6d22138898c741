//! Formula tokenization.
//!
//! Splits raw infix text into numbers, variables, operators and parentheses.
//! Whitespace separates tokens and is otherwise discarded. Any character that
//! does not start one of the recognised token classes is reported as an
//! invalid token rather than silently skipped.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::formula::FormulaFormatError;

/// One of the four binary arithmetic operators.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    fn from_symbol(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }
}

/// A validated formula token.
///
/// Numeric tokens compare numerically, so `2.0` and `2.000` are the same
/// token. All other tokens compare by their text.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Variable(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    /// Numbers and variables.
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(name) => f.write_str(name),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"(?x)
              (?P<lparen>\()
            | (?P<rparen>\))
            | (?P<op>[-+*/])
            | (?P<var>[A-Za-z_][A-Za-z0-9_]*)
            | (?P<num>(?:[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)(?:[eE][-+]?[0-9]+)?)
            | (?P<ws>\s+)
            | (?P<bad>.)",
        )
        .expect("formula token regex must compile")
    })
}

fn variable_re() -> &'static Regex {
    static VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
    VARIABLE_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("variable name regex must compile")
    })
}

/// Returns true if `name` is a legal variable: a letter or underscore
/// followed by any number of letters, digits or underscores.
pub fn is_variable(name: &str) -> bool {
    variable_re().is_match(name)
}

/// Split `text` into tokens. Variable tokens are returned exactly as written;
/// normalization is the caller's concern.
pub fn tokenize(text: &str) -> Result<Vec<Token>, FormulaFormatError> {
    let mut tokens = Vec::new();

    for caps in token_re().captures_iter(text) {
        if caps.name("ws").is_some() {
            continue;
        }
        if let Some(bad) = caps.name("bad") {
            return Err(FormulaFormatError::InvalidToken(bad.as_str().to_string()));
        }

        let token = if caps.name("lparen").is_some() {
            Token::LeftParen
        } else if caps.name("rparen").is_some() {
            Token::RightParen
        } else if let Some(op) = caps.name("op") {
            let symbol = op.as_str().chars().next().and_then(Operator::from_symbol);
            match symbol {
                Some(op) => Token::Operator(op),
                None => return Err(FormulaFormatError::InvalidToken(op.as_str().to_string())),
            }
        } else if let Some(var) = caps.name("var") {
            Token::Variable(var.as_str().to_string())
        } else if let Some(num) = caps.name("num") {
            let lexeme = num.as_str();
            match lexeme.parse::<f64>() {
                Ok(n) if n.is_finite() => Token::Number(n),
                Ok(_) => return Err(FormulaFormatError::NumberOutOfRange(lexeme.to_string())),
                Err(_) => return Err(FormulaFormatError::InvalidToken(lexeme.to_string())),
            }
        } else {
            continue;
        };
        tokens.push(token);
    }

    Ok(tokens)
}
