//! Validated infix formulas.
//!
//! A [`Formula`] is built from raw text in one step: the text is tokenized,
//! every variable is normalized and checked, and the token stream is checked
//! against the infix syntax rules. Construction either yields a formula that
//! is always evaluable, or a [`FormulaFormatError`] describing what was wrong.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use super::token::{Token, is_variable, tokenize};

/// Why a formula could not be constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaFormatError {
    #[error("formula is empty")]
    Empty,

    #[error("invalid token '{0}'")]
    InvalidToken(String),

    #[error("number '{0}' is out of range")]
    NumberOutOfRange(String),

    #[error("'{0}' is not a legal variable name after normalization")]
    IllegalVariable(String),

    #[error("variable '{0}' is not valid for this spreadsheet")]
    InvalidVariable(String),

    #[error("formula must start with a number, variable or '(' but starts with '{0}'")]
    BadStart(String),

    #[error("formula must end with a number, variable or ')' but ends with '{0}'")]
    BadEnd(String),

    #[error("'{found}' cannot follow '{after}': expected a number, variable or '('")]
    ExpectedOperand { after: String, found: String },

    #[error("'{found}' cannot follow '{after}': expected an operator or ')'")]
    ExpectedOperator { after: String, found: String },

    #[error("')' at token {0} has no matching '('")]
    UnmatchedClose(usize),

    #[error("{0} '(' left unclosed")]
    UnclosedOpen(usize),
}

/// An immutable, syntactically valid infix formula.
#[derive(Clone, Debug)]
pub struct Formula {
    tokens: Vec<Token>,
    /// Distinct normalized variables in order of first appearance.
    variables: Vec<String>,
}

impl Formula {
    /// Parse `text` with the identity normalizer and a validator that accepts
    /// every legal variable.
    pub fn new(text: &str) -> Result<Formula, FormulaFormatError> {
        Formula::with_rules(text, |name| name.to_string(), |_| true)
    }

    /// Parse `text`, passing every variable through `normalize` and then
    /// requiring the normalized name to be legal and accepted by `is_valid`.
    pub fn with_rules<N, V>(
        text: &str,
        normalize: N,
        is_valid: V,
    ) -> Result<Formula, FormulaFormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let mut tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(FormulaFormatError::Empty);
        }

        check_syntax(&tokens)?;

        let mut variables: Vec<String> = Vec::new();
        for token in tokens.iter_mut() {
            let Token::Variable(raw) = token else {
                continue;
            };
            let name = normalize(raw.as_str());
            if !is_variable(&name) {
                return Err(FormulaFormatError::IllegalVariable(name));
            }
            if !is_valid(&name) {
                return Err(FormulaFormatError::InvalidVariable(name));
            }
            if !variables.contains(&name) {
                variables.push(name.clone());
            }
            *raw = name;
        }

        Ok(Formula { tokens, variables })
    }

    /// The distinct normalized variables, in order of first appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().map(String::as_str)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Enforce the infix rules over the token stream:
/// the first token opens an operand, the last closes one, operators and `(`
/// are followed by operands or `(`, operands and `)` are followed by
/// operators or `)`, and parentheses balance.
fn check_syntax(tokens: &[Token]) -> Result<(), FormulaFormatError> {
    if let Some(first) = tokens.first()
        && !(first.is_operand() || *first == Token::LeftParen)
    {
        return Err(FormulaFormatError::BadStart(first.to_string()));
    }
    if let Some(last) = tokens.last()
        && !(last.is_operand() || *last == Token::RightParen)
    {
        return Err(FormulaFormatError::BadEnd(last.to_string()));
    }

    let mut open = 0usize;
    let mut close = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::LeftParen => open += 1,
            Token::RightParen => {
                close += 1;
                if close > open {
                    return Err(FormulaFormatError::UnmatchedClose(idx));
                }
            }
            _ => {}
        }

        let Some(next) = tokens.get(idx + 1) else {
            continue;
        };
        let opens_operand = matches!(token, Token::Operator(_) | Token::LeftParen);
        if opens_operand && !(next.is_operand() || *next == Token::LeftParen) {
            return Err(FormulaFormatError::ExpectedOperand {
                after: token.to_string(),
                found: next.to_string(),
            });
        }
        if !opens_operand && !matches!(next, Token::Operator(_) | Token::RightParen) {
            return Err(FormulaFormatError::ExpectedOperator {
                after: token.to_string(),
                found: next.to_string(),
            });
        }
    }

    if open != close {
        return Err(FormulaFormatError::UnclosedOpen(open - close));
    }
    Ok(())
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Formula) -> bool {
        self.tokens == other.tokens
    }
}

// Literals are always finite, so token equality is reflexive.
impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_formula_rejected() {
        assert_eq!(Formula::new(""), Err(FormulaFormatError::Empty));
        assert_eq!(Formula::new("   "), Err(FormulaFormatError::Empty));
    }

    #[test]
    fn test_start_and_end_rules() {
        assert!(matches!(
            Formula::new("+1"),
            Err(FormulaFormatError::BadStart(_))
        ));
        assert!(matches!(
            Formula::new(")"),
            Err(FormulaFormatError::BadStart(_))
        ));
        assert!(matches!(
            Formula::new("1+"),
            Err(FormulaFormatError::BadEnd(_))
        ));
        assert!(matches!(
            Formula::new("(1"),
            Err(FormulaFormatError::BadEnd(_)) | Err(FormulaFormatError::UnclosedOpen(_))
        ));
    }

    #[test]
    fn test_following_rules() {
        assert!(matches!(
            Formula::new("1 + * 2"),
            Err(FormulaFormatError::ExpectedOperand { .. })
        ));
        assert!(matches!(
            Formula::new("( )"),
            Err(FormulaFormatError::ExpectedOperand { .. })
        ));
        assert!(matches!(
            Formula::new("1 2"),
            Err(FormulaFormatError::ExpectedOperator { .. })
        ));
        assert!(matches!(
            Formula::new("x (y)"),
            Err(FormulaFormatError::ExpectedOperator { .. })
        ));
        assert!(matches!(
            Formula::new("(1)(2)"),
            Err(FormulaFormatError::ExpectedOperator { .. })
        ));
    }

    #[test]
    fn test_parenthesis_balance() {
        assert_eq!(
            Formula::new("(1))+(2"),
            Err(FormulaFormatError::UnmatchedClose(3))
        );
        assert_eq!(
            Formula::new("((1+2)"),
            Err(FormulaFormatError::UnclosedOpen(1))
        );
        assert!(Formula::new("((1+2)*(3))").is_ok());
    }

    #[test]
    fn test_error_message_names_the_rule() {
        let err = Formula::new("1 2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "'2' cannot follow '1': expected an operator or ')'"
        );
    }

    #[test]
    fn test_normalizer_and_validator() {
        let upper = |s: &str| s.to_uppercase();
        let f = Formula::with_rules("a1 + b2 * a1", upper, |_| true).unwrap();
        assert_eq!(f.variables().collect::<Vec<_>>(), vec!["A1", "B2"]);
        assert_eq!(f.to_string(), "A1+B2*A1");

        let only_a = |s: &str| s.starts_with('A');
        assert_eq!(
            Formula::with_rules("A1 + B2", |s| s.to_string(), only_a),
            Err(FormulaFormatError::InvalidVariable("B2".to_string()))
        );

        let breaks_names = |s: &str| format!("{}!", s);
        assert_eq!(
            Formula::with_rules("x", breaks_names, |_| true),
            Err(FormulaFormatError::IllegalVariable("x!".to_string()))
        );
    }

    #[test]
    fn test_canonical_form_drops_whitespace_and_reformats_numbers() {
        let f = Formula::new(" 2.0 * ( x + 3.50 ) ").unwrap();
        assert_eq!(f.to_string(), "2*(x+3.5)");
    }

    #[test]
    fn test_round_trip_through_canonical_form() {
        for text in ["1", "x1", "(a+b)*c/2.25", "1e3 - y_z", "((((7))))", ".5/_"] {
            let f = Formula::new(text).unwrap();
            let again = Formula::new(&f.to_string()).unwrap();
            assert_eq!(f, again, "round trip failed for {}", text);
        }
    }

    #[test]
    fn test_equality_is_numeric_for_literals() {
        assert_eq!(Formula::new("2.0 + x").unwrap(), Formula::new("2.000+x").unwrap());
        assert_eq!(Formula::new("1e2").unwrap(), Formula::new("100").unwrap());
        assert_ne!(Formula::new("2 + x").unwrap(), Formula::new("x + 2").unwrap());
    }

    #[test]
    fn test_equality_is_case_sensitive_without_normalization() {
        assert_ne!(Formula::new("x1 + y").unwrap(), Formula::new("X1 + y").unwrap());

        let upper = |s: &str| s.to_uppercase();
        let a = Formula::with_rules("x1 + y", upper, |_| true).unwrap();
        let b = Formula::with_rules("X1 + Y", upper, |_| true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(Formula::new("2.0*x").unwrap());
        assert!(set.contains(&Formula::new("2*x").unwrap()));
        assert!(!set.contains(&Formula::new("2*y").unwrap()));
    }

    #[test]
    fn test_from_str() {
        let f: Formula = "a + 1".parse().unwrap();
        assert_eq!(f.variables().collect::<Vec<_>>(), vec!["a"]);
        assert!("a +".parse::<Formula>().is_err());
    }
}
