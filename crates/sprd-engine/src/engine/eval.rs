//! Formula evaluation.
//!
//! Evaluation walks the token stream once with a value stack and an operator
//! stack. Multiplicative operators are applied as soon as their right operand
//! is known; additive operators wait until the next additive operator, a
//! closing parenthesis or the end of the formula. Operators of equal
//! precedence therefore associate left to right.
//!
//! Problems found while evaluating (an unbound variable, division by zero)
//! are returned as a [`FormulaError`] value. Nothing panics.

use std::fmt;

use thiserror::Error;

use super::formula::Formula;
use super::token::{Operator, Token};

/// A failed evaluation, kept as a value so it can be stored in a cell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct FormulaError {
    pub reason: String,
}

impl FormulaError {
    pub fn new(reason: impl Into<String>) -> FormulaError {
        FormulaError {
            reason: reason.into(),
        }
    }
}

enum Pending {
    Op(Operator),
    Open,
}

impl Operator {
    fn apply(self, left: f64, right: f64) -> Result<f64, FormulaError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Sub => Ok(left - right),
            Operator::Mul => Ok(left * right),
            Operator::Div if right == 0.0 => Err(FormulaError::new(format!(
                "division by zero: {} / {}",
                left, right
            ))),
            Operator::Div => Ok(left / right),
        }
    }
}

fn pop_value(values: &mut Vec<f64>) -> Result<f64, FormulaError> {
    values
        .pop()
        .ok_or_else(|| FormulaError::new("malformed expression: missing operand"))
}

/// Pop the top operator and two operands and push the result, provided the
/// top operator satisfies `wanted`.
fn reduce_if(
    values: &mut Vec<f64>,
    pending: &mut Vec<Pending>,
    wanted: fn(Operator) -> bool,
) -> Result<(), FormulaError> {
    let Some(Pending::Op(op)) = pending.last() else {
        return Ok(());
    };
    let op = *op;
    if !wanted(op) {
        return Ok(());
    }
    pending.pop();
    let right = pop_value(values)?;
    let left = pop_value(values)?;
    values.push(op.apply(left, right)?);
    Ok(())
}

fn push_operand(
    value: f64,
    values: &mut Vec<f64>,
    pending: &mut Vec<Pending>,
) -> Result<(), FormulaError> {
    values.push(value);
    reduce_if(values, pending, Operator::is_multiplicative)
}

fn is_additive(op: Operator) -> bool {
    !op.is_multiplicative()
}

impl Formula {
    /// Evaluate against `lookup`, which resolves a normalized variable name to
    /// its numeric value. The first lookup failure ends evaluation and its
    /// message becomes the error reason.
    pub fn evaluate<F, E>(&self, mut lookup: F) -> Result<f64, FormulaError>
    where
        F: FnMut(&str) -> Result<f64, E>,
        E: fmt::Display,
    {
        let mut values: Vec<f64> = Vec::new();
        let mut pending: Vec<Pending> = Vec::new();

        for token in self.tokens() {
            match token {
                Token::Number(n) => push_operand(*n, &mut values, &mut pending)?,
                Token::Variable(name) => {
                    let value = lookup(name.as_str()).map_err(|e| FormulaError::new(e.to_string()))?;
                    push_operand(value, &mut values, &mut pending)?;
                }
                Token::Operator(op) if op.is_multiplicative() => pending.push(Pending::Op(*op)),
                Token::Operator(op) => {
                    reduce_if(&mut values, &mut pending, is_additive)?;
                    pending.push(Pending::Op(*op));
                }
                Token::LeftParen => pending.push(Pending::Open),
                Token::RightParen => {
                    reduce_if(&mut values, &mut pending, is_additive)?;
                    match pending.pop() {
                        Some(Pending::Open) => {}
                        _ => return Err(FormulaError::new("malformed expression: unmatched ')'")),
                    }
                    reduce_if(&mut values, &mut pending, Operator::is_multiplicative)?;
                }
            }
        }

        reduce_if(&mut values, &mut pending, is_additive)?;
        let result = pop_value(&mut values)?;
        if !values.is_empty() || !pending.is_empty() {
            return Err(FormulaError::new("malformed expression: leftover operands"));
        }
        Ok(result)
    }
}
