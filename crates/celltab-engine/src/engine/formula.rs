//! Infix arithmetic formulas over named variables.
//!
//! A [`Formula`] is validated while it is parsed and immutable afterwards.
//! Evaluation resolves variables through a caller-supplied lookup and uses
//! a two-stack scan with eager precedence: `*` and `/` are applied as soon
//! as their right operand arrives, `+` and `-` when the next
//! same-precedence boundary (a `)`, another `+`/`-`, or the end of input)
//! is reached.

use std::collections::HashSet;
use std::fmt;

use crate::error::{EvalError, FormulaError};

use super::token::{Op, Token, tokenize};

/// A parsed, validated formula.
///
/// Variable tokens are stored in their normalized form; the same spelling
/// is what [`Formula::variables`] reports and what evaluation passes to
/// the lookup function.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    tokens: Vec<Token>,
    variables: HashSet<String>,
}

impl Formula {
    /// Parse with the identity normalizer and an accept-all validator.
    pub fn parse(source: &str) -> Result<Formula, FormulaError> {
        Self::parse_with(source, |v| v.to_string(), |_| true)
    }

    /// Parse `source`, passing every variable token through `normalize`
    /// and then `validate`. A rejected variable fails the parse.
    ///
    /// Validation is a single left-to-right pass over the token stream:
    /// the first token must be a number, a variable, or `(`; a `(` or an
    /// operator must be followed by a number, a variable, or `(`; a
    /// number, a variable, or `)` must be followed by an operator or `)`;
    /// parentheses must balance; the formula must be non-empty and must
    /// not end with an operator or `(`.
    pub fn parse_with<N, V>(
        source: &str,
        normalize: N,
        validate: V,
    ) -> Result<Formula, FormulaError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let raw = tokenize(source)?;
        if raw.is_empty() {
            return Err(FormulaError::Empty);
        }

        let mut tokens = Vec::with_capacity(raw.len());
        let mut variables = HashSet::new();
        let mut lparens = 0usize;
        let mut rparens = 0usize;
        let mut prev: Option<&Token> = None;

        for token in &raw {
            match prev {
                None => {
                    if !matches!(token, Token::Number(_) | Token::Var(_) | Token::LParen) {
                        return Err(FormulaError::InvalidStart);
                    }
                }
                Some(p @ (Token::LParen | Token::Op(_))) => {
                    if !matches!(token, Token::Number(_) | Token::Var(_) | Token::LParen) {
                        return Err(FormulaError::ExpectedOperand(p.to_string()));
                    }
                }
                Some(p @ (Token::Number(_) | Token::Var(_) | Token::RParen)) => {
                    if !matches!(token, Token::Op(_) | Token::RParen) {
                        return Err(FormulaError::ExpectedOperator(p.to_string()));
                    }
                }
            }

            match token {
                Token::LParen => lparens += 1,
                Token::RParen => rparens += 1,
                _ => {}
            }

            match token {
                Token::Var(raw_name) => {
                    let name = normalize(raw_name);
                    if !validate(&name) {
                        return Err(FormulaError::InvalidVariable(name));
                    }
                    variables.insert(name.clone());
                    tokens.push(Token::Var(name));
                }
                other => tokens.push(other.clone()),
            }

            prev = Some(token);
        }

        if let Some(last @ (Token::Op(_) | Token::LParen)) = raw.last() {
            return Err(FormulaError::InvalidEnd(last.to_string()));
        }
        if lparens != rparens {
            return Err(FormulaError::UnbalancedParens {
                left: lparens,
                right: rparens,
            });
        }

        Ok(Formula { tokens, variables })
    }

    /// The distinct normalized variable names appearing in the formula.
    pub fn variables(&self) -> &HashSet<String> {
        &self.variables
    }

    /// Evaluate the formula. `lookup` resolves a variable to its numeric
    /// value, or `None` when it has none; an unresolved variable or a
    /// division by zero fails the whole evaluation.
    pub fn evaluate<L>(&self, mut lookup: L) -> Result<f64, EvalError>
    where
        L: FnMut(&str) -> Option<f64>,
    {
        let mut values: Vec<f64> = Vec::new();
        let mut pending: Vec<Pending> = Vec::new();

        for token in &self.tokens {
            match token {
                Token::Number(n) => push_operand(*n, &mut values, &mut pending)?,
                Token::Var(name) => {
                    let value =
                        lookup(name).ok_or_else(|| EvalError::UndefinedVariable(name.clone()))?;
                    push_operand(value, &mut values, &mut pending)?;
                }
                Token::Op(op) if op.is_additive() => {
                    if let Some(&Pending::Op(top)) = pending.last()
                        && top.is_additive()
                    {
                        pending.pop();
                        resolve(top, &mut values)?;
                    }
                    pending.push(Pending::Op(*op));
                }
                Token::Op(op) => pending.push(Pending::Op(*op)),
                Token::LParen => pending.push(Pending::LParen),
                Token::RParen => {
                    if let Some(&Pending::Op(top)) = pending.last()
                        && top.is_additive()
                    {
                        pending.pop();
                        resolve(top, &mut values)?;
                    }
                    pending.pop(); // the matching '('
                    if let Some(&Pending::Op(top)) = pending.last()
                        && top.is_multiplicative()
                    {
                        pending.pop();
                        resolve(top, &mut values)?;
                    }
                }
            }
        }

        // At most one additive operator can still be pending.
        if let Some(Pending::Op(op)) = pending.pop() {
            resolve(op, &mut values)?;
        }
        Ok(pop(&mut values))
    }
}

/// The normalized token text, concatenated. Suitable for persistence:
/// re-parsing the result yields a formula that evaluates identically.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Pending {
    Op(Op),
    LParen,
}

fn pop(values: &mut Vec<f64>) -> f64 {
    values
        .pop()
        .expect("operand stack underflow is ruled out by parse-time validation")
}

/// Apply `op` to the two topmost operands (LIFO: the most recent pop is
/// the right-hand side) and push the result.
fn resolve(op: Op, values: &mut Vec<f64>) -> Result<(), EvalError> {
    let rhs = pop(values);
    let lhs = pop(values);
    values.push(apply(op, lhs, rhs)?);
    Ok(())
}

/// Push an operand, first collapsing a pending `*`/`/` against the value
/// immediately to its left.
fn push_operand(
    value: f64,
    values: &mut Vec<f64>,
    pending: &mut Vec<Pending>,
) -> Result<(), EvalError> {
    if let Some(&Pending::Op(top)) = pending.last()
        && top.is_multiplicative()
    {
        pending.pop();
        let lhs = pop(values);
        values.push(apply(top, lhs, value)?);
    } else {
        values.push(value);
    }
    Ok(())
}

fn apply(op: Op, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    match op {
        Op::Add => Ok(lhs + rhs),
        Op::Sub => Ok(lhs - rhs),
        Op::Mul => Ok(lhs * rhs),
        Op::Div => {
            if rhs == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(lhs / rhs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_vars(_: &str) -> Option<f64> {
        None
    }

    fn eval(source: &str) -> Result<f64, EvalError> {
        Formula::parse(source).unwrap().evaluate(no_vars)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
        assert_eq!(eval("2-3*4"), Ok(-10.0));
        assert_eq!(eval("1+2*3+4"), Ok(11.0));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("10-4-3"), Ok(3.0));
        assert_eq!(eval("24/4/3"), Ok(2.0));
    }

    #[test]
    fn test_nested_parentheses() {
        assert_eq!(eval("((2))"), Ok(2.0));
        assert_eq!(eval("2*(3+(4-1))"), Ok(12.0));
        assert_eq!(eval("(5*2)+8"), Ok(18.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("10/0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("1/(2-2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_undefined_variable() {
        let formula = Formula::parse("A1+1").unwrap();
        assert_eq!(
            formula.evaluate(no_vars),
            Err(EvalError::UndefinedVariable("A1".to_string()))
        );
    }

    #[test]
    fn test_variable_lookup() {
        let formula = Formula::parse("x*y-2+35/7").unwrap();
        let result = formula.evaluate(|name| match name {
            "x" => Some(4.0),
            "y" => Some(3.0),
            _ => None,
        });
        assert_eq!(result, Ok(15.0));
    }

    #[test]
    fn test_variables_are_deduplicated_and_normalized() {
        let formula =
            Formula::parse_with("a1+A1*b2", |v| v.to_ascii_uppercase(), |_| true).unwrap();
        let mut names: Vec<_> = formula.variables().iter().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["A1".to_string(), "B2".to_string()]);
    }

    #[test]
    fn test_normalized_spelling_is_used_for_lookup() {
        let formula = Formula::parse_with("a1+1", |v| v.to_ascii_uppercase(), |_| true).unwrap();
        let result = formula.evaluate(|name| (name == "A1").then_some(2.0));
        assert_eq!(result, Ok(3.0));
    }

    #[test]
    fn test_rejected_variable_fails_the_parse() {
        let err = Formula::parse_with("a1+b2", |v| v.to_string(), |v| v != "b2").unwrap_err();
        assert_eq!(err, FormulaError::InvalidVariable("b2".to_string()));
    }

    #[test]
    fn test_leading_minus_is_not_negation() {
        assert_eq!(Formula::parse("-5.3").unwrap_err(), FormulaError::InvalidStart);
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(Formula::parse("").unwrap_err(), FormulaError::Empty);
        assert_eq!(Formula::parse("   ").unwrap_err(), FormulaError::Empty);
    }

    #[test]
    fn test_adjacent_operands_are_rejected() {
        assert_eq!(
            Formula::parse("2 5 + 3").unwrap_err(),
            FormulaError::ExpectedOperator("2".to_string())
        );
    }

    #[test]
    fn test_operator_pairs_are_rejected() {
        assert_eq!(
            Formula::parse("2+*3").unwrap_err(),
            FormulaError::ExpectedOperand("+".to_string())
        );
    }

    #[test]
    fn test_trailing_operator_is_rejected() {
        assert_eq!(
            Formula::parse("2+3-").unwrap_err(),
            FormulaError::InvalidEnd("-".to_string())
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(
            Formula::parse("(2+3").unwrap_err(),
            FormulaError::UnbalancedParens { left: 1, right: 0 }
        );
    }

    #[test]
    fn test_misplaced_close_paren() {
        // The stray ')' is legal after an operand; the error surfaces at
        // the '(' that follows the 3.
        assert_eq!(
            Formula::parse("2)+3(").unwrap_err(),
            FormulaError::ExpectedOperator("3".to_string())
        );
    }

    #[test]
    fn test_display_round_trip() {
        for source in ["2.5e9 + x5 / 17", "(5 * 2) + 8", "x*y-2+35/9", "1/(a+b)"] {
            let first = Formula::parse(source).unwrap();
            let reparsed = Formula::parse(&first.to_string()).unwrap();
            let lookup = |name: &str| match name {
                "x5" => Some(34.0),
                "x" => Some(2.0),
                "y" => Some(9.0),
                "a" => Some(1.0),
                "b" => Some(3.0),
                _ => None,
            };
            assert_eq!(first.evaluate(lookup), reparsed.evaluate(lookup));
            assert_eq!(first.variables(), reparsed.variables());
        }
    }

    #[test]
    fn test_single_operand() {
        assert_eq!(eval("42"), Ok(42.0));
        assert_eq!(eval("(7)"), Ok(7.0));
    }
}
