//! Error types for the Celltab engine.

use thiserror::Error;

/// Rejections raised while tokenizing or parsing a formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("formula contains no tokens")]
    Empty,

    #[error("unexpected character '{0}' in formula")]
    UnexpectedChar(char),

    #[error("malformed number literal '{0}'")]
    MalformedNumber(String),

    #[error("formula must begin with a number, a variable, or '('")]
    InvalidStart,

    #[error("expected a number, a variable, or '(' after '{0}'")]
    ExpectedOperand(String),

    #[error("expected an operator or ')' after '{0}'")]
    ExpectedOperator(String),

    #[error("formula cannot end with '{0}'")]
    InvalidEnd(String),

    #[error("unbalanced parentheses: {left} '(' versus {right} ')'")]
    UnbalancedParens { left: usize, right: usize },

    #[error("'{0}' is not a valid variable")]
    InvalidVariable(String),
}

/// Failures produced while evaluating a formula.
///
/// These are value-level outcomes: the sheet stores them as a cell's
/// error value rather than failing the operation that triggered the
/// evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("variable '{0}' has no numeric value")]
    UndefinedVariable(String),

    #[error("division by zero")]
    DivisionByZero,
}

/// A circular dependency found while computing a recalculation order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("circular dependency through cell '{cell}'")]
pub struct CycleError {
    /// The cell at which the traversal re-entered its own path.
    pub cell: String,
}
