//! celltab-engine - the computation core of the Celltab spreadsheet.
//!
//! This crate knows nothing about cell stores, files, or user interfaces.
//! It provides the three pieces every change to a sheet flows through:
//! the dependency graph, the formula parser/evaluator, and the
//! recalculation-order walk.

pub mod engine;
pub mod error;

pub use engine::{DependencyGraph, Formula, Op, Token, recalculation_order};
pub use error::{CycleError, EvalError, FormulaError};
