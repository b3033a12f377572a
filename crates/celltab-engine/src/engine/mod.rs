//! Spreadsheet computation engine API.
//!
//! This module provides the pieces a cell store composes into a working
//! spreadsheet:
//!
//! - [`DependencyGraph`] - ordered (dependee, dependent) pairs with
//!   queries in both directions
//! - [`Formula`] - infix arithmetic parsing and evaluation over named
//!   variables
//! - [`recalculation_order`] - cycle detection and a safe re-evaluation
//!   order for everything reachable from a changed cell

mod formula;
mod graph;
mod recalc;
mod token;

pub use formula::Formula;
pub use graph::DependencyGraph;
pub use recalc::recalculation_order;
pub use token::{Op, Token};
