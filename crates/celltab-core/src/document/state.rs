//! UI-agnostic sheet state.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use celltab_engine::engine::{DependencyGraph, Formula};
use celltab_engine::error::EvalError;

use crate::names::NamePolicy;

/// What was entered into a cell, after classification.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContents {
    Text(String),
    Number(f64),
    Formula(Formula),
}

impl fmt::Display for CellContents {
    /// The content string that reproduces this cell through
    /// [`Sheet::set_contents_of_cell`]: text verbatim, numbers in decimal
    /// form, formulas as `=` plus their normalized text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContents::Text(s) => write!(f, "{}", s),
            CellContents::Number(n) => write!(f, "{}", n),
            CellContents::Formula(formula) => write!(f, "={}", formula),
        }
    }
}

/// What a cell currently shows. Literal cells mirror their contents;
/// formula cells hold their latest evaluation result.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(EvalError),
}

/// A stored cell. Cells whose contents are empty text are never stored.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    pub(crate) contents: CellContents,
    pub(crate) value: CellValue,
}

/// The spreadsheet document: named cells, the dependency graph that keeps
/// their values consistent, and the name policy every boundary name
/// passes through.
pub struct Sheet {
    pub(crate) cells: HashMap<String, Cell>,
    pub(crate) graph: DependencyGraph,
    pub(crate) policy: NamePolicy,
    /// Current file path, if the sheet was loaded from or saved to one.
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has changes not yet written to disk.
    pub modified: bool,
}

impl Sheet {
    /// Create an empty sheet with the default name policy.
    pub fn new() -> Sheet {
        Sheet::with_policy(NamePolicy::default())
    }

    /// Create an empty sheet with an injected name policy.
    pub fn with_policy(policy: NamePolicy) -> Sheet {
        Sheet {
            cells: HashMap::new(),
            graph: DependencyGraph::new(),
            policy,
            file_path: None,
            modified: false,
        }
    }

    /// The canonical names of all non-empty cells, in no particular order.
    pub fn cell_names(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// The number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for Sheet {
    fn default() -> Sheet {
        Sheet::new()
    }
}
