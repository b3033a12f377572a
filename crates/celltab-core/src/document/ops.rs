//! Cell update orchestration.
//!
//! Every content change flows through [`Sheet::set_contents_of_cell`]:
//! the raw string is classified, the dependency graph is updated to match
//! the new contents, the recalculation order is computed (rejecting
//! cycles before anything is committed), and every affected formula cell
//! is re-evaluated in that order.

use std::collections::HashSet;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use celltab_engine::engine::{Formula, recalculation_order};

use crate::error::{Result, SheetError};

use super::state::{Cell, CellContents, CellValue, Sheet};

/// Literal-number rule for cell contents. Deliberately narrower than the
/// formula tokenizer's number grammar: no exponent form, no leading
/// zeros, no bare fraction. Anything else stores as text.
fn number_literal_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?$").expect("number literal regex must compile")
    })
}

fn parse_number_literal(contents: &str) -> Option<f64> {
    if number_literal_re().is_match(contents) {
        contents.parse().ok()
    } else {
        None
    }
}

impl Sheet {
    /// Set the contents of `name` from a raw content string and return
    /// the affected set: the canonical name plus every cell whose value
    /// transitively depends on it.
    ///
    /// The raw string is classified exactly one way: a leading `=` parses
    /// the remainder as a formula, a decimal literal stores a number, the
    /// empty string clears the cell, anything else stores text. A formula
    /// that would create a circular dependency fails and leaves the sheet
    /// untouched; evaluation failures do not fail the call, they become
    /// cell values.
    pub fn set_contents_of_cell(&mut self, name: &str, contents: &str) -> Result<HashSet<String>> {
        let name = self.canonical_name(name)?;
        let order = if let Some(source) = contents.strip_prefix('=') {
            self.set_formula(&name, source)?
        } else if let Some(number) = parse_number_literal(contents) {
            self.set_literal(
                &name,
                Some(Cell {
                    contents: CellContents::Number(number),
                    value: CellValue::Number(number),
                }),
            )?
        } else if contents.is_empty() {
            self.set_literal(&name, None)?
        } else {
            self.set_literal(
                &name,
                Some(Cell {
                    contents: CellContents::Text(contents.to_string()),
                    value: CellValue::Text(contents.to_string()),
                }),
            )?
        };
        self.modified = true;
        debug!("set {}: {} cell(s) affected", name, order.len());
        Ok(order.into_iter().collect())
    }

    /// The contents of `name`; an absent cell reads as empty text.
    pub fn get_cell_contents(&self, name: &str) -> Result<CellContents> {
        let name = self.canonical_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.contents.clone())
            .unwrap_or_else(|| CellContents::Text(String::new())))
    }

    /// The value of `name`; an absent cell reads as empty text.
    pub fn get_cell_value(&self, name: &str) -> Result<CellValue> {
        let name = self.canonical_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.value.clone())
            .unwrap_or_else(|| CellValue::Text(String::new())))
    }

    /// The content string that reproduces `name` through
    /// [`Sheet::set_contents_of_cell`].
    pub fn contents_string(&self, name: &str) -> Result<String> {
        Ok(self.get_cell_contents(name)?.to_string())
    }

    /// Canonicalize `raw` and check it against the sheet's name policy.
    pub(crate) fn canonical_name(&self, raw: &str) -> Result<String> {
        let canonical = self.policy.normalize(raw);
        if self.policy.is_valid(&canonical) {
            Ok(canonical)
        } else {
            Err(SheetError::InvalidName(raw.to_string()))
        }
    }

    /// Store a literal cell (or clear one). Literals read nothing, so the
    /// cell's dependee edges are always replaced with the empty set.
    fn set_literal(&mut self, name: &str, cell: Option<Cell>) -> Result<Vec<String>> {
        self.graph.replace_dependees(name, std::iter::empty::<&str>());
        match cell {
            Some(cell) => {
                self.cells.insert(name.to_string(), cell);
            }
            None => {
                self.cells.remove(name);
            }
        }
        let order = recalculation_order(name, &self.graph)?;
        self.reevaluate(&order);
        Ok(order)
    }

    /// Parse and store a formula cell.
    ///
    /// The cell's dependee edges are replaced first and the recalculation
    /// order computed from the updated graph; contents are committed only
    /// once that order is known cycle-free, and on a cycle the prior
    /// dependee set is restored with no other mutation.
    fn set_formula(&mut self, name: &str, source: &str) -> Result<Vec<String>> {
        let formula = Formula::parse_with(
            source,
            |raw| self.policy.normalize(raw),
            |canonical| self.policy.is_valid(canonical),
        )?;

        let old_dependees: Vec<String> = self.graph.dependees(name).map(str::to_string).collect();
        self.graph.replace_dependees(name, formula.variables());
        let order = match recalculation_order(name, &self.graph) {
            Ok(order) => order,
            Err(cycle) => {
                self.graph.replace_dependees(name, &old_dependees);
                return Err(cycle.into());
            }
        };

        self.cells.insert(
            name.to_string(),
            Cell {
                contents: CellContents::Formula(formula),
                // Placeholder: `name` is always in the order, so the
                // re-evaluation pass below rewrites it.
                value: CellValue::Text(String::new()),
            },
        );
        self.reevaluate(&order);
        Ok(order)
    }

    /// Re-evaluate every formula cell in `order`, front to back. Literal
    /// cells keep their mirrored value; a formula's failure becomes that
    /// cell's error value.
    fn reevaluate(&mut self, order: &[String]) {
        for name in order {
            let result = match self.cells.get(name) {
                Some(Cell {
                    contents: CellContents::Formula(formula),
                    ..
                }) => Some(formula.evaluate(|var| self.lookup(var))),
                _ => None,
            };
            if let Some(result) = result
                && let Some(cell) = self.cells.get_mut(name)
            {
                cell.value = match result {
                    Ok(number) => CellValue::Number(number),
                    Err(error) => CellValue::Error(error),
                };
            }
        }
    }

    /// Variable lookup for formula evaluation: only a cell whose current
    /// value is a number resolves. Absent, text-valued, and error-valued
    /// cells all read as undefined.
    fn lookup(&self, name: &str) -> Option<f64> {
        match self.cells.get(name) {
            Some(Cell {
                value: CellValue::Number(n),
                ..
            }) => Some(*n),
            _ => None,
        }
    }
}
