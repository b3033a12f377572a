//! Writer for the .tab sheet format.

use std::fs;
use std::path::Path;

use crate::document::{CellContents, Sheet};
use crate::error::Result;

/// Write a sheet to a .tab file.
pub fn write_tab(path: &Path, sheet: &Sheet) -> Result<()> {
    fs::write(path, write_tab_content(sheet))?;
    Ok(())
}

/// Render a sheet as .tab text, sorted by cell name for stable output.
pub fn write_tab_content(sheet: &Sheet) -> String {
    let mut lines = vec!["# Celltab sheet".to_string()];

    let mut cells: Vec<_> = sheet.cells.iter().collect();
    cells.sort_by(|a, b| a.0.cmp(b.0));

    for (name, cell) in cells {
        let value_str = match &cell.contents {
            CellContents::Number(n) => n.to_string(),
            CellContents::Text(s) => format!("\"{}\"", escape_tab_text(s)),
            CellContents::Formula(formula) => format!("={}", formula),
        };
        lines.push(format!("{}: {}", name, value_str));
    }

    lines.join("\n") + "\n"
}

fn escape_tab_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}
