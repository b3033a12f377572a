//! Parser for the .tab sheet format.

use std::path::Path;

use crate::error::{Result, SheetError};

/// One parsed line of a .tab file: the 1-based line number, the cell name
/// as written, and the content string to replay through
/// `set_contents_of_cell`.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub line: usize,
    pub name: String,
    pub contents: String,
}

/// Parse a .tab file into replayable entries.
pub fn parse_tab(path: &Path) -> Result<Vec<Entry>> {
    let content = std::fs::read_to_string(path)?;
    parse_tab_content(&content)
}

/// Parse .tab content from a string.
///
/// Lines are `NAME: CONTENTS`; blank lines and `#` comments are skipped.
/// Quoted contents are unescaped into literal text; everything else
/// passes through verbatim.
pub fn parse_tab_content(content: &str) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(SheetError::Parse {
                line: line_num + 1,
                message: "Expected 'NAME: CONTENTS' format".to_string(),
            });
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(SheetError::Parse {
                line: line_num + 1,
                message: "Missing cell name".to_string(),
            });
        }

        let value = value.trim();
        let contents = if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            unescape_tab_text(&value[1..value.len() - 1])
        } else {
            value.to_string()
        };

        entries.push(Entry {
            line: line_num + 1,
            name: name.to_string(),
            contents,
        });
    }

    Ok(entries)
}

fn unescape_tab_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
