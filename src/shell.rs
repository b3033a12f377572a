//! The interactive shell and `-c` command mode.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use celltab_core::{CellValue, Sheet};
use log::debug;

/// Run semicolon-separated commands, stopping at the first failure.
pub fn run_commands(sheet: &mut Sheet, script: &str) -> Result<()> {
    for command in script.split(';') {
        let command = command.trim();
        if command.is_empty() {
            continue;
        }
        execute(sheet, command)?;
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input. Errors are
/// printed and the shell keeps going.
pub fn run_repl(sheet: &mut Sheet) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            if sheet.modified {
                eprintln!("Warning: unsaved changes discarded");
            }
            return Ok(());
        }
        if let Err(e) = execute(sheet, line) {
            eprintln!("Error: {:#}", e);
        }
    }
}

fn execute(sheet: &mut Sheet, command: &str) -> Result<()> {
    let (verb, rest) = match command.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (command, ""),
    };
    debug!("command: {} {:?}", verb, rest);

    match verb {
        "set" => {
            // A bare `set <cell>` clears the cell.
            let (name, contents) = match rest.split_once(char::is_whitespace) {
                Some((name, contents)) => (name, contents.trim()),
                None if !rest.is_empty() => (rest, ""),
                None => bail!("usage: set <cell> <contents>"),
            };
            sheet
                .set_contents_of_cell(name, contents)
                .with_context(|| format!("cannot set {}", name))?;
        }
        "get" => {
            let name = expect_arg(rest, "get <cell>")?;
            println!("{}", sheet.contents_string(name)?);
        }
        "value" | "val" => {
            let name = expect_arg(rest, "value <cell>")?;
            println!("{}", format_value(&sheet.get_cell_value(name)?));
        }
        "cells" => {
            let mut names: Vec<&str> = sheet.cell_names().collect();
            names.sort_unstable();
            for name in names {
                println!("{}", name);
            }
        }
        "save" => {
            if rest.is_empty() {
                sheet.save_file()?;
            } else {
                sheet.save_file_as(Path::new(rest))?;
            }
        }
        "load" => {
            let path = expect_arg(rest, "load <path>")?;
            sheet.load_file(Path::new(path))?;
        }
        other => bail!("unknown command '{}'", other),
    }
    Ok(())
}

fn expect_arg<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("usage: {}", usage);
    }
    Ok(rest)
}

/// Format a value for display: text verbatim, numbers via
/// [`format_number`], errors as `#ERR:` plus the reason.
fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Error(e) => format!("#ERR: {}", e),
    }
}

/// Format a number for display.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.50");
        assert_eq!(format_number(f64::INFINITY), "#INF!");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&CellValue::Text("hi".to_string())), "hi");
        assert_eq!(format_value(&CellValue::Number(6.0)), "6");
        assert_eq!(
            format_value(&CellValue::Error(celltab_core::EvalError::DivisionByZero)),
            "#ERR: division by zero"
        );
    }

    #[test]
    fn test_set_then_value() {
        let mut sheet = Sheet::new();
        run_commands(&mut sheet, "set A1 5; set B1 =A1*2").unwrap();
        assert_eq!(
            sheet.get_cell_value("B1").unwrap(),
            CellValue::Number(10.0)
        );
    }

    #[test]
    fn test_bare_set_clears_the_cell() {
        let mut sheet = Sheet::new();
        run_commands(&mut sheet, "set A1 5; set A1").unwrap();
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_unknown_command_fails() {
        let mut sheet = Sheet::new();
        assert!(run_commands(&mut sheet, "frobnicate A1").is_err());
    }
}
