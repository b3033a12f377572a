//! Celltab - a named-cell spreadsheet with a command-line shell.

mod shell;

use std::env;
use std::path::PathBuf;

use celltab_core::Sheet;

fn print_usage() {
    eprintln!("Usage: celltab [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet file to open (.tab)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <CMDS>      Run semicolon-separated commands and exit");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  set <cell> <contents>     Assign cell contents (=... for formulas)");
    eprintln!("  get <cell>                Print cell contents");
    eprintln!("  value <cell>              Print cell value");
    eprintln!("  cells                     List non-empty cells");
    eprintln!("  save [path] / load <path> File I/O");
    eprintln!("  quit                      Leave the shell");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut file_path: Option<PathBuf> = None;
    let mut command: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    std::process::exit(1);
                }
                command = Some(args[i].to_string());
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let mut sheet = match Sheet::with_file(file_path) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match command {
        Some(commands) => shell::run_commands(&mut sheet, &commands),
        None => shell::run_repl(&mut sheet),
    };
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
