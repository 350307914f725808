//! # dlx
//!
//! `dlx` is a command-line exact cover solver built on Knuth's Dancing Links.
//! It reads exact cover problems in the `.xc` text format, or as rows typed on
//! the command line, and Sudoku puzzles, which it encodes as exact cover
//! problems before solving.
//!
//! ## Features
//!
//! -   **Multiple Input Formats**:
//!     -   `.xc` files (`p xc <columns> <rows>` followed by one row per line)
//!     -   Plain text rows of column indices
//!     -   Sudoku puzzle files (4×4, 9×9, 16×16 and 25×25)
//! -   **Column Selection**: Choose between the minimum-size heuristic and the
//!     leftmost active column.
//! -   **Verification**: Option to check the cover found.
//! -   **Statistics**: Parse and search times, matrix size, search nodes,
//!     choices, backtracks, link updates and memory usage.
//! -   **Export**: For Sudoku puzzles, the exact cover encoding can be written
//!     to an `.xc` file.
//! -   **Memory Management**: Uses `tikv-jemallocator` for memory allocation and
//!     reports its statistics.
//!
//! ## Usage
//!
//! ```sh
//! # Solve an exact cover file, or every .xc and .sudoku file in a directory
//! dlx problem.xc
//! dlx puzzles/
//!
//! # Solve an exact cover file with the unguided column choice
//! dlx file --path problem.xc --selection first-active
//!
//! # Solve rows given as text
//! dlx text --input "0 1
//! 2 3
//! 0 1 2 3"
//!
//! # Solve Sudoku puzzles and export the first one's encoding
//! dlx sudoku --path puzzles.sudoku --export-xc --print-solution
//!
//! # Shell completions
//! dlx completions bash
//! ```
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Enable debug logging (default: `false`).
//! -   `--verify <BOOL>`: Check the cover found (default: `true`).
//! -   `--stats <BOOL>`: Print statistics (default: `true`).
//! -   `-p, --print-solution`: Print the chosen rows (default: `false`).
//! -   `--selection <minimum-size|first-active>`: Column selection heuristic
//!     (default: `minimum-size`).

use crate::command_line::cli::{
    init_logging, solve_file, solve_path, solve_sudoku, solve_text, Cli, Commands,
};
use clap::{CommandFactory, Parser};

mod command_line;

/// Global allocator using `tikv-jemallocator` for performance and memory
/// usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point.
///
/// Parses command-line arguments, installs logging and dispatches to the
/// handler of the chosen command. Errors are printed to stderr and exit with
/// status 1.
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::File { path, common }) => {
            init_logging(common.debug);
            solve_file(&path, &common)
        }
        Some(Commands::Text { input, common }) => {
            init_logging(common.debug);
            solve_text(&input, &common)
        }
        Some(Commands::Sudoku {
            path,
            export_xc,
            common,
        }) => {
            init_logging(common.debug);
            solve_sudoku(&path, export_xc, &common)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => match cli.input {
            Some(path) => {
                init_logging(cli.common.debug);
                solve_path(&path, &cli.common)
            }
            None => Err("No command provided. Use --help for more information.".to_string()),
        },
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
