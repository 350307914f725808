#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use dlx_solver::dlx::format::{parse_file, parse_xc};
use dlx_solver::dlx::problem::{Problem, MAX_COLUMNS};
use dlx_solver::dlx::selection::ColumnSelectionType;
use dlx_solver::dlx::solution::{SearchStats, Solution};
use dlx_solver::sudoku::parse::parse_sudoku_file;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Defines the command-line interface for the exact cover solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "dlx", version, about = "An exact cover solver using Dancing Links")]
pub(crate) struct Cli {
    /// An optional path. Without a subcommand, a directory is searched for
    /// `.xc` and `.sudoku` files and a single file is solved according to its
    /// extension.
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `sudoku`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve an exact cover problem in the `.xc` format.
    File {
        /// Path to the `.xc` file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve an exact cover problem given as text, one row per line.
    /// Without a `p xc` line the column count is the largest index plus one.
    Text {
        /// Rows of 0-based column indices (e.g. "0 1\n2 3").
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every Sudoku puzzle in a file through its exact cover encoding.
    Sudoku {
        /// Path to the puzzle file. See `sudoku::parse` for the accepted layouts.
        #[arg(long)]
        path: PathBuf,

        /// Write the exact cover encoding of the first puzzle to `<path>.xc`.
        #[arg(short, long, default_value_t = false)]
        export_xc: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug logging from the solver. `RUST_LOG` takes precedence.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check that the cover found is exact.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the identities of the chosen rows.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// The heuristic used to pick the column to branch on.
    #[arg(long, default_value_t = ColumnSelectionType::MinimumSize)]
    pub(crate) selection: ColumnSelectionType,
}

/// Installs the `tracing` subscriber. Library events are shown from `warn`
/// up, or from `debug` up with `--debug`, unless `RUST_LOG` says otherwise.
pub(crate) fn init_logging(debug: bool) {
    let default = if debug {
        "dlx_solver=debug"
    } else {
        "dlx_solver=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Solves every `.xc` and `.sudoku` file below a directory.
///
/// # Errors
///
/// If the path is not a directory, or any file fails to parse.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("xc") => solve_file(file_path, common)?,
            Some("sudoku") => solve_sudoku(file_path, false, common)?,
            _ => eprintln!("Skipping unsupported file: {}", file_path.display()),
        }
    }

    Ok(())
}

/// Solves a path given without a subcommand: a directory is walked, a
/// `.sudoku` file is solved as puzzles and anything else is read as `.xc`.
///
/// # Errors
///
/// If the path does not exist or its contents fail to parse.
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if path.is_dir() {
        solve_dir(path, common)
    } else if path.extension().is_some_and(|ext| ext == "sudoku") {
        solve_sudoku(path, false, common)
    } else {
        solve_file(path, common)
    }
}

/// Parses and solves an `.xc` file.
///
/// # Errors
///
/// If the file cannot be read or is malformed.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let problem =
        parse_file(path).map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    solve_and_report(&problem, common, Some(path), parse_time)
}

/// Parses and solves rows given as text.
///
/// # Errors
///
/// If the text is not a list of rows.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let problem = parse_text_rows(input)?;
    let parse_time = time.elapsed();

    solve_and_report(&problem, common, None, parse_time)
}

/// Reads rows of column indices. Input with a `p xc` line is read as a full
/// `.xc` document; otherwise the column count is inferred from the rows.
///
/// # Errors
///
/// If a token is not a column index, an index reaches [`MAX_COLUMNS`] or a
/// row repeats a column.
pub(crate) fn parse_text_rows(input: &str) -> Result<Problem, String> {
    if input.lines().any(|line| line.trim_start().starts_with('p')) {
        return parse_xc(Cursor::new(input)).map_err(|e| e.to_string());
    }

    let rows = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('c'))
        .enumerate()
        .map(|(ix, line)| {
            line.split_whitespace()
                .map(|token| {
                    token
                        .parse::<usize>()
                        .map_err(|_| format!("row {ix}: `{token}` is not a column index"))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let columns = match rows.iter().flatten().max() {
        None => 0,
        Some(&max) => max
            .checked_add(1)
            .filter(|&columns| columns <= MAX_COLUMNS)
            .ok_or_else(|| {
                format!("column {max} exceeds the limit of {MAX_COLUMNS} columns")
            })?,
    };
    let mut problem = Problem::new(columns);
    for (ix, row) in rows.into_iter().enumerate() {
        problem
            .add_row(row)
            .map_err(|e| format!("row {ix}: {e}"))?;
    }
    Ok(problem)
}

/// Reads the memory counters of the global allocator, in MiB.
///
/// # Errors
///
/// If jemalloc statistics are unavailable.
pub(crate) fn memory_usage() -> Result<(f64, f64), String> {
    epoch::advance().map_err(|e| e.to_string())?;

    let allocated_bytes = stats::allocated::mib()
        .and_then(|mib| mib.read())
        .map_err(|e| e.to_string())?;
    let resident_bytes = stats::resident::mib()
        .and_then(|mib| mib.read())
        .map_err(|e| e.to_string())?;

    Ok((
        allocated_bytes as f64 / (1024.0 * 1024.0),
        resident_bytes as f64 / (1024.0 * 1024.0),
    ))
}

/// Stack size of the search thread. The search recurses once per row of the
/// cover, so long covers need far more than the default main thread stack.
const SEARCH_STACK_SIZE: usize = 1 << 30;

/// Solves a problem with the configured column selection.
///
/// The search runs on its own thread with a [`SEARCH_STACK_SIZE`] stack.
/// Returns the solution in the problem's row numbering, the time spent
/// searching and the search statistics.
///
/// # Errors
///
/// If the search thread cannot be started.
pub(crate) fn solve(
    problem: &Problem,
    common: &CommonOptions,
    label: Option<&Path>,
) -> Result<(Option<Solution>, Duration, SearchStats), String> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    let (mut dlx, origins) = problem.to_solver(common.selection.to_impl());

    let handle = std::thread::Builder::new()
        .name("search".to_string())
        .stack_size(SEARCH_STACK_SIZE)
        .spawn(move || {
            let time = Instant::now();
            let found = dlx.search();
            (found, time.elapsed(), dlx)
        })
        .map_err(|e| format!("Unable to start the search thread: {e}"))?;
    let (found, elapsed, dlx) = handle
        .join()
        .map_err(|_| "The search thread panicked".to_string())?;

    let solution = found.then(|| dlx.solution().map_rows(|row| origins[row]));
    Ok((solution, elapsed, dlx.stats()))
}

/// Checks a solution against its problem and prints the verdict.
///
/// # Panics
///
/// If the solution is not an exact cover, which would be a solver bug.
pub(crate) fn verify_solution(problem: &Problem, solution: Option<&Solution>) {
    if let Some(solution) = solution {
        let ok = problem.verify(solution);
        println!("Verified: {ok:?}");
        assert!(ok, "Solution failed verification!");
    } else {
        println!("No exact cover");
    }
}

/// Solves a problem and reports the verdict, statistics and solution.
///
/// # Errors
///
/// If memory statistics cannot be read.
pub(crate) fn solve_and_report(
    problem: &Problem,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<(), String> {
    let (solution, elapsed, search_stats) = solve(problem, common, label)?;

    if common.verify {
        verify_solution(problem, solution.as_ref());
    }

    if common.stats {
        let (allocated, resident) = memory_usage()?;
        print_stats(
            parse_time,
            elapsed,
            problem,
            &search_stats,
            allocated,
            resident,
        );
    }

    if common.print_solution {
        if let Some(solution) = &solution {
            println!("Rows: {solution}");
        }
    }

    if solution.is_some() {
        println!("\nEXACT COVER FOUND");
    } else {
        println!("\nNO EXACT COVER");
    }
    Ok(())
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    problem: &Problem,
    s: &SearchStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();
    let ones: usize = problem.rows().iter().map(|row| row.len()).sum();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Columns", problem.columns());
    stat_line("Rows", problem.len());
    stat_line("Nodes", ones);

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Search nodes", s.nodes, elapsed_secs);
    stat_line_with_rate("Choices", s.choices, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line_with_rate("Updates", s.updates, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

/// Solves every puzzle of a Sudoku file.
///
/// # Errors
///
/// If the file doesn't exist, cannot be parsed or the export cannot be
/// written.
pub(crate) fn solve_sudoku(
    path: &Path,
    export_xc: bool,
    common: &CommonOptions,
) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Sudoku file does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }

    let time = Instant::now();
    let puzzles = parse_sudoku_file(path)
        .map_err(|e| format!("Error parsing Sudoku file {}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    let mut solved = 0;
    for (index, sudoku) in puzzles.iter().enumerate() {
        println!("Parsed Sudoku:\n{sudoku}");

        let (problem, placements) = sudoku.to_problem();

        if export_xc && index == 0 {
            let xc_path = format!("{}.xc", path.display());
            std::fs::write(&xc_path, problem.to_string())
                .map_err(|e| format!("Unable to write {xc_path}: {e}"))?;
            println!("Exact cover written to: {xc_path}");
        }

        let (solution, elapsed, search_stats) = solve(&problem, common, Some(path))?;

        if common.verify {
            verify_solution(&problem, solution.as_ref());
        }

        if common.stats {
            let (allocated, resident) = memory_usage()?;
            print_stats(
                parse_time,
                elapsed,
                &problem,
                &search_stats,
                allocated,
                resident,
            );
        }

        if let Some(solution) = solution {
            if common.print_solution {
                println!("Rows: {solution}");
            }
            let grid = sudoku.decode(&solution, &placements);
            if common.verify {
                assert!(
                    grid.is_solved() && sudoku.is_completed_by(&grid),
                    "Decoded grid is not a solution!"
                );
            }
            println!("Solution:\n{grid}");
            solved += 1;
        } else {
            println!("No solution found");
        }
    }

    println!("\nSolved {solved} of {} puzzles", puzzles.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_common_defaults() {
        let cli = Cli::try_parse_from(["dlx", "problem.xc"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("problem.xc")));
        assert!(cli.command.is_none());
        assert!(cli.common.verify);
        assert!(cli.common.stats);
        assert!(!cli.common.debug);
        assert_eq!(cli.common.selection, ColumnSelectionType::MinimumSize);
    }

    #[test]
    fn test_subcommand_options() {
        let cli = Cli::try_parse_from([
            "dlx",
            "sudoku",
            "--path",
            "p.sudoku",
            "--export-xc",
            "--selection",
            "first-active",
            "--stats",
            "false",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Sudoku {
                path,
                export_xc,
                common,
            }) => {
                assert_eq!(path, PathBuf::from("p.sudoku"));
                assert!(export_xc);
                assert_eq!(common.selection, ColumnSelectionType::FirstActive);
                assert!(!common.stats);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_text_rows_infers_columns() {
        let problem = parse_text_rows("0 1\n2 3\n\n0 1 2 3\n").unwrap();
        assert_eq!(problem.columns(), 4);
        assert_eq!(problem.len(), 3);
        assert_eq!(problem.solve().unwrap().sorted(), vec![0, 1]);
    }

    #[test]
    fn test_parse_text_rows_with_header() {
        let problem = parse_text_rows("p xc 5 1\n0 1\n").unwrap();
        assert_eq!(problem.columns(), 5);
        assert_eq!(problem.solve(), None);
    }

    #[test]
    fn test_parse_text_rows_errors() {
        assert!(parse_text_rows("0 x\n").is_err());
        assert!(parse_text_rows("0 0\n").is_err());
        assert_eq!(parse_text_rows("").unwrap().columns(), 0);
    }

    #[test]
    fn test_parse_text_rows_rejects_huge_index() {
        assert!(parse_text_rows("0\n18446744073709551615\n").is_err());
        assert!(parse_text_rows(&format!("{MAX_COLUMNS}\n")).is_err());
        let last = MAX_COLUMNS - 1;
        assert_eq!(
            parse_text_rows(&format!("{last}\n")).unwrap().columns(),
            MAX_COLUMNS
        );
    }

    #[test]
    fn test_solve_handles_long_covers() {
        // One row per column: the search recurses once per column.
        let columns = 200_000;
        let mut problem = Problem::new(columns);
        for column in 0..columns {
            problem.add_row([column]).unwrap();
        }
        let common = Cli::try_parse_from(["dlx", "--stats", "false"]).unwrap().common;
        let (solution, _, stats) = solve(&problem, &common, None).unwrap();
        assert_eq!(solution.unwrap().len(), columns);
        assert_eq!(stats.max_depth, columns);
    }

    #[test]
    fn test_solve_maps_rows_back() {
        let problem = parse_text_rows("0 1 2 3\n0 1\n2 3\n").unwrap();
        let common = Cli::try_parse_from(["dlx"]).unwrap().common;
        let (solution, _, stats) = solve(&problem, &common, None).unwrap();
        let solution = solution.unwrap();
        assert!(problem.verify(&solution));
        assert_eq!(stats.max_depth, solution.len());
    }

    #[test]
    fn test_solve_sudoku_file() {
        let dir = std::env::temp_dir().join(format!("dlx-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("four.sudoku");
        std::fs::write(&path, "1..4..1..1..4..1\n").unwrap();

        let common = Cli::try_parse_from(["dlx", "--stats", "false"]).unwrap().common;
        solve_sudoku(&path, true, &common).unwrap();

        let exported = parse_file(path.with_extension("sudoku.xc")).unwrap();
        assert_eq!(exported.columns(), 64);
        assert!(exported.solve().is_some());

        assert!(solve_dir(&dir, &common).is_ok());
        assert!(solve_sudoku(&dir.join("missing.sudoku"), false, &common).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
