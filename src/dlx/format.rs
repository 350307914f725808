#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A plain-text format for exact cover problems, modelled on DIMACS.
//!
//! ```text
//! c the example from Knuth's paper
//! p xc 7 6
//! 2 4 5
//! 0 3 6
//! 1 2 5
//! 0 3
//! 1 6
//! 3 4 6
//! %
//! ```
//!
//! - Lines starting with `c` are comments; blank lines are ignored.
//! - The problem line `p xc <columns> <rows>` is required, must come before
//!   the first row and may appear only once.
//! - Every other line is one row: whitespace separated, 0-based column
//!   indices, each distinct.
//! - A line starting with `%` ends the data; anything after it is ignored.
//!
//! The row count of the problem line must match the number of rows read.
//! Line numbers in errors are 1-based.

use crate::dlx::problem::{Problem, ProblemError, MAX_COLUMNS};
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const MAX_RESERVED_ROWS: usize = 1 << 16;

/// Why an `.xc` input could not be read.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Reading the input failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    /// A row, or the end of input, came before the problem line.
    #[error("missing `p xc <columns> <rows>` line")]
    MissingHeader,
    /// A second problem line.
    #[error("line {line}: duplicate problem line")]
    DuplicateHeader {
        /// The line of the second problem line.
        line: usize,
    },
    /// A problem line that is not `p xc <columns> <rows>`.
    #[error("line {line}: malformed problem line, expected `p xc <columns> <rows>`")]
    InvalidHeader {
        /// The offending line.
        line: usize,
    },
    /// The problem line asks for more than [`MAX_COLUMNS`] columns.
    #[error("line {line}: {columns} columns exceeds the limit of {max}", max = MAX_COLUMNS)]
    TooManyColumns {
        /// The offending line.
        line: usize,
        /// The column count from the problem line.
        columns: usize,
    },
    /// A row token that is not a column index.
    #[error("line {line}: `{token}` is not a column index")]
    InvalidIndex {
        /// The offending line.
        line: usize,
        /// The token that failed to parse.
        token: String,
    },
    /// The problem line announced a different number of rows.
    #[error("expected {expected} rows but read {found}")]
    RowCountMismatch {
        /// The count from the problem line.
        expected: usize,
        /// The number of rows read.
        found: usize,
    },
    /// A row was rejected by [`Problem::add_row`].
    #[error("line {line}: {source}")]
    Problem {
        /// The offending line.
        line: usize,
        /// What was wrong with the row.
        source: ProblemError,
    },
}

/// Parses `.xc` data from any buffered reader.
///
/// # Errors
///
/// Returns the first [`FormatError`] met; see the module documentation for
/// the accepted syntax.
pub fn parse_xc<R: BufRead>(reader: R) -> Result<Problem, FormatError> {
    let mut problem: Option<Problem> = None;
    let mut expected_rows = 0;

    for (ix, line) in reader.lines().enumerate() {
        let line_no = ix + 1;
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            None => {}
            Some(first) if first.starts_with('%') => break,
            Some(first) if first.starts_with('c') => {}
            Some(&"p") => {
                if problem.is_some() {
                    return Err(FormatError::DuplicateHeader { line: line_no });
                }
                let (columns, rows) = parse_header(parts, line_no)?;
                expected_rows = rows;
                // The count is untrusted until the rows have been read.
                problem = Some(Problem::with_capacity(columns, rows.min(MAX_RESERVED_ROWS)));
            }
            Some(_) => {
                let problem = problem.as_mut().ok_or(FormatError::MissingHeader)?;
                let row = parts
                    .map(|token| {
                        token.parse::<usize>().map_err(|_| FormatError::InvalidIndex {
                            line: line_no,
                            token: token.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                problem
                    .add_row(row)
                    .map_err(|source| FormatError::Problem {
                        line: line_no,
                        source,
                    })?;
            }
        }
    }

    let problem = problem.ok_or(FormatError::MissingHeader)?;
    if problem.len() != expected_rows {
        return Err(FormatError::RowCountMismatch {
            expected: expected_rows,
            found: problem.len(),
        });
    }

    debug!(
        columns = problem.columns(),
        rows = problem.len(),
        "parsed exact cover problem"
    );
    Ok(problem)
}

fn parse_header<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<(usize, usize), FormatError> {
    let invalid = || FormatError::InvalidHeader { line };

    if parts.next() != Some("p") || parts.next() != Some("xc") {
        return Err(invalid());
    }
    let columns = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    let rows = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    if columns > MAX_COLUMNS {
        return Err(FormatError::TooManyColumns { line, columns });
    }
    Ok((columns, rows))
}

/// Parses an `.xc` file.
///
/// # Errors
///
/// Returns [`FormatError::Io`] if the file cannot be opened or read, and any
/// other [`FormatError`] from [`parse_xc`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Problem, FormatError> {
    let file = std::fs::File::open(path)?;
    parse_xc(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const KNUTH: &str = "c the example from Knuth's paper\n\
                         p xc 7 6\n\
                         2 4 5\n\
                         0 3 6\n\
                         1 2 5\n\
                         0 3\n\
                         1 6\n\
                         3 4 6\n\
                         %\n\
                         this is ignored\n";

    #[test]
    fn test_parse_knuth_example() {
        let problem = parse_xc(Cursor::new(KNUTH)).unwrap();
        assert_eq!(problem.columns(), 7);
        assert_eq!(problem.len(), 6);
        assert_eq!(problem.rows()[5].as_slice(), &[3, 4, 6]);
        assert_eq!(problem.solve().unwrap().sorted(), vec![0, 3, 4]);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_comments() {
        let input = "\n  \np xc 2 2\nc between rows\n\n0\n1\n\n";
        let problem = parse_xc(Cursor::new(input)).unwrap();
        assert_eq!(problem.len(), 2);
    }

    #[test]
    fn test_display_reads_back() {
        let problem = parse_xc(Cursor::new(KNUTH)).unwrap();
        let again = parse_xc(Cursor::new(problem.to_string())).unwrap();
        assert_eq!(problem, again);
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            parse_xc(Cursor::new("0 1\n")),
            Err(FormatError::MissingHeader)
        ));
        assert!(matches!(
            parse_xc(Cursor::new("c only a comment\n")),
            Err(FormatError::MissingHeader)
        ));
    }

    #[test]
    fn test_header_errors_carry_line_numbers() {
        assert!(matches!(
            parse_xc(Cursor::new("c\np cnf 3 2\n")),
            Err(FormatError::InvalidHeader { line: 2 })
        ));
        assert!(matches!(
            parse_xc(Cursor::new("p xc 3\n")),
            Err(FormatError::InvalidHeader { line: 1 })
        ));
        assert!(matches!(
            parse_xc(Cursor::new("p xc 3 1 9\n")),
            Err(FormatError::InvalidHeader { line: 1 })
        ));
        assert!(matches!(
            parse_xc(Cursor::new("p xc 1 1\n0\np xc 1 1\n")),
            Err(FormatError::DuplicateHeader { line: 3 })
        ));
    }

    #[test]
    fn test_row_errors_carry_line_numbers() {
        match parse_xc(Cursor::new("p xc 3 1\n0 x\n")) {
            Err(FormatError::InvalidIndex { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            parse_xc(Cursor::new("p xc 3 1\n0 -1\n")),
            Err(FormatError::InvalidIndex { line: 2, .. })
        ));
        assert!(matches!(
            parse_xc(Cursor::new("p xc 3 2\n0\n\n1 3\n")),
            Err(FormatError::Problem {
                line: 4,
                source: ProblemError::ColumnOutOfRange { column: 3, .. }
            })
        ));
        assert!(matches!(
            parse_xc(Cursor::new("p xc 3 1\n2 2\n")),
            Err(FormatError::Problem {
                line: 2,
                source: ProblemError::DuplicateColumn { column: 2 }
            })
        ));
    }

    #[test]
    fn test_rejects_huge_column_count() {
        assert!(matches!(
            parse_xc(Cursor::new("p xc 18446744073709551615 0\n")),
            Err(FormatError::TooManyColumns {
                line: 1,
                columns: usize::MAX
            })
        ));
        let over = format!("c\np xc {} 0\n", MAX_COLUMNS + 1);
        assert!(matches!(
            parse_xc(Cursor::new(over)),
            Err(FormatError::TooManyColumns { line: 2, .. })
        ));
        let at_limit = format!("p xc {MAX_COLUMNS} 0\n");
        assert_eq!(
            parse_xc(Cursor::new(at_limit)).unwrap().columns(),
            MAX_COLUMNS
        );
    }

    #[test]
    fn test_row_count_mismatch() {
        assert!(matches!(
            parse_xc(Cursor::new("p xc 2 3\n0\n1\n")),
            Err(FormatError::RowCountMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_parse_missing_file() {
        assert!(matches!(
            parse_file("/definitely/not/here.xc"),
            Err(FormatError::Io(_))
        ));
    }
}
