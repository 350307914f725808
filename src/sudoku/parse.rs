#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading Sudoku puzzles from text.
//!
//! A file holds one or more puzzles, in any mix of two layouts:
//!
//! - One line per puzzle: 16 or 81 characters without whitespace, read row
//!   by row, `0` or `.` for an empty cell.
//! - One line per grid row. A row with whitespace is split into tokens
//!   (numbers, or `0`, `.` or `_` for an empty cell); a row without whitespace
//!   is read one character per cell. The width of the first row fixes the
//!   size and the grid ends once it has that many rows.
//!
//! Lines starting with `#` are comments and blank lines separate puzzles.
//!
//! ```text
//! # two 4x4 puzzles
//! 1..4..1..1..4..1
//!
//! 1 0 | 0 4
//! 0 0 | 1 0
//! 0 1 | 0 0
//! 4 0 | 0 1
//! ```
//!
//! A `|` token and rule lines made only of `-` and `+` are ignored, so grids
//! printed by this crate can be read back.

use crate::sudoku::solver::{Board, Size, Sudoku, SudokuError};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Why puzzle text could not be read. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the file failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    /// A cell that is neither a number nor an empty marker.
    #[error("line {line}: `{token}` is not a cell value")]
    InvalidCell {
        /// The offending line.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// The first row of a grid has an unsupported width.
    #[error("line {line}: unsupported sudoku size {size}, expected 4, 9, 16 or 25")]
    UnsupportedSize {
        /// The offending line.
        line: usize,
        /// The width found.
        size: usize,
    },
    /// A row of a different width than the first row of its grid.
    #[error("line {line}: row has {found} cells, expected {expected}")]
    RaggedRow {
        /// The offending line.
        line: usize,
        /// The width of the grid.
        expected: usize,
        /// The width of the row.
        found: usize,
    },
    /// A grid ended before it had as many rows as columns.
    #[error("line {line}: puzzle ended after {rows} of {size} rows")]
    Incomplete {
        /// The line where the grid ended.
        line: usize,
        /// The rows read.
        rows: usize,
        /// The rows expected.
        size: usize,
    },
    /// A complete grid that is not a valid puzzle.
    #[error(transparent)]
    Invalid(#[from] SudokuError),
    /// The input held no puzzle.
    #[error("no puzzle found")]
    Empty,
}

/// A grid whose rows are still being read.
struct Pending {
    size: usize,
    rows: Vec<Vec<usize>>,
}

/// Parses every puzzle in `input`.
///
/// # Errors
///
/// Returns the first [`ParseError`] met, or [`ParseError::Empty`] if the
/// input holds no puzzle.
pub fn parse_sudokus(input: &str) -> Result<Vec<Sudoku>, ParseError> {
    let mut puzzles = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut last_line = 0;

    for (ix, raw) in input.lines().enumerate() {
        let line = ix + 1;
        last_line = line;
        let text = raw.trim();

        if text.starts_with('#') || is_rule(text) {
            continue;
        }
        if text.is_empty() {
            if let Some(grid) = pending.take() {
                return Err(ParseError::Incomplete {
                    line,
                    rows: grid.rows.len(),
                    size: grid.size,
                });
            }
            continue;
        }

        if pending.is_none() && is_one_line_puzzle(text) {
            puzzles.push(parse_one_line(text, line)?);
            continue;
        }

        let cells = parse_row(text, line)?;
        let grid = match pending.as_mut() {
            Some(grid) => grid,
            None => {
                let size = cells.len();
                if Size::try_from(size).is_err() {
                    return Err(ParseError::UnsupportedSize { line, size });
                }
                pending.insert(Pending {
                    size,
                    rows: Vec::with_capacity(size),
                })
            }
        };
        if cells.len() != grid.size {
            return Err(ParseError::RaggedRow {
                line,
                expected: grid.size,
                found: cells.len(),
            });
        }
        grid.rows.push(cells);

        if grid.rows.len() == grid.size {
            if let Some(grid) = pending.take() {
                puzzles.push(Sudoku::new(Board::new(grid.rows))?);
            }
        }
    }

    if let Some(grid) = pending {
        return Err(ParseError::Incomplete {
            line: last_line,
            rows: grid.rows.len(),
            size: grid.size,
        });
    }
    if puzzles.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(puzzles)
}

/// Reads and parses a puzzle file.
///
/// # Errors
///
/// Returns [`ParseError::Io`] if the file cannot be read and any other
/// [`ParseError`] from [`parse_sudokus`].
pub fn parse_sudoku_file<P: AsRef<Path>>(path: P) -> Result<Vec<Sudoku>, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let puzzles = parse_sudokus(&text)?;
    debug!(path = %path.display(), puzzles = puzzles.len(), "parsed sudoku file");
    Ok(puzzles)
}

fn is_rule(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| matches!(c, '-' | '+' | ' '))
}

fn is_one_line_puzzle(text: &str) -> bool {
    !text.contains(char::is_whitespace) && matches!(text.chars().count(), 16 | 81)
}

fn parse_one_line(text: &str, line: usize) -> Result<Sudoku, ParseError> {
    let cells = text
        .chars()
        .map(|c| parse_char(c, line))
        .collect::<Result<Vec<_>, _>>()?;
    let size = if cells.len() == 16 { 4 } else { 9 };
    let rows = cells.chunks(size).map(<[usize]>::to_vec).collect();
    Ok(Sudoku::new(Board::new(rows))?)
}

fn parse_row(text: &str, line: usize) -> Result<Vec<usize>, ParseError> {
    if text.contains(char::is_whitespace) {
        text.split_whitespace()
            .filter(|&token| token != "|")
            .map(|token| parse_token(token, line))
            .collect()
    } else {
        text.chars()
            .filter(|&c| c != '|')
            .map(|c| parse_char(c, line))
            .collect()
    }
}

fn parse_token(token: &str, line: usize) -> Result<usize, ParseError> {
    match token {
        "." | "_" => Ok(0),
        _ => token.parse().map_err(|_| ParseError::InvalidCell {
            line,
            token: token.to_string(),
        }),
    }
}

fn parse_char(c: char, line: usize) -> Result<usize, ParseError> {
    match c {
        '.' | '_' => Ok(0),
        _ => c
            .to_digit(10)
            .map(|d| d as usize)
            .ok_or_else(|| ParseError::InvalidCell {
                line,
                token: c.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::solver::{EXAMPLE_FOUR, EXAMPLE_NINE, EXAMPLE_SIXTEEN};

    fn example<const N: usize>(grid: [[usize; N]; N]) -> Sudoku {
        Sudoku::new(Board::from(grid)).unwrap()
    }

    #[test]
    fn test_parse_tokenised_grid() {
        let input = "5 3 0 0 7 0 0 0 0\n\
                     6 0 0 1 9 5 0 0 0\n\
                     0 9 8 0 0 0 0 6 0\n\
                     8 0 0 0 6 0 0 0 3\n\
                     4 0 0 8 0 3 0 0 1\n\
                     7 0 0 0 2 0 0 0 6\n\
                     0 6 0 0 0 0 2 8 0\n\
                     0 0 0 4 1 9 0 0 5\n\
                     0 0 0 0 8 0 0 7 9\n";
        assert_eq!(parse_sudokus(input).unwrap(), vec![example(EXAMPLE_NINE)]);
    }

    #[test]
    fn test_parse_character_grid_and_one_liners() {
        let input = "# a 9x9 on one line\n\
                     53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79\n\
                     \n\
                     1..4\n\
                     ..1.\n\
                     .1..\n\
                     4..1\n\
                     1__4__1__1__4__1\n";
        let puzzles = parse_sudokus(input).unwrap();
        assert_eq!(
            puzzles,
            vec![
                example(EXAMPLE_NINE),
                example(EXAMPLE_FOUR),
                example(EXAMPLE_FOUR)
            ]
        );
    }

    #[test]
    fn test_display_reads_back() {
        for puzzle in [example(EXAMPLE_FOUR), example(EXAMPLE_NINE)] {
            assert_eq!(parse_sudokus(&puzzle.to_string()).unwrap(), vec![puzzle]);
        }
        let sixteen = example(EXAMPLE_SIXTEEN);
        assert_eq!(
            parse_sudokus(&sixteen.to_string()).unwrap(),
            vec![sixteen]
        );
    }

    #[test]
    fn test_invalid_cell() {
        match parse_sudokus("1 2 x 4\n") {
            Err(ParseError::InvalidCell { line, token }) => {
                assert_eq!(line, 1);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            parse_sudokus("# c\n12a4\n"),
            Err(ParseError::InvalidCell { line: 2, .. })
        ));
    }

    #[test]
    fn test_unsupported_and_ragged() {
        assert!(matches!(
            parse_sudokus("1 2 3\n"),
            Err(ParseError::UnsupportedSize { line: 1, size: 3 })
        ));
        assert!(matches!(
            parse_sudokus("1 2 3 4\n1 2 3\n"),
            Err(ParseError::RaggedRow {
                line: 2,
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn test_incomplete_grid() {
        assert!(matches!(
            parse_sudokus("1..4\n..1.\n\n.1..\n"),
            Err(ParseError::Incomplete {
                line: 3,
                rows: 2,
                size: 4
            })
        ));
        assert!(matches!(
            parse_sudokus("1..4\n..1.\n"),
            Err(ParseError::Incomplete {
                line: 2,
                rows: 2,
                size: 4
            })
        ));
    }

    #[test]
    fn test_out_of_range_value_is_invalid() {
        assert!(matches!(
            parse_sudokus("1 0 0 5\n0 0 0 0\n0 0 0 0\n0 0 0 0\n"),
            Err(ParseError::Invalid(SudokuError::ValueOutOfRange { value: 5, .. }))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_sudokus(""), Err(ParseError::Empty)));
        assert!(matches!(
            parse_sudokus("# nothing\n\n"),
            Err(ParseError::Empty)
        ));
    }
}
