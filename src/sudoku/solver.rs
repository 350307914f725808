#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku as an exact cover problem.
//!
//! An `n`×`n` Sudoku with `k`×`k` boxes (`n = k²`) has `4n²` constraints, each
//! of which must be met exactly once:
//!
//! | family       | column index          | meaning                        |
//! |--------------|-----------------------|--------------------------------|
//! | cell         | `r*n + c`             | cell (r, c) holds some value   |
//! | row-value    | `n² + r*n + (v-1)`    | row r holds v                  |
//! | column-value | `2n² + c*n + (v-1)`   | column c holds v               |
//! | box-value    | `3n² + b*n + (v-1)`   | box b holds v                  |
//!
//! Every candidate [`Placement`] "cell (r, c) holds v" is one row touching one
//! column of each family. A given cell contributes only the row for its value;
//! an empty cell contributes one row per value. An exact cover then picks one
//! placement per cell with no value repeated in a row, column or box.

use crate::dlx::problem::{Problem, Row};
use crate::dlx::selection::{ColumnSelection, MinimumSize};
use crate::dlx::solution::Solution;
use itertools::Itertools;
use std::fmt::Display;
use thiserror::Error;
use tracing::trace;

/// Why a grid is not a Sudoku this crate can solve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SudokuError {
    /// The grid is not 4, 9, 16 or 25 rows tall.
    #[error("unsupported sudoku size {size}, expected 4, 9, 16 or 25")]
    UnsupportedSize {
        /// The number of rows found.
        size: usize,
    },
    /// A row is not as wide as the grid is tall.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// The 0-based row.
        row: usize,
        /// The grid size.
        expected: usize,
        /// The number of cells in the row.
        found: usize,
    },
    /// A given exceeds the grid size.
    #[error("cell ({row}, {col}) holds {value}, expected 0..={max}")]
    ValueOutOfRange {
        /// The 0-based row.
        row: usize,
        /// The 0-based column.
        col: usize,
        /// The offending value.
        value: usize,
        /// The largest allowed value.
        max: usize,
    },
}

/// The supported grid sizes.
#[derive(Debug, Clone, PartialEq, Eq, Copy, PartialOrd, Ord, Hash)]
pub enum Size {
    /// 4×4 with 2×2 boxes.
    Four = 4,
    /// 9×9 with 3×3 boxes.
    Nine = 9,
    /// 16×16 with 4×4 boxes.
    Sixteen = 16,
    /// 25×25 with 5×5 boxes.
    TwentyFive = 25,
}

impl Size {
    /// The side length of a box.
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Self::Four => 2,
            Self::Nine => 3,
            Self::Sixteen => 4,
            Self::TwentyFive => 5,
        }
    }

    /// The number of exact cover columns, `4n²`.
    #[must_use]
    pub const fn columns(self) -> usize {
        let n = self as usize;
        4 * n * n
    }
}

impl TryFrom<usize> for Size {
    type Error = SudokuError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            9 => Ok(Self::Nine),
            16 => Ok(Self::Sixteen),
            25 => Ok(Self::TwentyFive),
            size => Err(SudokuError::UnsupportedSize { size }),
        }
    }
}

impl From<Size> for usize {
    fn from(size: Size) -> Self {
        size as Self
    }
}

/// A square grid of values, `0` marking an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board(Vec<Vec<usize>>);

impl Board {
    /// Wraps rows of cells. The shape is checked by [`Sudoku::new`].
    #[must_use]
    pub const fn new(board: Vec<Vec<usize>>) -> Self {
        Self(board)
    }

    /// The rows of the grid.
    #[must_use]
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.0
    }
}

impl From<Vec<Vec<usize>>> for Board {
    fn from(board: Vec<Vec<usize>>) -> Self {
        Self::new(board)
    }
}

impl<const N: usize> From<[[usize; N]; N]> for Board {
    fn from(board: [[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

impl<const N: usize> From<&[[usize; N]; N]> for Board {
    fn from(board: &[[usize; N]; N]) -> Self {
        Self::new(board.iter().map(|r| r.to_vec()).collect())
    }
}

impl From<Board> for Vec<Vec<usize>> {
    fn from(board: Board) -> Self {
        board.0
    }
}

impl From<&Board> for Vec<Vec<usize>> {
    fn from(board: &Board) -> Self {
        board.0.clone()
    }
}

/// The fact "cell (`row`, `col`) holds `num`", with 0-based coordinates and a
/// 1-based value. One exact cover row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// The 0-based row.
    pub row: usize,
    /// The 0-based column.
    pub col: usize,
    /// The value, `1..=n`.
    pub num: usize,
}

impl Placement {
    /// Creates a placement.
    #[must_use]
    pub const fn new(row: usize, col: usize, num: usize) -> Self {
        Self { row, col, num }
    }

    /// The four exact cover columns this placement covers: cell, row-value,
    /// column-value and box-value, in that order.
    #[must_use]
    pub const fn columns(&self, size: Size) -> [usize; 4] {
        let n = size as usize;
        let k = size.block_size();
        let value = self.num - 1;
        let block = (self.row / k) * k + self.col / k;

        [
            self.row * n + self.col,
            n * n + self.row * n + value,
            2 * n * n + self.col * n + value,
            3 * n * n + block * n + value,
        ]
    }
}

/// A Sudoku puzzle or solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    board: Board,
    size: Size,
}

impl Sudoku {
    /// Checks the shape and values of `board`.
    ///
    /// Givens that contradict each other are accepted here; such a puzzle
    /// simply has no solution.
    ///
    /// # Errors
    ///
    /// Returns a [`SudokuError`] if the grid is not square, has an unsupported
    /// size or holds a value above its size.
    pub fn new(board: Board) -> Result<Self, SudokuError> {
        let size = Size::try_from(board.0.len())?;
        let n = usize::from(size);

        for (row, cells) in board.0.iter().enumerate() {
            if cells.len() != n {
                return Err(SudokuError::RaggedRow {
                    row,
                    expected: n,
                    found: cells.len(),
                });
            }
            if let Some((col, &value)) = cells.iter().find_position(|&&v| v > n) {
                return Err(SudokuError::ValueOutOfRange {
                    row,
                    col,
                    value,
                    max: n,
                });
            }
        }
        Ok(Self { board, size })
    }

    /// The grid size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// The grid.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The value of a cell, `0` if empty.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> usize {
        self.board.0[row][col]
    }

    /// Iterates over the rows of the grid.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.board.0.iter().map(Vec::as_slice)
    }

    /// The number of filled cells.
    #[must_use]
    pub fn givens(&self) -> usize {
        self.board.0.iter().flatten().filter(|&&v| v != 0).count()
    }

    /// Encodes the puzzle as an exact cover problem. The `i`-th problem row is
    /// the `i`-th placement returned alongside it.
    #[must_use]
    pub fn to_problem(&self) -> (Problem, Vec<Placement>) {
        let n = usize::from(self.size);
        let mut problem = Problem::with_capacity(self.size.columns(), n * n * n);
        let mut placements = Vec::with_capacity(n * n * n);

        for (row, col) in (0..n).cartesian_product(0..n) {
            let values = match self.get(row, col) {
                0 => 1..=n,
                given => given..=given,
            };
            for num in values {
                let placement = Placement::new(row, col, num);
                problem.push_trusted(Row::from_slice(&placement.columns(self.size)));
                placements.push(placement);
            }
        }
        (problem, placements)
    }

    /// Writes the placements chosen by `solution` onto an empty grid.
    #[must_use]
    pub fn decode(&self, solution: &Solution, placements: &[Placement]) -> Self {
        let n = usize::from(self.size);
        let mut board = vec![vec![0; n]; n];
        for row in solution.iter() {
            let Placement { row, col, num } = placements[row];
            board[row][col] = num;
        }
        Self {
            board: Board::new(board),
            size: self.size,
        }
    }

    /// Solves the puzzle with the minimum-size heuristic.
    #[must_use]
    pub fn solve(&self) -> Option<Self> {
        self.solve_with(MinimumSize)
    }

    /// Solves the puzzle with the given column selector.
    #[must_use]
    pub fn solve_with<S: ColumnSelection>(&self, selector: S) -> Option<Self> {
        let (problem, placements) = self.to_problem();
        let solution = problem.solve_with(selector);
        trace!(
            size = usize::from(self.size),
            givens = self.givens(),
            solved = solution.is_some(),
            "solved sudoku"
        );
        solution.map(|solution| self.decode(&solution, &placements))
    }

    /// Returns `true` if every cell is filled and no value repeats in a row,
    /// a column or a box.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let n = usize::from(self.size);
        let k = self.size.block_size();
        let cell = |r: usize, c: usize| self.board.0[r][c];

        let full = self.board.0.iter().flatten().all(|&v| (1..=n).contains(&v));
        let rows = (0..n).all(|r| (0..n).map(|c| cell(r, c)).all_unique());
        let cols = (0..n).all(|c| (0..n).map(|r| cell(r, c)).all_unique());
        let boxes = (0..n).all(|b| {
            let (top, left) = ((b / k) * k, (b % k) * k);
            (0..n)
                .map(|i| cell(top + i / k, left + i % k))
                .all_unique()
        });
        full && rows && cols && boxes
    }

    /// Returns `true` if `other` keeps every given of this puzzle.
    #[must_use]
    pub fn is_completed_by(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .board
                .0
                .iter()
                .flatten()
                .zip(other.board.0.iter().flatten())
                .all(|(&given, &value)| given == 0 || given == value)
    }
}

impl TryFrom<Board> for Sudoku {
    type Error = SudokuError;

    fn try_from(board: Board) -> Result<Self, Self::Error> {
        Self::new(board)
    }
}

impl From<Sudoku> for Board {
    fn from(sudoku: Sudoku) -> Self {
        sudoku.board
    }
}

impl Display for Sudoku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = usize::from(self.size);
        let k = self.size.block_size();
        let width = n.to_string().len();

        let rule = (0..k)
            .map(|_| "-".repeat(k * width + k - 1))
            .join("-+-");

        for (r, row) in self.board.0.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
                if r % k == 0 {
                    writeln!(f, "{rule}")?;
                }
            }
            let line = row
                .chunks(k)
                .map(|block| {
                    block
                        .iter()
                        .map(|&v| {
                            if v == 0 {
                                format!("{:>width$}", ".")
                            } else {
                                format!("{v:>width$}")
                            }
                        })
                        .join(" ")
                })
                .join(" | ");
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// A 4×4 puzzle.
pub const EXAMPLE_FOUR: [[usize; 4]; 4] = [[1, 0, 0, 4], [0, 0, 1, 0], [0, 1, 0, 0], [4, 0, 0, 1]];

/// A 9×9 puzzle with a unique solution, [`EXAMPLE_NINE_SOLUTION`].
pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// The solution of [`EXAMPLE_NINE`].
pub const EXAMPLE_NINE_SOLUTION: [[usize; 9]; 9] = [
    [5, 3, 4, 6, 7, 8, 9, 1, 2],
    [6, 7, 2, 1, 9, 5, 3, 4, 8],
    [1, 9, 8, 3, 4, 2, 5, 6, 7],
    [8, 5, 9, 7, 6, 1, 4, 2, 3],
    [4, 2, 6, 8, 5, 3, 7, 9, 1],
    [7, 1, 3, 9, 2, 4, 8, 5, 6],
    [9, 6, 1, 5, 3, 7, 2, 8, 4],
    [2, 8, 7, 4, 1, 9, 6, 3, 5],
    [3, 4, 5, 2, 8, 6, 1, 7, 9],
];

/// A 16×16 puzzle.
pub const EXAMPLE_SIXTEEN: [[usize; 16]; 16] = [
    [0, 11, 0, 0, 0, 2, 3, 14, 0, 0, 9, 12, 0, 0, 0, 16],
    [15, 12, 0, 0, 0, 11, 0, 1, 13, 10, 0, 0, 0, 0, 7, 2],
    [0, 0, 10, 0, 0, 0, 0, 0, 16, 11, 0, 1, 6, 4, 12, 3],
    [0, 16, 14, 1, 0, 4, 0, 6, 0, 3, 0, 15, 0, 8, 0, 0],
    [1, 6, 5, 12, 0, 0, 11, 0, 0, 9, 8, 0, 0, 0, 0, 0],
    [0, 0, 0, 7, 14, 1, 8, 0, 0, 15, 6, 0, 13, 5, 0, 4],
    [4, 15, 8, 0, 9, 13, 0, 0, 0, 0, 7, 16, 3, 0, 0, 0],
    [0, 9, 13, 0, 0, 0, 0, 15, 10, 0, 0, 0, 7, 6, 0, 11],
    [14, 0, 6, 11, 0, 0, 0, 12, 7, 0, 0, 0, 0, 3, 13, 0],
    [0, 0, 0, 5, 8, 14, 0, 0, 0, 0, 13, 11, 0, 1, 2, 6],
    [13, 0, 16, 4, 0, 15, 5, 0, 0, 1, 12, 6, 8, 0, 0, 0],
    [0, 0, 0, 0, 0, 16, 10, 0, 0, 8, 0, 0, 11, 9, 4, 5],
    [0, 0, 11, 0, 1, 0, 14, 0, 5, 0, 3, 0, 15, 7, 16, 0],
    [5, 13, 15, 3, 16, 0, 4, 7, 0, 0, 0, 0, 0, 2, 0, 0],
    [16, 1, 0, 0, 0, 0, 12, 2, 14, 0, 15, 0, 0, 0, 3, 8],
    [9, 0, 0, 0, 13, 5, 0, 0, 8, 6, 16, 0, 0, 0, 10, 0],
];
