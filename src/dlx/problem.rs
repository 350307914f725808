#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! An owned, validated exact cover instance.
//!
//! [`Matrix::add_row`] trusts its input. A [`Problem`] is the checked way in:
//! it rejects rows that name unknown columns or repeat a column, keeps the
//! rows in their original numbering (empty rows included) and translates the
//! engine's answer back into that numbering.

use crate::dlx::matrix::Matrix;
use crate::dlx::search::Dlx;
use crate::dlx::selection::{ColumnSelection, MinimumSize};
use crate::dlx::solution::Solution;
use bit_vec::BitVec;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt::Display;
use thiserror::Error;

/// The largest column count the parsers accept. The matrix allocates a header
/// node per column up front, so larger counts from untrusted input are
/// rejected before anything is built.
pub const MAX_COLUMNS: usize = 1 << 24;

/// The columns of one row. Most rows of real instances are short.
pub type Row = SmallVec<[usize; 8]>;

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// The row names a column the problem does not have.
    #[error("column {column} is out of range for a problem with {columns} columns")]
    ColumnOutOfRange {
        /// The offending column index.
        column: usize,
        /// The number of columns of the problem.
        columns: usize,
    },
    /// The row names the same column twice.
    #[error("column {column} appears more than once in the row")]
    DuplicateColumn {
        /// The repeated column index.
        column: usize,
    },
}

/// An exact cover problem: a number of columns and a list of rows, each row
/// being a set of column indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Problem {
    columns: usize,
    rows: Vec<Row>,
}

impl Problem {
    /// Creates a problem with `columns` columns and no rows.
    #[must_use]
    pub const fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a problem with room for `rows` rows.
    #[must_use]
    pub fn with_capacity(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows: Vec::with_capacity(rows),
        }
    }

    /// The number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// The rows, in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The number of rows, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the problem has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validates and appends a row, returning its index.
    ///
    /// An empty row is accepted and numbered like any other, but it can never
    /// be part of a cover.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::ColumnOutOfRange`] or
    /// [`ProblemError::DuplicateColumn`] for the first bad index; the problem
    /// is left unchanged.
    pub fn add_row<I: IntoIterator<Item = usize>>(&mut self, row: I) -> Result<usize, ProblemError> {
        let row: Row = row.into_iter().collect();
        let mut seen = FxHashSet::default();

        for &column in &row {
            if column >= self.columns {
                return Err(ProblemError::ColumnOutOfRange {
                    column,
                    columns: self.columns,
                });
            }
            if !seen.insert(column) {
                return Err(ProblemError::DuplicateColumn { column });
            }
        }

        self.rows.push(row);
        Ok(self.rows.len() - 1)
    }

    /// Appends a row built by code that guarantees its columns are in range
    /// and distinct.
    pub(crate) fn push_trusted(&mut self, row: Row) {
        debug_assert!(row.iter().all(|&c| c < self.columns));
        debug_assert!(row.iter().all_unique());
        self.rows.push(row);
    }

    /// Builds the dancing-links matrix together with the problem row index
    /// of every matrix row. Empty rows are left out of the matrix.
    #[must_use]
    pub fn to_matrix(&self) -> (Matrix, Vec<usize>) {
        let mut matrix = Matrix::new(self.columns);
        let mut origins = Vec::with_capacity(self.rows.len());

        for (index, row) in self.rows.iter().enumerate() {
            if matrix.add_row(row).is_some() {
                origins.push(index);
            }
        }
        (matrix, origins)
    }

    /// Builds a solver using `selector`, together with the row mapping of
    /// [`Self::to_matrix`].
    #[must_use]
    pub fn to_solver<S: ColumnSelection>(&self, selector: S) -> (Dlx<S>, Vec<usize>) {
        let (matrix, origins) = self.to_matrix();
        (Dlx::with_selector(matrix, selector), origins)
    }

    /// Solves the problem with the minimum-size heuristic. Row identities in
    /// the returned solution are indices into [`Self::rows`].
    #[must_use]
    pub fn solve(&self) -> Option<Solution> {
        self.solve_with(MinimumSize)
    }

    /// Solves the problem with the given selector.
    #[must_use]
    pub fn solve_with<S: ColumnSelection>(&self, selector: S) -> Option<Solution> {
        let (solver, origins) = self.to_solver(selector);
        solver
            .solve()
            .map(|solution| solution.map_rows(|row| origins[row]))
    }

    /// Checks that `solution`, numbered like [`Self::rows`], is an exact
    /// cover of this problem.
    #[must_use]
    pub fn verify(&self, solution: &Solution) -> bool {
        let mut covered = BitVec::from_elem(self.columns, false);

        for row in solution.iter() {
            let Some(columns) = self.rows.get(row) else {
                return false;
            };
            for &column in columns {
                if covered[column] {
                    return false;
                }
                covered.set(column, true);
            }
        }
        covered.all()
    }
}

/// Prints the problem in the `.xc` text format read by
/// [`parse_xc`](crate::dlx::format::parse_xc).
///
/// Empty rows have no textual form and are skipped, so rows after an empty
/// one are renumbered when the output is read back.
impl Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.rows.iter().filter(|row| !row.is_empty()).collect_vec();
        writeln!(f, "p xc {} {}", self.columns, rows.len())?;
        for row in rows {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_row_numbers_rows() {
        let mut problem = Problem::new(3);
        assert_eq!(problem.add_row([0, 2]), Ok(0));
        assert_eq!(problem.add_row([]), Ok(1));
        assert_eq!(problem.add_row(vec![1]), Ok(2));
        assert_eq!(problem.len(), 3);
        assert_eq!(problem.rows()[0].as_slice(), &[0, 2]);
    }

    #[test]
    fn test_add_row_rejects_bad_columns() {
        let mut problem = Problem::new(3);
        assert_eq!(
            problem.add_row([0, 3]),
            Err(ProblemError::ColumnOutOfRange {
                column: 3,
                columns: 3
            })
        );
        assert_eq!(
            problem.add_row([1, 2, 1]),
            Err(ProblemError::DuplicateColumn { column: 1 })
        );
        assert!(problem.is_empty());
    }

    #[test]
    fn test_empty_rows_stay_out_of_the_matrix() {
        let mut problem = Problem::new(2);
        problem.add_row([]).unwrap();
        problem.add_row([0]).unwrap();
        problem.add_row([]).unwrap();
        problem.add_row([1]).unwrap();

        let (matrix, origins) = problem.to_matrix();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(origins, vec![1, 3]);

        let solution = problem.solve().unwrap();
        assert_eq!(solution.sorted(), vec![1, 3]);
        assert!(problem.verify(&solution));
    }

    #[test]
    fn test_solve_reports_failure() {
        let mut problem = Problem::new(2);
        problem.add_row([0, 1]).unwrap();
        problem.add_row([1]).unwrap();
        problem.add_row([0]).unwrap();
        problem.add_row([0, 1]).unwrap();
        assert!(problem.solve().is_some());

        let mut problem = Problem::new(2);
        problem.add_row([0]).unwrap();
        problem.add_row([0, 1]).unwrap();
        problem.add_row([]).unwrap();
        assert!(problem.solve().is_some());

        let mut problem = Problem::new(3);
        problem.add_row([0, 1]).unwrap();
        problem.add_row([1, 2]).unwrap();
        assert_eq!(problem.solve(), None);
    }

    #[test]
    fn test_verify_uses_problem_numbering() {
        let mut problem = Problem::new(2);
        problem.add_row([]).unwrap();
        problem.add_row([0, 1]).unwrap();
        assert!(problem.verify(&Solution::new(vec![1])));
        assert!(!problem.verify(&Solution::new(vec![0])));
        assert!(!problem.verify(&Solution::new(vec![1, 1])));
        assert!(!problem.verify(&Solution::new(vec![5])));
    }

    #[test]
    fn test_display_writes_xc() {
        let mut problem = Problem::new(4);
        problem.add_row([0, 1]).unwrap();
        problem.add_row([]).unwrap();
        problem.add_row([3, 2]).unwrap();
        assert_eq!(problem.to_string(), "p xc 4 2\n0 1\n3 2\n");
    }
}
