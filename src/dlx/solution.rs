#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Exact covers found by the search, and the statistics of finding them.

use crate::dlx::matrix::Matrix;
use bit_vec::BitVec;
use itertools::Itertools;
use std::fmt::Display;

/// The rows of an exact cover, in the order the search committed to them.
///
/// A row is identified by the position it was added in; see
/// [`Matrix::add_row`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Solution {
    rows: Vec<usize>,
}

impl Solution {
    /// Creates a solution from row identities.
    #[must_use]
    pub const fn new(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    /// The chosen rows, in commit order.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// The number of chosen rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no row was chosen, which happens only when the
    /// matrix has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the chosen rows, in commit order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }

    /// The chosen rows in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Vec<usize> {
        self.rows.iter().copied().sorted_unstable().collect()
    }

    /// Replaces every row identity through `f`.
    #[must_use]
    pub fn map_rows(self, f: impl FnMut(usize) -> usize) -> Self {
        Self {
            rows: self.rows.into_iter().map(f).collect(),
        }
    }
}

impl From<Vec<usize>> for Solution {
    fn from(rows: Vec<usize>) -> Self {
        Self::new(rows)
    }
}

impl From<Solution> for Vec<usize> {
    fn from(solution: Solution) -> Self {
        solution.rows
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rows.iter().join(" "))
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Recursive calls, i.e. nodes of the search tree.
    pub nodes: usize,
    /// Rows tentatively added to the solution.
    pub choices: usize,
    /// Rows taken back off the solution after their subtree failed.
    pub backtracks: usize,
    /// Nodes unlinked from a column by covering.
    pub updates: usize,
    /// The deepest level reached; equals the number of rows in a solution
    /// when one is found.
    pub max_depth: usize,
}

impl Matrix {
    /// Checks that `solution` is an exact cover of this matrix: every row
    /// exists and every column is covered by exactly one of its rows.
    ///
    /// Row contents are read through the horizontal row links, which the
    /// search never rewires, so a matrix left covered by a successful search
    /// can still verify its own answer.
    #[must_use]
    pub fn verify(&self, solution: &Solution) -> bool {
        let mut covered = BitVec::from_elem(self.columns(), false);

        for row in solution.iter() {
            if row >= self.rows() {
                return false;
            }
            for column in self.row_columns(row) {
                if covered[column] {
                    return false;
                }
                covered.set(column, true);
            }
        }
        covered.all()
    }
}
