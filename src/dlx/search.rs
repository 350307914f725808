#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Algorithm X on a dancing-links [`Matrix`].
//!
//! The search is a plain recursive backtracker:
//!
//! 1. If no column is active, every constraint is met by the rows on the
//!    solution stack: report success.
//! 2. Otherwise let the [`ColumnSelection`] pick a column and cover it.
//! 3. For each row in that column, top to bottom: push it, cover every other
//!    column of the row, and recurse. On success return at once, leaving the
//!    matrix covered. On failure uncover those columns in reverse and pop.
//! 4. If no row worked, uncover the column and report failure.
//!
//! Each level covers at least one column, so the recursion is never deeper
//! than the number of columns. The search stops at the first exact cover.

use crate::dlx::matrix::{Direction, Matrix, NodeIndex};
use crate::dlx::selection::{ColumnSelection, MinimumSize};
use crate::dlx::solution::{SearchStats, Solution};
use tracing::debug;

/// An exact cover solver: a matrix, a solution stack and a column selector.
#[derive(Debug, Clone)]
pub struct Dlx<S: ColumnSelection = MinimumSize> {
    matrix: Matrix,
    /// One node per committed row, in commit order.
    stack: Vec<NodeIndex>,
    selector: S,
    stats: SearchStats,
    /// Set once a search succeeds; the matrix is then left covered.
    solved: bool,
}

impl Dlx {
    /// Creates a solver for `columns` constraints using the minimum-size
    /// heuristic.
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self::from_matrix(Matrix::new(columns))
    }

    /// Wraps a matrix that already holds its rows.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix) -> Self {
        Self::with_selector(matrix, MinimumSize)
    }
}

impl From<Matrix> for Dlx {
    fn from(matrix: Matrix) -> Self {
        Self::from_matrix(matrix)
    }
}

impl<S: ColumnSelection> Dlx<S> {
    /// Creates a solver over an existing matrix with the given selector.
    #[must_use]
    pub const fn with_selector(matrix: Matrix, selector: S) -> Self {
        Self {
            matrix,
            stack: Vec::new(),
            selector,
            stats: SearchStats {
                nodes: 0,
                choices: 0,
                backtracks: 0,
                updates: 0,
                max_depth: 0,
            },
            solved: false,
        }
    }

    /// Appends a row; see [`Matrix::add_row`]. Rows must all be added before
    /// searching.
    pub fn add_row(&mut self, columns: &[usize]) -> Option<usize> {
        debug_assert!(
            self.stack.is_empty() && !self.solved,
            "rows cannot be added once the search has started"
        );
        self.matrix.add_row(columns)
    }

    /// The underlying matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Counters of the searches run so far.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Searches for an exact cover.
    ///
    /// Returns `true` if one was found; [`Self::solution`] then lists its
    /// rows. The matrix is left covered after a success, so a
    /// solver can only succeed once; build a new one for the next problem.
    ///
    /// Returns `false` if there is no exact cover. The matrix is then restored
    /// to exactly the state it was in before the call and the solution stack
    /// is empty.
    ///
    /// The search recurses once per committed row, so the deepest recursion
    /// equals the number of rows in the cover. Covers of a few hundred
    /// thousand rows overflow a default 8 MiB stack; run such searches on a
    /// thread with a larger stack, as the `dlx` binary does.
    pub fn search(&mut self) -> bool {
        debug_assert!(!self.solved, "a solved matrix is consumed");
        debug!(
            columns = self.matrix.columns(),
            rows = self.matrix.rows(),
            nodes = self.matrix.nodes(),
            "searching for an exact cover"
        );

        self.solved = self.search_level(0);

        debug!(
            found = self.solved,
            search_nodes = self.stats.nodes,
            choices = self.stats.choices,
            backtracks = self.stats.backtracks,
            updates = self.stats.updates,
            "search finished"
        );
        self.solved
    }

    /// Searches and hands back the rows of the first exact cover, if any.
    #[must_use]
    pub fn solve(mut self) -> Option<Solution> {
        self.search().then(|| self.solution())
    }

    /// The rows currently on the solution stack, in commit order. After a
    /// successful [`Self::search`] this is the exact cover.
    #[must_use]
    pub fn solution(&self) -> Solution {
        self.stack
            .iter()
            .filter_map(|&node| self.matrix.row_of(node))
            .collect::<Vec<_>>()
            .into()
    }

    fn search_level(&mut self, depth: usize) -> bool {
        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if self.matrix.is_exhausted() {
            return true;
        }
        let Some(column) = self.selector.pick(&self.matrix) else {
            return false;
        };
        let header = Matrix::header(column);

        self.stats.updates += self.matrix.dance(header, Direction::Forward);

        let slot = self.stack.len();
        let mut row = self.matrix[header].down();
        while row != header {
            self.stack.push(row);
            self.stats.choices += 1;

            let mut node = self.matrix[row].right();
            while node != row {
                let other = self.matrix[node].column();
                self.stats.updates += self.matrix.dance(other, Direction::Forward);
                node = self.matrix[node].right();
            }

            if self.search_level(depth + 1) {
                return true;
            }

            // Deeper levels have pushed and popped their own rows since.
            row = self.stack[slot];
            let mut node = self.matrix[row].left();
            while node != row {
                let other = self.matrix[node].column();
                self.matrix.dance(other, Direction::Reverse);
                node = self.matrix[node].left();
            }
            self.stack.pop();
            self.stats.backtracks += 1;

            row = self.matrix[row].down();
        }

        self.matrix.dance(header, Direction::Reverse);
        false
    }
}
