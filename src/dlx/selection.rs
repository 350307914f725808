#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Column selection heuristics for Algorithm X.
//!
//! At every level the search has to branch on one of the active columns. Any
//! choice is correct, but the choice decides how many rows are tried: the
//! classic rule is to take the column with the fewest remaining rows, which
//! keeps the branching factor small and is what makes DLX practical.
//!
//! - [`MinimumSize`]: the smallest column, ties going to the leftmost one.
//! - [`FirstActive`]: the leftmost active column, no matter its size.

use crate::dlx::matrix::Matrix;
use clap::ValueEnum;
use std::fmt::{Debug, Display};

/// Picks the column the search branches on next.
pub trait ColumnSelection: Debug + Clone {
    /// Returns the chosen active column, or `None` if no column is active.
    fn pick(&self, matrix: &Matrix) -> Option<usize>;
}

/// Knuth's "S heuristic": the active column with the fewest rows.
///
/// Ties are broken by the first column reaching the minimum during a single
/// left-to-right scan from the root, which makes the search deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinimumSize;

impl ColumnSelection for MinimumSize {
    fn pick(&self, matrix: &Matrix) -> Option<usize> {
        let mut best = None;
        let mut best_size = usize::MAX;

        for column in matrix.active_columns() {
            let size = matrix.size(column);
            if size < best_size {
                best = Some(column);
                best_size = size;
                // Nothing beats an empty column.
                if size == 0 {
                    break;
                }
            }
        }
        best
    }
}

/// The leftmost active column. Unguided; mostly useful as a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirstActive;

impl ColumnSelection for FirstActive {
    fn pick(&self, matrix: &Matrix) -> Option<usize> {
        matrix.active_columns().next()
    }
}

/// Enum over the available selectors, so the heuristic can be chosen at run
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSelectionImpls {
    /// See [`MinimumSize`].
    MinimumSize(MinimumSize),
    /// See [`FirstActive`].
    FirstActive(FirstActive),
}

impl Default for ColumnSelectionImpls {
    fn default() -> Self {
        Self::MinimumSize(MinimumSize)
    }
}

impl ColumnSelection for ColumnSelectionImpls {
    fn pick(&self, matrix: &Matrix) -> Option<usize> {
        match self {
            Self::MinimumSize(s) => s.pick(matrix),
            Self::FirstActive(s) => s.pick(matrix),
        }
    }
}

/// The selectors by name, for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ColumnSelectionType {
    /// Branch on the column with the fewest rows.
    #[default]
    MinimumSize,
    /// Branch on the leftmost active column.
    FirstActive,
}

impl Display for ColumnSelectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinimumSize => write!(f, "minimum-size"),
            Self::FirstActive => write!(f, "first-active"),
        }
    }
}

impl ColumnSelectionType {
    /// Converts the name into a concrete selector.
    #[must_use]
    pub const fn to_impl(self) -> ColumnSelectionImpls {
        match self {
            Self::MinimumSize => ColumnSelectionImpls::MinimumSize(MinimumSize),
            Self::FirstActive => ColumnSelectionImpls::FirstActive(FirstActive),
        }
    }
}
