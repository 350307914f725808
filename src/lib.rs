#![deny(missing_docs)]
//! Exact cover solving with Knuth's Dancing Links, plus a Sudoku front end
//! that encodes puzzles as exact cover problems.

/// The `dlx` module implements the dancing-links matrix and the Algorithm X
/// search over it, together with a text format for exact cover problems.
pub mod dlx;

/// The `sudoku` module encodes Sudoku puzzles of size 4, 9, 16 and 25 as exact
/// cover problems and decodes the answers.
pub mod sudoku;
