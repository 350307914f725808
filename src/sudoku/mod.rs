#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku puzzles solved through their exact cover encoding.

/// Reading puzzles from text.
pub mod parse;
/// The exact cover encoding and the puzzle types.
pub mod solver;
