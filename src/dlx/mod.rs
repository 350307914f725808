#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Knuth's Dancing Links: Algorithm X over a sparse matrix of circular doubly
//! linked lists.
//!
//! An exact cover problem asks for a set of rows of a 0/1 matrix that has
//! exactly one `1` in every column. [`matrix::Matrix`] stores the `1`s so that
//! removing a column together with every row touching it, and putting them
//! back, are both cheap; [`search::Dlx`] drives the backtracking search on top.
//!
//! ```
//! use dlx_solver::dlx::search::Dlx;
//!
//! let mut dlx = Dlx::new(4);
//! dlx.add_row(&[0, 1]);
//! dlx.add_row(&[2, 3]);
//! dlx.add_row(&[0, 1, 2, 3]);
//!
//! let solution = dlx.solve().unwrap();
//! assert_eq!(solution.sorted(), vec![0, 1]);
//! ```

/// The `.xc` text format for exact cover problems.
pub mod format;
/// The linked matrix structure with cover and uncover.
pub mod matrix;
/// Validated problems that map answers back to their own row numbering.
pub mod problem;
/// The Algorithm X search engine.
pub mod search;
/// Heuristics for choosing the column to branch on.
pub mod selection;
/// Solutions, search statistics and verification.
pub mod solution;
