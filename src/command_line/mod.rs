//! Command-line front end of the `dlx` binary.

/// Argument definitions and the solve-and-report helpers behind each subcommand.
pub(crate) mod cli;
