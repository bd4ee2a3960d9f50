//! Command handlers.
//!
//! Each handler takes the [`CliContext`](crate::bootstrap::CliContext) and its
//! parsed arguments, calls into the library crates and prints the result.
//! Text-producing handlers build their output with a `render_*` function so
//! it can be checked without capturing stdout.

pub mod chemicals;
pub mod config;
pub mod controls;
pub mod run;
