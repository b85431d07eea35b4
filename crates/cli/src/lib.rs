//! `stockroom` command-line front end.
//!
//! A thin presentation layer: every command opens the store, performs at most
//! one stock operation, reloads the table, and renders it.

pub mod cli;
pub mod commands;
pub mod render;

pub use cli::{Cli, Command, ReportKind};
pub use commands::run;
