//! Command-line interface
//!
//! This module contains the CLI argument parsing and the interactive
//! shell that drives a ledger instance.

pub mod commands;
pub mod shell;

pub use commands::{Command, Opt, ShellCommand, ShellLine};
pub use shell::{run_demo, run_shell};
