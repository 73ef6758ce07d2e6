//! Leasefacts CLI library.
//!
//! This library provides the core functionality for the leasefacts command-line
//! interface: argument parsing, document loading, extraction and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
