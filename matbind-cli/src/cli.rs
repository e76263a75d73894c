//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    BindCommand, CompletionsCommand, ShowCommand, UnbindAllCommand, UnbindCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for binding and unbinding materials in stage documents.
#[derive(Parser)]
#[command(name = "matbind")]
#[command(version, about = "Bind and unbind materials in stage documents", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Configuration file, above the project and user files
    #[arg(long, value_name = "FILE", global = true, env = "MATBIND_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Bind a material to prims
    Bind(BindCommand),

    /// Unbind prims for one purpose, cycling until nothing binds them
    Unbind(UnbindCommand),

    /// Unbind prims for every purpose in one pass
    UnbindAll(UnbindAllCommand),

    /// Show the material each prim resolves to
    Show(ShowCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
