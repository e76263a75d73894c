//! Main entry point for the matbind CLI.
//!
//! It edits material bindings in a stage document:
//! - `bind`: Bind a material directly or through a collection
//! - `unbind`: Unbind prims for one purpose, cycling until nothing binds them
//! - `unbind-all`: Unbind prims for every purpose in one pass
//! - `show`: Show the material each prim resolves to

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        cli::Command::Bind(cmd) => cmd.execute(&global),
        cli::Command::Unbind(cmd) => cmd.execute(&global),
        cli::Command::UnbindAll(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
