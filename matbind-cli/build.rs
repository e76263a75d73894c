//! Build script for matbind-cli.
//!
//! This script generates the man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this structure synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("matbind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bind and unbind materials in stage documents")
        .long_about(
            "Command-line tool for editing material bindings in YAML or JSON stage documents. \
             Unbinding preserves the resolved material of every prim outside the selection.",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration file, above the project and user files")
                .value_name("FILE")
                .global(true)
                .env("MATBIND_CONFIG"),
        )
        .subcommands(vec![
            Command::new("bind")
                .about("Bind a material to prims")
                .long_about("Bind a material to each prim directly, or to all of them through a collection"),
            Command::new("unbind")
                .about("Unbind prims for one purpose, cycling until nothing binds them")
                .long_about(
                    "Resolve what binds the prims, block or exclude it, and repeat up to the cycle limit",
                ),
            Command::new("unbind-all")
                .about("Unbind prims for every purpose in one pass")
                .long_about(
                    "Hand the selection's bindings down to untouched children, then block them",
                ),
            Command::new("show")
                .about("Show the material each prim resolves to")
                .long_about("Print each prim's bound material and the relationship that decides it"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").map_err(io::Error::other)?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(man_dir.join("matbind.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
