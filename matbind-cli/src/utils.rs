//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: configuration
//! loading, stage document I/O, selection parsing and report output.

use crate::error::CliError;
use matbind::operations::parse_selection;
use matbind::output::OutputFormat;
use matbind::{init_logger, Config, ConfigBuilder, Logger, PathSet, ScenePath, Stage};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// A logger honouring `--verbose`/`--quiet`; also the diagnostic sink
    /// commands hand to the library.
    pub fn logger(&self) -> Logger {
        init_logger(self.verbose, self.quiet)
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables
/// 2. The `--config` file
/// 3. Project and user configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref path) = global.config {
        builder = builder.with_config_file(path);
    }
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Reads a stage document.
pub fn load_stage(path: &Path, logger: &Logger) -> Result<Stage, CliError> {
    let stage = Stage::load(path)?;
    logger.debug(&format!(
        "loaded {} prim(s) from {}",
        stage.len(),
        path.display()
    ));
    Ok(stage)
}

/// Writes an edited stage to `output`, or back over `input` when no output
/// was given. Nothing is written on a dry run.
pub fn save_stage(
    stage: &Stage,
    input: &Path,
    output: Option<&Path>,
    dry_run: bool,
    logger: &Logger,
) -> Result<(), CliError> {
    if dry_run {
        logger.info("dry run: stage not written");
        return Ok(());
    }
    let target = output.unwrap_or(input);
    stage.save(target)?;
    logger.info(&format!("wrote {}", target.display()));
    Ok(())
}

/// Parses prim path arguments.
///
/// Unparseable paths are reported and skipped; an argument list with no
/// usable path at all is an error.
pub fn parse_prims(args: &[String], logger: &mut Logger) -> Result<PathSet, CliError> {
    let selection = parse_selection(args.iter().map(String::as_str), logger);
    if selection.is_empty() && !args.is_empty() {
        return Err(CliError::InvalidArguments(
            "no valid prim paths given".to_string(),
        ));
    }
    Ok(selection)
}

/// Parses a single path argument.
pub fn parse_path(arg: &str, what: &str) -> Result<ScenePath, CliError> {
    ScenePath::parse(arg).map_err(|e| CliError::InvalidArguments(format!("{what}: {e}")))
}

/// The format chosen on the command line, else the configured one.
pub fn output_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.unwrap_or_else(|| config.output_format())
}

/// Prints formatted output to stdout, with exactly one trailing newline.
pub fn print_output(text: &str) {
    println!("{}", text.trim_end_matches('\n'));
}
