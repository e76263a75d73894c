//! Unbind command implementation.
//!
//! This module implements the `unbind` command: for one purpose, resolve
//! what binds the given prims, block or exclude it, and repeat until nothing
//! does or the cycle limit is reached.

use crate::error::CliError;
use crate::utils::{
    load_configuration, load_stage, output_format, parse_prims, print_output, save_stage,
    GlobalOptions,
};
use clap::Args;
use matbind::output::OutputFormat;
use matbind::{unbind, Purpose};
use std::path::PathBuf;

/// Unbind prims for one purpose.
#[derive(Args)]
pub struct UnbindCommand {
    /// Stage document to edit
    #[arg(long, value_name = "FILE", env = "MATBIND_STAGE")]
    pub stage: PathBuf,

    /// Purpose to unbind (default: from configuration)
    #[arg(long, value_enum)]
    pub purpose: Option<Purpose>,

    /// Maximum resolve/block cycles (default: from configuration)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Report what would change without writing the stage
    #[arg(long)]
    pub dry_run: bool,

    /// Write the edited stage here instead of over the input
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format (default: from configuration)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Prims to unbind
    #[arg(required = true, value_name = "PRIMS")]
    pub prims: Vec<String>,
}

impl UnbindCommand {
    /// Execute the unbind command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut logger = global.logger();
        let config = load_configuration(global)?;
        let mut stage = load_stage(&self.stage, &logger)?;
        let selection = parse_prims(&self.prims, &mut logger)?;

        let purpose = self.purpose.unwrap_or_else(|| config.purpose());
        let limit = self.limit.unwrap_or_else(|| config.unbind_limit());
        let report = unbind(&mut stage, &selection, purpose, limit, &mut logger)?;
        logger.info(&format!("unbind finished after {} cycle(s)", report.cycles));

        if !report.is_noop() || self.output.is_some() {
            save_stage(
                &stage,
                &self.stage,
                self.output.as_deref(),
                self.dry_run,
                &logger,
            )?;
        }

        let formatter = output_format(self.format, &config).create_formatter();
        print_output(&formatter.format_unbind(&report)?);

        if report.success {
            Ok(())
        } else {
            Err(CliError::PartialFailure(
                "some bindings could not be removed".to_string(),
            ))
        }
    }
}
