//! Unbind-all command implementation.
//!
//! This module implements the `unbind-all` command: a single pass over the
//! requested purposes that hands the selection's bindings down to untouched
//! children before blocking them.

use crate::error::CliError;
use crate::utils::{
    load_configuration, load_stage, output_format, parse_prims, print_output, save_stage,
    GlobalOptions,
};
use clap::Args;
use matbind::output::OutputFormat;
use matbind::{unbind_all, Purpose, UnbindOptions};
use std::path::PathBuf;

/// Unbind prims for every purpose.
#[derive(Args)]
pub struct UnbindAllCommand {
    /// Stage document to edit
    #[arg(long, value_name = "FILE", env = "MATBIND_STAGE")]
    pub stage: PathBuf,

    /// Only these purposes (repeatable; default: all)
    #[arg(long = "purpose", value_enum, value_name = "PURPOSE")]
    pub purposes: Vec<Purpose>,

    /// Also block strongerThanDescendants bindings on ancestors
    #[arg(long)]
    pub block_stronger_ancestors: bool,

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

impl UnbindAllCommand {
    /// Execute the unbind-all command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut logger = global.logger();
        let config = load_configuration(global)?;
        let mut stage = load_stage(&self.stage, &logger)?;
        let selection = parse_prims(&self.prims, &mut logger)?;

        let mut options =
            UnbindOptions::new().with_block_stronger_ancestors(self.block_stronger_ancestors);
        if !self.purposes.is_empty() {
            options = options.with_purposes(self.purposes);
        }

        let report = unbind_all(&mut stage, &selection, &options, &mut logger)?;
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
