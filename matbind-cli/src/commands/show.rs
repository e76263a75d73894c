//! Show command implementation.
//!
//! This module implements the `show` command, which prints the material each
//! prim resolves to and the relationship that decides it.

use crate::error::CliError;
use crate::utils::{
    load_configuration, load_stage, output_format, parse_prims, print_output, GlobalOptions,
};
use clap::Args;
use matbind::binding::tokens::MATERIAL_TYPE;
use matbind::output::{binding_rows, OutputFormat};
use matbind::{PathSet, Purpose};
use std::path::PathBuf;

/// Show bound materials.
#[derive(Args)]
pub struct ShowCommand {
    /// Stage document to read
    #[arg(long, value_name = "FILE", env = "MATBIND_STAGE")]
    pub stage: PathBuf,

    /// Purpose to resolve (default: from configuration)
    #[arg(long, value_enum)]
    pub purpose: Option<Purpose>,

    /// Output format (default: from configuration)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Prims to show (default: every prim that is not a material)
    #[arg(value_name = "PRIMS")]
    pub prims: Vec<String>,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut logger = global.logger();
        let config = load_configuration(global)?;
        let stage = load_stage(&self.stage, &logger)?;

        let prims: PathSet = if self.prims.is_empty() {
            stage
                .prims()
                .filter(|prim| prim.type_name() != MATERIAL_TYPE)
                .map(|prim| prim.path().clone())
                .collect()
        } else {
            parse_prims(&self.prims, &mut logger)?
        };

        let purpose = self.purpose.unwrap_or_else(|| config.purpose());
        let rows = binding_rows(&stage, &prims, purpose);
        let formatter = output_format(self.format, &config).create_formatter();
        print_output(&formatter.format_rows(&rows)?);
        Ok(())
    }
}
