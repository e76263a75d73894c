//! Bind command implementation.
//!
//! This module implements the `bind` command, which binds a material to the
//! given prims directly or through a collection and writes the stage back.

use crate::error::CliError;
use crate::utils::{
    load_configuration, load_stage, output_format, parse_path, parse_prims, print_output,
    save_stage, GlobalOptions,
};
use clap::Args;
use matbind::output::OutputFormat;
use matbind::stage::ExpansionRule;
use matbind::{bind, BindMethod, BindOptions, Purpose, Strength};
use std::path::PathBuf;

/// Bind a material to prims.
#[derive(Args)]
pub struct BindCommand {
    /// Stage document to edit
    #[arg(long, value_name = "FILE", env = "MATBIND_STAGE")]
    pub stage: PathBuf,

    /// Material prim to bind
    #[arg(long, value_name = "PATH")]
    pub material: String,

    /// Bind each prim directly, or all of them through one collection
    #[arg(long, value_enum, default_value_t = BindMethod::Direct)]
    pub method: BindMethod,

    /// Binding strength (default: from configuration)
    #[arg(long, value_enum)]
    pub strength: Option<Strength>,

    /// Binding purpose (default: from configuration)
    #[arg(long, value_enum)]
    pub purpose: Option<Purpose>,

    /// Collection name (collection method; default: the material's name)
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Prim owning the collection (collection method; default: the nearest
    /// prim above every selected prim)
    #[arg(long, value_name = "PATH")]
    pub binding_prim: Option<String>,

    /// Last component of the binding name (collection method; default: the
    /// collection name)
    #[arg(long, value_name = "NAME")]
    pub binding_name: Option<String>,

    /// Expansion rule of a new collection (default: from configuration)
    #[arg(long, value_enum)]
    pub expansion: Option<ExpansionRule>,

    /// Report what would change without writing the stage
    #[arg(long)]
    pub dry_run: bool,

    /// Write the edited stage here instead of over the input
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format (default: from configuration)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Prims to bind
    #[arg(required = true, value_name = "PRIMS")]
    pub prims: Vec<String>,
}

impl BindCommand {
    /// Execute the bind command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut logger = global.logger();

        // 1. Validate option combinations
        if self.method == BindMethod::Direct
            && (self.collection.is_some()
                || self.binding_prim.is_some()
                || self.binding_name.is_some())
        {
            return Err(CliError::InvalidArguments(
                "--collection, --binding-prim and --binding-name need --method collection"
                    .to_string(),
            ));
        }

        // 2. Load configuration and stage
        let config = load_configuration(global)?;
        let material = parse_path(&self.material, "--material")?;
        let binding_prim = self
            .binding_prim
            .as_deref()
            .map(|arg| parse_path(arg, "--binding-prim"))
            .transpose()?;
        let mut stage = load_stage(&self.stage, &logger)?;
        let selection = parse_prims(&self.prims, &mut logger)?;

        // 3. Build options; flags win over configuration
        let mut options = BindOptions::from_config(material, &config)
            .with_method(self.method)
            .with_collection_name(self.collection)
            .with_binding_prim(binding_prim)
            .with_binding_name(self.binding_name);
        if let Some(strength) = self.strength {
            options = options.with_strength(strength);
        }
        if let Some(purpose) = self.purpose {
            options = options.with_purpose(purpose);
        }
        if let Some(rule) = self.expansion {
            options = options.with_expansion_rule(rule);
        }

        // 4. Bind, then write unless nothing changed
        let report = bind(&mut stage, &selection, &options, &mut logger)?;
        if !report.relationships.is_empty() {
            save_stage(
                &stage,
                &self.stage,
                self.output.as_deref(),
                self.dry_run,
                &logger,
            )?;
        }

        let formatter = output_format(self.format, &config).create_formatter();
        print_output(&formatter.format_bind(&report)?);

        if report.success {
            Ok(())
        } else {
            Err(CliError::PartialFailure(format!(
                "some prims could not be bound to {}",
                report.material
            )))
        }
    }
}
