//! `mantree build` command implementation.

use std::path::PathBuf;

use clap::Args;
use mantree_config::CliSettings;
use mantree_manpages::{CommandGenerator, Pipeline};

use super::{CommonArgs, stage_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Destination directory for published pages (overrides config).
    #[arg(short, long)]
    destination_dir: Option<PathBuf>,

    /// Generator executable (overrides config).
    #[arg(short, long)]
    generator: Option<String>,

    /// Delete published pages that are no longer generated.
    #[arg(long)]
    prune: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.common.load_config(CliSettings {
            generator_command: self.generator,
            destination_dir: self.destination_dir,
            prune_stale: self.prune.then_some(true),
            ..CliSettings::default()
        })?;

        let generator_config = &config.generator;
        output.info(&format!("Using {} to generate pages.", generator_config.command));
        output.info(&format!(
            "Staging: {}",
            config.pages_resolved.staging_dir.display()
        ));
        output.info(&format!(
            "Destination: {}",
            config.publish_resolved.destination_dir.display()
        ));

        let generator = CommandGenerator::new(&generator_config.command, &generator_config.format)
            .with_args(generator_config.args.clone())
            .with_all(generator_config.all);

        let pipeline = Pipeline::new(
            Box::new(generator),
            stage_config(&config),
            config.publish_resolved.destination_dir.clone(),
        )
        .with_prune_stale(config.publish_resolved.prune_stale);

        let report = pipeline.run()?;

        output.stage_report(&report.stage);
        output.publish_report(&report.publish);
        Ok(())
    }
}
