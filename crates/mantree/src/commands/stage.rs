//! `mantree stage` command implementation.

use clap::Args;
use mantree_config::CliSettings;

use super::{CommonArgs, stage_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the stage command.
#[derive(Args)]
pub(crate) struct StageArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl StageArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(CliSettings::default())?;

        output.info(&format!(
            "Staging: {}",
            config.pages_resolved.staging_dir.display()
        ));

        let report = mantree_manpages::stage(&stage_config(&config))?;

        output.stage_report(&report);
        Ok(())
    }
}
