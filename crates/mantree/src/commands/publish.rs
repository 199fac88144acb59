//! `mantree publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use mantree_config::CliSettings;
use mantree_publish::{IncrementalPublisher, PublishConfig};

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Destination directory for published pages (overrides config).
    #[arg(short, long)]
    destination_dir: Option<PathBuf>,

    /// Delete published pages that have no staged counterpart.
    #[arg(long)]
    prune: bool,
}

impl PublishArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.common.load_config(CliSettings {
            destination_dir: self.destination_dir,
            prune_stale: self.prune.then_some(true),
            ..CliSettings::default()
        })?;

        let source_dir = config.pages_resolved.staging_dir.clone();
        let destination_dir = config.publish_resolved.destination_dir.clone();
        output.info(&format!(
            "Publishing {} to {}",
            source_dir.display(),
            destination_dir.display()
        ));

        let publisher = IncrementalPublisher::new(PublishConfig {
            source_dir,
            destination_dir,
            prune_stale: config.publish_resolved.prune_stale,
        });
        let report = publisher.publish()?;

        output.publish_report(&report);
        Ok(())
    }
}
