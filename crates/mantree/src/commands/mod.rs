//! CLI command implementations.

mod build;
mod publish;
mod stage;

use std::path::PathBuf;

use clap::Args;
use mantree_config::{CliSettings, Config};
use mantree_manpages::StageConfig;

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use publish::PublishArgs;
pub(crate) use stage::StageArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover mantree.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Staging directory for generated pages (overrides config).
    #[arg(short, long)]
    staging_dir: Option<PathBuf>,

    /// Enable verbose output (per-stage progress logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load configuration with these arguments and `settings` applied.
    fn load_config(&self, settings: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            staging_dir: self.staging_dir.clone(),
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Staging settings taken from the resolved configuration.
fn stage_config(config: &Config) -> StageConfig {
    let pages = &config.pages_resolved;
    StageConfig {
        staging_dir: pages.staging_dir.clone(),
        delimiter: pages.delimiter,
        boilerplate_marker: pages.boilerplate_marker.clone(),
        clean_staging: pages.clean_staging,
    }
}
