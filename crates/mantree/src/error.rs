//! CLI error types.

use mantree_config::ConfigError;
use mantree_manpages::{PipelineError, StageError};
use mantree_publish::PublishError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Stage(#[from] StageError),

    #[error("{0}")]
    Publish(#[from] PublishError),
}
