//! Error types for page staging.

use std::io;
use std::path::{Path, PathBuf};

use crate::generator::GeneratorError;

/// Error returned while staging pages.
///
/// Every variant is fatal for the run; nothing already written is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// A filesystem operation failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// Operation that failed (e.g. "read", "create directory").
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl StageError {
    /// Build a closure that wraps an [`io::Error`] with operation and path context.
    pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

/// Error returned by a full pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The generator failed. With a clean staging run the previous staging
    /// tree and the destination are left as they were.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    /// Staging failed part way.
    #[error(transparent)]
    Stage(#[from] StageError),
    /// Publishing failed part way.
    #[error(transparent)]
    Publish(#[from] mantree_publish::PublishError),
}
