//! Content-aware incremental publishing for mantree.
//!
//! [`IncrementalPublisher`] mirrors a finished staging tree into a persistent
//! destination tree, copying a file only when the destination copy is absent
//! or its bytes differ. Unchanged files are never rewritten, so their
//! modification times stay put and the site builder's incremental build
//! skips them.
//!
//! Destination files that no staged file produces anymore are reported as
//! stale. They are kept unless pruning is enabled.

mod compare;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub use compare::same_contents;

/// Configuration for incremental publishing.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Finished staging tree.
    pub source_dir: PathBuf,
    /// Persistent tree consumed by the site builder.
    pub destination_dir: PathBuf,
    /// Delete stale destination files.
    pub prune_stale: bool,
}

/// Error returned by the publisher.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// A filesystem operation failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// Operation that failed (e.g. "copy", "compare").
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The source tree could not be walked.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// Root of the walk.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },
    /// The source directory does not exist.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
}

impl PublishError {
    fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

/// Summary of one publishing run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Files copied because they were new or changed (relative paths).
    pub copied: Vec<PathBuf>,
    /// Files skipped because the destination was byte-identical.
    pub unchanged: usize,
    /// Destination files with no staged counterpart (relative paths).
    pub stale: Vec<PathBuf>,
    /// Whether stale files were deleted.
    pub pruned: bool,
}

/// Mirrors a staging tree into a destination tree, copying only changes.
pub struct IncrementalPublisher {
    config: PublishConfig,
}

impl IncrementalPublisher {
    /// Create a new publisher with the given configuration.
    #[must_use]
    pub fn new(config: PublishConfig) -> Self {
        Self { config }
    }

    /// Publish the staging tree.
    ///
    /// Any copy failure aborts the run; files already copied stay copied.
    pub fn publish(&self) -> Result<PublishReport, PublishError> {
        let source_dir = &self.config.source_dir;
        if !source_dir.is_dir() {
            return Err(PublishError::DirectoryNotFound(source_dir.clone()));
        }

        let mut report = PublishReport::default();
        let files = collect_files(source_dir)?;

        for relative in &files {
            let source = source_dir.join(relative);
            let target = self.config.destination_dir.join(relative);

            if same_contents(&source, &target)
                .map_err(PublishError::io("compare", &target))?
            {
                report.unchanged += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(PublishError::io("create directory", parent))?;
            }
            fs::copy(&source, &target).map_err(PublishError::io("copy", &source))?;

            tracing::debug!(path = %relative.display(), "Copied");
            report.copied.push(relative.clone());
        }

        report.stale = self.find_stale(&files)?;
        for relative in &report.stale {
            tracing::warn!(path = %relative.display(), "Stale published file");
        }
        if self.config.prune_stale {
            for relative in &report.stale {
                let target = self.config.destination_dir.join(relative);
                fs::remove_file(&target).map_err(PublishError::io("remove", &target))?;
            }
            report.pruned = true;
        }

        tracing::info!(
            copied = report.copied.len(),
            unchanged = report.unchanged,
            stale = report.stale.len(),
            "Published"
        );
        Ok(report)
    }

    /// Destination files that are not in the published set.
    fn find_stale(&self, published: &[PathBuf]) -> Result<Vec<PathBuf>, PublishError> {
        let destination = &self.config.destination_dir;
        if !destination.is_dir() {
            return Ok(Vec::new());
        }

        let published: BTreeSet<&PathBuf> = published.iter().collect();
        let stale = collect_files(destination)?
            .into_iter()
            .filter(|p| !published.contains(p))
            .collect();
        Ok(stale)
    }
}

/// Regular files under `root`, relative to `root`.
///
/// The walk is depth-first with siblings in name order, so a directory is
/// listed before a file sharing its name prefix (`root/child.md` before
/// `root.md`). Hidden files and directories below `root` are skipped on
/// both sides: they are neither published nor reported stale.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry.map_err(|source| PublishError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
