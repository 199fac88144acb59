//! End-to-end pipeline: generate, stage, publish.
//!
//! Stages run strictly one after another. Every page is relocated before
//! any navigation block is written, and the tree is final before the
//! publisher compares a single byte.

use std::fs;
use std::path::{Path, PathBuf};

use mantree_publish::{IncrementalPublisher, PublishConfig, PublishReport};

use crate::error::{PipelineError, StageError};
use crate::generator::{GeneratorError, PageGenerator};
use crate::materializer::TreeMaterializer;
use crate::navigation::{DirectoryIndex, NavigationInjector};
use crate::page::collect_staged_pages;
use crate::rewriter::PageRewriter;

/// Configuration of the staging stages.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Directory the generator writes flat pages into.
    pub staging_dir: PathBuf,
    /// Delimiter joining namespace segments in flat filenames.
    pub delimiter: char,
    /// Lines starting with this marker are dropped.
    pub boilerplate_marker: String,
    /// Empty the staging directory before generating.
    pub clean_staging: bool,
}

/// Summary of the staging stages.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Pages moved into subdirectories.
    pub relocated: usize,
    /// Root-level pages kept in place.
    pub in_place: usize,
    /// Pages left in place because their name could not be decomposed.
    pub malformed: Vec<String>,
    /// Navigation blocks appended.
    pub navigation_blocks: usize,
}

/// Summary of a full run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Staging summary.
    pub stage: StageReport,
    /// Publishing summary.
    pub publish: PublishReport,
}

/// Relocate, rewrite and link the flat pages already in the staging directory.
pub fn stage(config: &StageConfig) -> Result<StageReport, StageError> {
    let pages = collect_staged_pages(&config.staging_dir)?;
    tracing::info!(pages = pages.len(), "Staging pages");

    let materializer = TreeMaterializer::new(
        config.staging_dir.clone(),
        config.delimiter,
        PageRewriter::new(config.boilerplate_marker.clone()),
    );
    let materialized = materializer.materialize(&pages)?;

    let index = DirectoryIndex::build(&materialized.relocated);
    let navigation_blocks =
        NavigationInjector::new(config.staging_dir.clone()).inject(&index)?;

    let report = StageReport {
        relocated: materialized.relocated.len(),
        in_place: materialized.in_place.len(),
        malformed: materialized.malformed,
        navigation_blocks,
    };
    tracing::info!(
        relocated = report.relocated,
        in_place = report.in_place,
        navigation_blocks = report.navigation_blocks,
        "Staged pages"
    );
    Ok(report)
}

/// The whole generate, stage and publish run.
pub struct Pipeline {
    generator: Box<dyn PageGenerator>,
    stage: StageConfig,
    destination_dir: PathBuf,
    prune_stale: bool,
}

impl Pipeline {
    /// Create a pipeline publishing into `destination_dir`.
    pub fn new(
        generator: Box<dyn PageGenerator>,
        stage: StageConfig,
        destination_dir: PathBuf,
    ) -> Self {
        Self {
            generator,
            stage,
            destination_dir,
            prune_stale: false,
        }
    }

    /// Delete destination files no staged page produces anymore.
    #[must_use]
    pub fn with_prune_stale(mut self, prune_stale: bool) -> Self {
        self.prune_stale = prune_stale;
        self
    }

    /// Run every stage. The first failure aborts the run.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        generate_into_staging(
            self.generator.as_ref(),
            &self.stage.staging_dir,
            self.stage.clean_staging,
        )?;

        let staged = stage(&self.stage)?;

        let publisher = IncrementalPublisher::new(PublishConfig {
            source_dir: self.stage.staging_dir.clone(),
            destination_dir: self.destination_dir.clone(),
            prune_stale: self.prune_stale,
        });
        let publish = publisher.publish()?;

        Ok(PipelineReport {
            stage: staged,
            publish,
        })
    }
}

/// Run the generator so that `dir` holds its output.
///
/// With `clean`, pages are generated into a fresh sibling directory that
/// replaces `dir` only once the generator succeeds, so a failed run leaves
/// the previous staging tree as it was. Without `clean`, the generator
/// writes into `dir` directly.
fn generate_into_staging(
    generator: &dyn PageGenerator,
    dir: &Path,
    clean: bool,
) -> Result<(), GeneratorError> {
    let to_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| GeneratorError::OutputDir { path, source }
    };

    if !clean {
        fs::create_dir_all(dir).map_err(to_err(dir))?;
        return generator.generate(dir);
    }

    let parent = dir.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(to_err(parent))?;
    let fresh = tempfile::Builder::new()
        .prefix(".mantree-")
        .tempdir_in(parent)
        .map_err(to_err(parent))?;

    generator.generate(fresh.path())?;

    if dir.exists() {
        tracing::debug!(dir = %dir.display(), "Replacing staging directory");
        fs::remove_dir_all(dir).map_err(to_err(dir))?;
    }
    fs::rename(fresh.path(), dir).map_err(to_err(dir))?;
    // The temporary directory now lives at `dir`
    let _ = fresh.keep();
    Ok(())
}
