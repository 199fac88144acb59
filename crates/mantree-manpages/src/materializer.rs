//! Writing rewritten pages into the nested staging tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StageError;
use crate::namespace::NamespacePath;
use crate::page::StagedPage;
use crate::rewriter::PageRewriter;

/// Outcome of materializing a batch of staged pages.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Materialized {
    /// Pages moved into a subdirectory, in processing order.
    pub relocated: Vec<NamespacePath>,
    /// Root-level pages left in place untouched.
    pub in_place: Vec<NamespacePath>,
    /// Pages whose name could not be decomposed; left in place untouched.
    pub malformed: Vec<String>,
}

/// Relocates flat pages into the directory tree their names describe.
pub struct TreeMaterializer {
    staging_dir: PathBuf,
    delimiter: char,
    rewriter: PageRewriter,
}

impl TreeMaterializer {
    /// Create a materializer working inside `staging_dir`.
    pub fn new(staging_dir: PathBuf, delimiter: char, rewriter: PageRewriter) -> Self {
        Self {
            staging_dir,
            delimiter,
            rewriter,
        }
    }

    /// Root of the staging tree.
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Rewrite and relocate every page.
    ///
    /// Nested pages are written to `<ancestors>/<name>.<ext>` and their flat
    /// original is removed. Root-level pages and pages with malformed names
    /// stay exactly as the generator wrote them.
    pub fn materialize(&self, pages: &[StagedPage]) -> Result<Materialized, StageError> {
        let mut result = Materialized::default();

        for page in pages {
            let path = match NamespacePath::parse(&page.file_name, self.delimiter) {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(page = %page.file_name, %err, "Leaving page in place");
                    result.malformed.push(page.file_name.clone());
                    continue;
                }
            };

            if !path.is_nested() {
                tracing::debug!(page = %page.file_name, "Root-level page, kept in place");
                result.in_place.push(path);
                continue;
            }

            let rewritten = self.rewriter.rewrite(page, path);
            let target = self.staging_dir.join(rewritten.path.relative_path());

            let dir = self.staging_dir.join(rewritten.path.directory());
            fs::create_dir_all(&dir).map_err(StageError::io("create directory", &dir))?;
            fs::write(&target, &rewritten.content).map_err(StageError::io("write", &target))?;

            let flat = self.staging_dir.join(&page.file_name);
            if flat != target {
                fs::remove_file(&flat).map_err(StageError::io("remove", &flat))?;
            }

            tracing::debug!(
                page = %page.file_name,
                target = %rewritten.path.relative_path().display(),
                "Relocated page"
            );
            result.relocated.push(rewritten.path);
        }

        Ok(result)
    }
}
