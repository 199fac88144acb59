//! Navigation blocks linking each directory's index page to its children.
//!
//! A directory `a/b` created by relocation is represented on the site by its
//! sibling page `a/b.md`. That page receives one hidden `toctree` whose glob
//! (`b/*`) picks up every page directly inside `a/b` and nothing deeper.
//!
//! The set of directories and their children is computed up front from the
//! relocated namespace paths, so the result never depends on the order in
//! which the filesystem lists entries.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StageError;
use crate::namespace::{NamespacePath, with_extension};

/// A directory of the nested tree and its immediate children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Directory segments, root first (never empty).
    pub segments: Vec<String>,
    /// Names of the pages and subdirectories directly inside.
    pub children: BTreeSet<String>,
    /// Extension of the index page.
    pub extension: Option<String>,
}

impl DirectoryNode {
    /// The directory's own name.
    pub fn name(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Location of the index page relative to the tree root (`a/b.md` for `a/b`).
    pub fn index_page(&self) -> PathBuf {
        let parent: PathBuf = self.segments[..self.segments.len() - 1].iter().collect();
        parent.join(with_extension(self.name(), self.extension.as_deref()))
    }

    /// Glob matching the directory's immediate children, relative to the index page.
    pub fn glob(&self) -> String {
        format!("{}/*", self.name())
    }
}

/// Every directory implied by a set of relocated pages.
#[derive(Debug, Default)]
pub struct DirectoryIndex {
    nodes: BTreeMap<Vec<String>, DirectoryNode>,
}

impl DirectoryIndex {
    /// Build the index from relocated page paths.
    pub fn build<'a>(paths: impl IntoIterator<Item = &'a NamespacePath>) -> Self {
        let mut nodes: BTreeMap<Vec<String>, DirectoryNode> = BTreeMap::new();

        for path in paths {
            let segments = path.segments();
            // Every proper prefix is a directory; the next segment is its child
            for depth in 1..segments.len() {
                let node = nodes
                    .entry(segments[..depth].to_vec())
                    .or_insert_with(|| DirectoryNode {
                        segments: segments[..depth].to_vec(),
                        children: BTreeSet::new(),
                        extension: path.extension().map(str::to_owned),
                    });
                node.children.insert(segments[depth].clone());
            }
        }

        Self { nodes }
    }

    /// Directories in lexicographic segment order.
    pub fn directories(&self) -> impl Iterator<Item = &DirectoryNode> {
        self.nodes.values()
    }

    /// Look up a directory by its segments.
    pub fn get(&self, segments: &[String]) -> Option<&DirectoryNode> {
        self.nodes.get(segments)
    }

    /// Number of directories.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no page was relocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Render the navigation block for a directory named `dir_name`.
pub fn navigation_block(dir_name: &str) -> String {
    format!("```{{toctree}}\n:titlesonly:\n:glob:\n:hidden:\n\n{dir_name}/*\n```\n")
}

/// Appends navigation blocks to directory index pages.
pub struct NavigationInjector {
    staging_dir: PathBuf,
}

impl NavigationInjector {
    /// Create an injector working inside `staging_dir`.
    pub fn new(staging_dir: PathBuf) -> Self {
        Self { staging_dir }
    }

    /// Append one block per directory in `index`.
    ///
    /// Returns the number of blocks written. A missing index page is created
    /// holding only the block.
    pub fn inject(&self, index: &DirectoryIndex) -> Result<usize, StageError> {
        let mut written = 0;
        for node in index.directories() {
            self.append_block(node)?;
            written += 1;
        }
        Ok(written)
    }

    fn append_block(&self, node: &DirectoryNode) -> Result<(), StageError> {
        let page = self.staging_dir.join(node.index_page());

        let mut block = String::new();
        match fs::read(&page) {
            Ok(existing) => {
                if existing.last().is_some_and(|b| *b != b'\n') {
                    block.push('\n');
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    page = %node.index_page().display(),
                    "Index page missing, creating it for navigation"
                );
            }
            Err(err) => return Err(StageError::io("read", &page)(err)),
        }
        block.push_str(&navigation_block(node.name()));

        append(&page, &block)?;
        tracing::debug!(
            page = %node.index_page().display(),
            children = node.children.len(),
            "Appended navigation block"
        );
        Ok(())
    }
}

fn append(path: &Path, content: &str) -> Result<(), StageError> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(StageError::io("open", path))?;
    file.write_all(content.as_bytes())
        .map_err(StageError::io("write", path))
}
