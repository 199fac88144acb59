//! Pages as emitted by the generator.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::error::StageError;

/// A flat page read from the staging directory.
///
/// Holds the raw content as emitted by the generator. Transformations produce
/// new values; a `StagedPage` is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPage {
    /// Flat filename (e.g. `incus_config_set.md`).
    pub file_name: String,
    /// Raw UTF-8 content.
    pub content: String,
    /// Modification time of the staged file, when the platform reports one.
    pub modified: Option<SystemTime>,
}

impl StagedPage {
    /// Build a page from in-memory content.
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            modified: None,
        }
    }

    /// Read a staged page from disk.
    pub fn read(path: &Path) -> Result<Self, StageError> {
        let content = fs::read_to_string(path).map_err(StageError::io("read", path))?;
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file_name,
            content,
            modified,
        })
    }

    /// Iterate the content lines, keeping their line endings.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split_inclusive('\n')
    }

    /// True if the page has no content at all.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Read every flat page directly under `staging_dir`.
///
/// Only regular files count; subdirectories (left by an earlier run) and
/// hidden files are ignored. Pages are returned sorted by filename.
pub fn collect_staged_pages(staging_dir: &Path) -> Result<Vec<StagedPage>, StageError> {
    let entries = fs::read_dir(staging_dir).map_err(StageError::io("list", staging_dir))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(StageError::io("list", staging_dir))?;
        let file_type = entry
            .file_type()
            .map_err(StageError::io("inspect", &entry.path()))?;
        if !file_type.is_file() || entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    paths.iter().map(|p| StagedPage::read(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_endings() {
        let page = StagedPage::new("a.md", "## a\n\nbody");
        let lines: Vec<_> = page.lines().collect();
        assert_eq!(lines, vec!["## a\n", "\n", "body"]);
    }

    #[test]
    fn test_read_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("root_child.md");
        fs::write(&path, "## root child\n").unwrap();

        let page = StagedPage::read(&path).unwrap();

        assert_eq!(page.file_name, "root_child.md");
        assert_eq!(page.content, "## root child\n");
        assert!(page.modified.is_some());
    }

    #[test]
    fn test_read_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let err = StagedPage::read(&dir.path().join("missing.md")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn test_collect_only_top_level_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_c.md"), "b c").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join(".hidden.md"), "hidden").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b").join("old.md"), "old").unwrap();

        let pages = collect_staged_pages(dir.path()).unwrap();

        let names: Vec<_> = pages.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b_c.md"]);
    }

    #[test]
    fn test_collect_missing_dir() {
        let err = collect_staged_pages(Path::new("/nonexistent/staging")).unwrap_err();
        assert!(matches!(err, StageError::Io { action: "list", .. }));
    }
}
