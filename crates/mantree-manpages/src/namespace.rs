//! Flat page names decomposed into namespace paths.
//!
//! The generator names each page after its full command path joined with a
//! delimiter (`incus_config_device_add.md`). [`NamespacePath`] is the parsed
//! form of such a name: the ordered segments plus the file extension. All
//! later stages work with segments and never split strings again.

use std::fmt;
use std::path::PathBuf;

/// Error returned when a flat filename cannot be decomposed.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    /// The filename has no stem.
    #[error("empty page name")]
    Empty,
    /// Two delimiters are adjacent, or the name starts or ends with one.
    #[error("page name {file_name:?} contains an empty segment")]
    EmptySegment {
        /// The offending filename.
        file_name: String,
    },
}

/// Ordered, non-empty sequence of namespace segments.
///
/// The last segment is the page's own name; the preceding segments are its
/// ancestor directories from the root down.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespacePath {
    segments: Vec<String>,
    extension: Option<String>,
}

impl NamespacePath {
    /// Parse a flat filename such as `root_child.md` using `delimiter`.
    ///
    /// The extension (text after the last `.`) is kept aside and does not take
    /// part in the split.
    pub fn parse(file_name: &str, delimiter: char) -> Result<Self, NamespaceError> {
        let (stem, extension) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext.to_owned())),
            _ => (file_name, None),
        };

        if stem.is_empty() {
            return Err(NamespaceError::Empty);
        }

        let segments: Vec<String> = stem.split(delimiter).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(NamespaceError::EmptySegment {
                file_name: file_name.to_owned(),
            });
        }

        Ok(Self {
            segments,
            extension,
        })
    }

    /// All segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The page's own name (last segment).
    pub fn name(&self) -> &str {
        // Non-empty by construction
        &self.segments[self.segments.len() - 1]
    }

    /// Ancestor directory segments, root first.
    pub fn ancestors(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// File extension without the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True if the page belongs in a subdirectory.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// File name of the page inside its directory (e.g. `grandchild.md`).
    pub fn file_name(&self) -> String {
        with_extension(self.name(), self.extension())
    }

    /// Directory of the page relative to the tree root (empty for root pages).
    pub fn directory(&self) -> PathBuf {
        self.ancestors().iter().collect()
    }

    /// Page location relative to the tree root (e.g. `root/child/grandchild.md`).
    pub fn relative_path(&self) -> PathBuf {
        self.directory().join(self.file_name())
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Join a page name with an optional extension.
pub(crate) fn with_extension(name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{name}.{ext}"),
        None => name.to_owned(),
    }
}
