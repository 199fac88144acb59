//! Invocation of the external manual-page generator.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Error returned when the generator cannot produce pages.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The generator executable does not exist.
    #[error("Cannot find {}", .0.display())]
    NotFound(PathBuf),
    /// The generator could not be started.
    #[error("Failed to run {}: {source}", command.display())]
    Spawn {
        /// Executable that failed to start.
        command: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The generator exited unsuccessfully.
    #[error("{} exited with {status}: {stderr}", command.display())]
    Failed {
        /// Executable that failed.
        command: PathBuf,
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// The output directory could not be prepared.
    #[error("Failed to prepare {}: {source}", path.display())]
    OutputDir {
        /// Output directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Source of flat pages.
///
/// Implementations write one file per command into `output_dir` and return
/// only once every page is on disk.
pub trait PageGenerator {
    /// Write the flat pages into `output_dir`.
    fn generate(&self, output_dir: &Path) -> Result<(), GeneratorError>;
}

/// Runs an external command as
/// `<command> <args...> <output_dir> --format=<format> [--all]`.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: PathBuf,
    args: Vec<String>,
    format: String,
    all: bool,
}

impl CommandGenerator {
    /// Create a generator for `command` emitting `format` pages for all commands.
    pub fn new(command: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            format: format.into(),
            all: true,
        }
    }

    /// Arguments placed before the output directory (e.g. a `manpage` subcommand).
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Whether to pass `--all`.
    #[must_use]
    pub fn with_all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// Full argument list for an invocation writing into `output_dir`.
    pub fn arguments(&self, output_dir: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(output_dir.to_string_lossy().into_owned());
        args.push(format!("--format={}", self.format));
        if self.all {
            args.push("--all".to_owned());
        }
        args
    }

    /// Fail early when an explicit executable path does not exist.
    ///
    /// Bare names (no path separator) are left to the `PATH` lookup.
    fn check_command(&self) -> Result<(), GeneratorError> {
        let explicit = self.command.components().count() > 1;
        if explicit && !self.command.is_file() {
            return Err(GeneratorError::NotFound(self.command.clone()));
        }
        Ok(())
    }
}

impl PageGenerator for CommandGenerator {
    fn generate(&self, output_dir: &Path) -> Result<(), GeneratorError> {
        self.check_command()?;
        tracing::info!(command = %self.command.display(), "Generating pages");

        let output = Command::new(&self.command)
            .args(self.arguments(output_dir))
            .output()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    GeneratorError::NotFound(self.command.clone())
                } else {
                    GeneratorError::Spawn {
                        command: self.command.clone(),
                        source,
                    }
                }
            })?;

        if !output.status.success() {
            return Err(GeneratorError::Failed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments() {
        let generator = CommandGenerator::new("incus", "md").with_args(vec!["manpage".to_owned()]);
        assert_eq!(
            generator.arguments(Path::new("/tmp/pages")),
            vec!["manpage", "/tmp/pages", "--format=md", "--all"]
        );
    }

    #[test]
    fn test_arguments_without_all() {
        let generator = CommandGenerator::new("tool", "rest").with_all(false);
        assert_eq!(
            generator.arguments(Path::new("out")),
            vec!["out", "--format=rest"]
        );
    }

    #[test]
    fn test_missing_explicit_command() {
        let temp = tempfile::tempdir().unwrap();
        let generator = CommandGenerator::new("/nonexistent/bin/incus", "md");

        let err = generator.generate(temp.path()).unwrap_err();

        assert!(matches!(err, GeneratorError::NotFound(_)));
        assert_eq!(err.to_string(), "Cannot find /nonexistent/bin/incus");
    }

    #[test]
    fn test_missing_command_on_path() {
        let temp = tempfile::tempdir().unwrap();
        let generator = CommandGenerator::new("mantree-no-such-generator", "md");

        let err = generator.generate(temp.path()).unwrap_err();

        assert!(matches!(err, GeneratorError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_stderr() {
        let temp = tempfile::tempdir().unwrap();
        let generator = CommandGenerator::new("sh", "md").with_args(vec![
            "-c".to_owned(),
            "echo 'unknown flag' >&2; exit 3".to_owned(),
        ]);

        let err = generator.generate(temp.path()).unwrap_err();

        match err {
            GeneratorError::Failed { stderr, status, .. } => {
                assert_eq!(stderr, "unknown flag");
                assert!(status.contains('3'), "{status}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command_writes_pages() {
        let temp = tempfile::tempdir().unwrap();
        // sh -c <script> <$0> <$1> ...: the output directory lands in $0
        let generator = CommandGenerator::new("sh", "md").with_args(vec![
            "-c".to_owned(),
            r#"printf '## tool\n' > "$0/tool.md""#.to_owned(),
        ]);

        generator.generate(temp.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join("tool.md")).unwrap(),
            "## tool\n"
        );
    }
}
