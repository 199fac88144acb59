//! Configuration management for mantree.
//!
//! Parses `mantree.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `generator.command` (also expands a leading `~`)
//! - `pages.staging_dir`
//! - `publish.destination_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the generator executable.
    pub generator_command: Option<String>,
    /// Override the staging directory.
    pub staging_dir: Option<PathBuf>,
    /// Override the destination directory.
    pub destination_dir: Option<PathBuf>,
    /// Override the stale-file prune flag.
    pub prune_stale: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mantree.toml";

/// Default staging directory, relative to the config directory.
const DEFAULT_STAGING_DIR: &str = ".sphinx/deps/manpages";

/// Default destination directory, relative to the config directory.
const DEFAULT_DESTINATION_DIR: &str = "reference/manpages";

/// Default marker of the generator's footer line.
const DEFAULT_BOILERPLATE_MARKER: &str = "###### Auto generated";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manual-page generator invocation.
    pub generator: GeneratorConfig,
    /// Page staging configuration (paths are relative strings from TOML).
    pages: PagesConfigRaw,
    /// Publishing configuration (paths are relative strings from TOML).
    publish: PublishConfigRaw,

    /// Resolved pages configuration (set after loading).
    #[serde(skip)]
    pub pages_resolved: PagesConfig,
    /// Resolved publish configuration (set after loading).
    #[serde(skip)]
    pub publish_resolved: PublishConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Generator configuration.
///
/// The generator is run as `<command> <args...> <staging_dir> --format=<format> [--all]`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Executable name or path.
    pub command: String,
    /// Arguments placed before the output directory (e.g. `["manpage"]`).
    pub args: Vec<String>,
    /// Output format passed as `--format=<format>`.
    pub format: String,
    /// Whether to pass `--all`.
    pub all: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: "incus".to_owned(),
            args: vec!["manpage".to_owned()],
            format: "md".to_owned(),
            all: true,
        }
    }
}

/// Raw pages configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PagesConfigRaw {
    staging_dir: Option<String>,
    delimiter: Option<String>,
    boilerplate_marker: Option<String>,
    clean_staging: Option<bool>,
}

/// Resolved page staging configuration with absolute paths.
#[derive(Debug)]
pub struct PagesConfig {
    /// Directory the generator writes flat pages into.
    pub staging_dir: PathBuf,
    /// Delimiter joining namespace segments in flat filenames.
    pub delimiter: char,
    /// Lines starting with this marker are dropped from every page.
    pub boilerplate_marker: String,
    /// Empty the staging directory before running the generator.
    pub clean_staging: bool,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            delimiter: '_',
            boilerplate_marker: DEFAULT_BOILERPLATE_MARKER.to_owned(),
            clean_staging: true,
        }
    }
}

/// Raw publish configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PublishConfigRaw {
    destination_dir: Option<String>,
    prune_stale: Option<bool>,
}

/// Resolved publish configuration with absolute paths.
#[derive(Debug)]
pub struct PublishConfig {
    /// Persistent tree consumed by the site builder.
    pub destination_dir: PathBuf,
    /// Delete destination files that no staged page produces anymore.
    pub prune_stale: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            destination_dir: PathBuf::from(DEFAULT_DESTINATION_DIR),
            prune_stale: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`pages.staging_dir`").
        field: String,
        /// Error message (e.g., "${`GOPATH`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Parse the delimiter setting into a single character.
fn parse_delimiter(value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::Validation(format!(
            "pages.delimiter must be a single character, got {value:?}"
        ))),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mantree.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(command) = &settings.generator_command {
            self.generator.command.clone_from(command);
        }
        if let Some(staging_dir) = &settings.staging_dir {
            self.pages_resolved.staging_dir.clone_from(staging_dir);
        }
        if let Some(destination_dir) = &settings.destination_dir {
            self.publish_resolved
                .destination_dir
                .clone_from(destination_dir);
        }
        if let Some(prune_stale) = settings.prune_stale {
            self.publish_resolved.prune_stale = prune_stale;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            generator: GeneratorConfig::default(),
            pages: PagesConfigRaw::default(),
            publish: PublishConfigRaw::default(),
            pages_resolved: PagesConfig {
                staging_dir: base.join(DEFAULT_STAGING_DIR),
                ..PagesConfig::default()
            },
            publish_resolved: PublishConfig {
                destination_dir: base.join(DEFAULT_DESTINATION_DIR),
                ..PublishConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_generator()?;
        self.validate_pages()?;
        self.validate_publish()?;
        Ok(())
    }

    fn validate_generator(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.generator.command, "generator.command")?;
        require_non_empty(&self.generator.format, "generator.format")?;
        Ok(())
    }

    fn validate_pages(&self) -> Result<(), ConfigError> {
        let pages = &self.pages_resolved;
        // Path separators and the extension dot would make the split ambiguous
        if matches!(pages.delimiter, '/' | '\\' | '.') {
            return Err(ConfigError::Validation(format!(
                "pages.delimiter cannot be {:?}",
                pages.delimiter
            )));
        }
        require_non_empty(&pages.boilerplate_marker, "pages.boilerplate_marker")?;
        Ok(())
    }

    fn validate_publish(&self) -> Result<(), ConfigError> {
        // CLI overrides may be relative to the working directory
        let absolute = |p: &Path| std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
        let destination = absolute(&self.publish_resolved.destination_dir);
        let staging = absolute(&self.pages_resolved.staging_dir);
        // Cleaning staging would delete a nested destination, and pruning
        // the destination would delete a nested staging tree
        if destination.starts_with(&staging) || staging.starts_with(&destination) {
            return Err(ConfigError::Validation(format!(
                "publish.destination_dir ({}) and pages.staging_dir ({}) must not overlap",
                destination.display(),
                staging.display()
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.generator.command = expand::expand_path(&self.generator.command, "generator.command")?;

        if let Some(ref dir) = self.pages.staging_dir {
            self.pages.staging_dir = Some(expand::expand_env(dir, "pages.staging_dir")?);
        }
        if let Some(ref dir) = self.publish.destination_dir {
            self.publish.destination_dir =
                Some(expand::expand_env(dir, "publish.destination_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory and parse raw values.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let delimiter = match self.pages.delimiter.as_deref() {
            Some(value) => parse_delimiter(value)?,
            None => '_',
        };

        self.pages_resolved = PagesConfig {
            staging_dir: resolve(self.pages.staging_dir.as_deref(), DEFAULT_STAGING_DIR),
            delimiter,
            boilerplate_marker: self
                .pages
                .boilerplate_marker
                .clone()
                .unwrap_or_else(|| DEFAULT_BOILERPLATE_MARKER.to_owned()),
            clean_staging: self.pages.clean_staging.unwrap_or(true),
        };

        self.publish_resolved = PublishConfig {
            destination_dir: resolve(
                self.publish.destination_dir.as_deref(),
                DEFAULT_DESTINATION_DIR,
            ),
            prune_stale: self.publish.prune_stale.unwrap_or(false),
        };

        Ok(())
    }
}
