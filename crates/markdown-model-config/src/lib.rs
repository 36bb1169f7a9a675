//! Configuration primitives and loader for the markdown-model toolkit.
//!
//! Settings are resolved from a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Each layer only overrides the keys it sets, and relative paths are
//! resolved against the directory of the file that declared them.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".markdown-model.toml";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub project: ProjectSettings,
    pub write: WriteSettings,
    pub sources: ConfigSources,
}

/// Project-level settings.
#[derive(Clone, Debug)]
pub struct ProjectSettings {
    /// Base directory that relative document paths are resolved against.
    pub root: PathBuf,
}

/// Settings that govern how documents are written back to disk.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WriteSettings {
    /// Write through a temporary file and rename it into place.
    pub atomic: bool,
    /// Copy an existing target to `<name>.bak` before overwriting it.
    pub backup: bool,
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::defaults(default_source.clone());
        let mut layers = vec![default_source];

        for (kind, path) in layer_candidates(&working_dir, override_path) {
            let source = ConfigSource::for_file(kind, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            layers.push(source);
        }

        Ok(merged.finalize(ConfigSources {
            working_directory: working_dir,
            layers,
        }))
    }

    /// Built-in defaults anchored at `root`, without consulting the filesystem.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let source = ConfigSource::default(root.clone());
        PartialConfig::defaults(source.clone()).finalize(ConfigSources {
            working_directory: root,
            layers: vec![source],
        })
    }

    /// Returns a copy with different write settings.
    pub fn with_write(mut self, write: WriteSettings) -> Self {
        self.write = write;
        self
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Config files that exist for this working directory, lowest precedence
/// first. A file reachable through several routes is only read once, at its
/// highest precedence.
fn layer_candidates(
    working_dir: &Path,
    override_path: Option<PathBuf>,
) -> Vec<(ConfigSourceKind, PathBuf)> {
    let local = working_dir.join(CONFIG_FILE_NAME);
    let git = find_git_root(working_dir).map(|root| root.join(CONFIG_FILE_NAME));

    let mut candidates: Vec<(ConfigSourceKind, PathBuf)> = Vec::new();
    if let Some(git) = git.filter(|path| path.exists() && *path != local) {
        candidates.push((ConfigSourceKind::GitRoot, git));
    }
    if local.exists() {
        candidates.push((ConfigSourceKind::Local, local));
    }
    if let Some(path) = override_path {
        candidates.retain(|(_, existing)| *existing != path);
        candidates.push((ConfigSourceKind::Override, path));
    }
    candidates
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.into(),
        source: err,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.into(),
        source: err,
    })?;
    Ok(raw.into_partial(source))
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else if path == Path::new(".") {
        located.source.base_dir.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    root: Option<Located<PathBuf>>,
    atomic: Option<bool>,
    backup: Option<bool>,
}

impl PartialConfig {
    fn defaults(source: ConfigSource) -> Self {
        PartialConfig {
            root: Some(Located::new(PathBuf::from("."), source)),
            atomic: Some(false),
            backup: Some(false),
        }
    }

    fn merge(&mut self, other: PartialConfig) {
        if other.root.is_some() {
            self.root = other.root;
        }
        if other.atomic.is_some() {
            self.atomic = other.atomic;
        }
        if other.backup.is_some() {
            self.backup = other.backup;
        }
    }

    fn finalize(self, sources: ConfigSources) -> Config {
        let root = self
            .root
            .map(|located| resolve_path(&located))
            .unwrap_or_else(|| sources.working_directory.clone());

        Config {
            project: ProjectSettings { root },
            write: WriteSettings {
                atomic: self.atomic.unwrap_or(false),
                backup: self.backup.unwrap_or(false),
            },
            sources,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    project: Option<RawProject>,
    #[serde(default)]
    write: Option<RawWrite>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    #[serde(default)]
    root: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWrite {
    #[serde(default)]
    atomic: Option<bool>,
    #[serde(default)]
    backup: Option<bool>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let root = self
            .project
            .and_then(|project| project.root)
            .map(|root| Located::new(root, source));
        let (atomic, backup) = match self.write {
            Some(write) => (write.atomic, write.backup),
            None => (None, None),
        };
        PartialConfig {
            root,
            atomic,
            backup,
        }
    }
}
