//! Tooling configuration loaded from `tooling.toml`.
//!
//! The raw TOML is deserialized, validated and resolved once into an
//! immutable [`Settings`] value: every relative path is anchored at the
//! directory holding the config file, project roots are canonicalized, and
//! tool flag strings are expanded and split into argument vectors.

use crate::error::{Result, ToolingError};
use crate::exclusions::{IgnorePolicy, IgnoreSet};
use crate::patterns::FilePatterns;

use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// File name looked up in the working directory when no config is given
pub const CONFIG_FILE_NAME: &str = "tooling.toml";

// Embed the default configuration directly in the binary at compile time
const DEFAULT_TOOLING_TOML: &str = include_str!("../tooling.toml");

const DEFAULT_BATCH_SIZE: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    #[serde(default = "default_build_dir")]
    build_dir: PathBuf,
    projects: Vec<PathBuf>,
    #[serde(default)]
    patterns: FilePatterns,
    formatter: RawTool,
    build_formatter: RawTool,
    analyzer: RawAnalyzer,
    #[serde(default)]
    ignore: RawIgnore,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTool {
    name: String,
    #[serde(default)]
    flags: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnalyzer {
    name: String,
    #[serde(default)]
    flags: String,
    #[serde(default)]
    mode: AnalyzerMode,
    #[serde(default = "default_batch_size")]
    batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum AnalyzerMode {
    #[default]
    Batch,
    PerFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIgnore {
    #[serde(default)]
    format: RawIgnoreSet,
    #[serde(default)]
    analyze: RawIgnoreSet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIgnoreSet {
    #[serde(default)]
    files: Vec<PathBuf>,
    #[serde(default)]
    dirs: Vec<PathBuf>,
}

/// How many files a tool receives per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One invocation per file
    PerFile,
    /// Up to this many files per invocation
    Batch(usize),
}

/// An external executable with its fully expanded arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub name: String,
    pub args: Vec<String>,
    pub mode: DispatchMode,
}

/// Resolved, immutable configuration for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory the config was loaded from; relative paths resolve here
    pub root: PathBuf,
    pub build_dir: PathBuf,
    pub projects: Vec<PathBuf>,
    pub patterns: FilePatterns,
    pub formatter: Tool,
    pub build_formatter: Tool,
    pub analyzer: Tool,
    pub ignore: IgnorePolicy,
}

impl Settings {
    /// Load from `path`, or from `./tooling.toml`, or fall back to the
    /// embedded defaults rooted at the current directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let cwd = current_dir()?;
        let local = cwd.join(CONFIG_FILE_NAME);
        if local.is_file() {
            Self::from_file(&local)
        } else {
            Self::from_toml(DEFAULT_TOOLING_TOML, &cwd, Path::new("<default tooling.toml>"))
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ToolingError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let path = fs::canonicalize(path).map_err(|source| ToolingError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let root = match path.parent() {
            Some(parent) => parent.to_path_buf(),
            None => current_dir()?,
        };

        Self::from_toml(&text, &root, &path)
    }

    /// Parse and resolve `text` with relative paths anchored at `root`.
    /// `origin` only names the source in error messages.
    pub fn from_toml(text: &str, root: &Path, origin: &Path) -> Result<Self> {
        let raw: RawSettings = toml::from_str(text).map_err(|source| ToolingError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::resolve(raw, root)
    }

    fn resolve(raw: RawSettings, root: &Path) -> Result<Self> {
        let root = fs::canonicalize(root)
            .map_err(|_| ToolingError::MissingProjectRoot(root.to_path_buf()))?;

        if raw.projects.is_empty() {
            return Err(ToolingError::InvalidConfig(
                "at least one project must be listed in `projects`".to_string(),
            ));
        }
        if raw.patterns.is_empty() {
            return Err(ToolingError::InvalidConfig(
                "`patterns` must contain at least one pattern".to_string(),
            ));
        }
        let invalid = raw.patterns.invalid_patterns();
        if !invalid.is_empty() {
            return Err(ToolingError::InvalidConfig(format!(
                "unsupported file patterns: {}",
                invalid.join(", ")
            )));
        }

        let build_dir = resolve_existing(&root, &raw.build_dir);

        let mut projects = Vec::with_capacity(raw.projects.len());
        for project in &raw.projects {
            let path = anchor(&root, project);
            if !path.is_dir() {
                return Err(ToolingError::MissingProjectRoot(path));
            }
            let path = fs::canonicalize(&path).map_err(|_| ToolingError::MissingProjectRoot(path))?;
            projects.push(path);
        }

        let expand = |flags: &str| expand_flags(flags, &root, &build_dir);

        let formatter = Tool {
            name: non_empty_name("formatter", raw.formatter.name)?,
            args: expand(&raw.formatter.flags)?,
            mode: DispatchMode::PerFile,
        };
        let build_formatter = Tool {
            name: non_empty_name("build_formatter", raw.build_formatter.name)?,
            args: expand(&raw.build_formatter.flags)?,
            mode: DispatchMode::PerFile,
        };
        let analyzer = Tool {
            name: non_empty_name("analyzer", raw.analyzer.name)?,
            args: expand(&raw.analyzer.flags)?,
            mode: match raw.analyzer.mode {
                AnalyzerMode::PerFile => DispatchMode::PerFile,
                AnalyzerMode::Batch if raw.analyzer.batch_size == 0 => {
                    return Err(ToolingError::InvalidConfig(
                        "`analyzer.batch_size` must be at least 1".to_string(),
                    ))
                }
                AnalyzerMode::Batch => DispatchMode::Batch(raw.analyzer.batch_size),
            },
        };

        let ignore = IgnorePolicy::new(
            ignore_set(&root, raw.ignore.format),
            ignore_set(&root, raw.ignore.analyze),
        );

        Ok(Settings {
            root,
            build_dir,
            projects,
            patterns: raw.patterns,
            formatter,
            build_formatter,
            analyzer,
            ignore,
        })
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|source| ToolingError::ConfigRead {
        path: PathBuf::from("."),
        source,
    })
}

fn non_empty_name(section: &str, name: String) -> Result<String> {
    if name.trim().is_empty() {
        Err(ToolingError::InvalidConfig(format!(
            "`{}.name` must not be empty",
            section
        )))
    } else {
        Ok(name)
    }
}

/// Substitute `{root}` and `{build_dir}`, then split with shell quoting rules
fn expand_flags(flags: &str, root: &Path, build_dir: &Path) -> Result<Vec<String>> {
    let expanded = flags
        .replace("{root}", &shell_words::quote(&root.to_string_lossy()))
        .replace("{build_dir}", &shell_words::quote(&build_dir.to_string_lossy()));

    shell_words::split(&expanded)
        .map_err(|e| ToolingError::InvalidConfig(format!("cannot split flags `{}`: {}", flags, e)))
}

fn ignore_set(root: &Path, raw: RawIgnoreSet) -> IgnoreSet {
    IgnoreSet::new(
        raw.files.iter().map(|p| resolve_existing(root, p)),
        raw.dirs.iter().map(|p| resolve_existing(root, p)),
    )
}

/// Anchor at `root` and canonicalize the parent directory when it exists,
/// keeping the final name as written. Walked paths are a canonical project
/// root plus unresolved names, so a listed symlink must stay the link itself.
fn resolve_existing(root: &Path, path: &Path) -> PathBuf {
    let anchored = anchor(root, path);
    let (Some(parent), Some(name)) = (anchored.parent(), anchored.file_name()) else {
        return anchored;
    };
    match fs::canonicalize(parent) {
        Ok(parent) => parent.join(name),
        Err(_) => anchored,
    }
}

/// Join a relative path onto `root` and drop `.`/`..` components lexically
fn anchor(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
