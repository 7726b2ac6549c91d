//! File name patterns and file kind classification.

use serde::Deserialize;
use std::path::Path;

/// Kind of a candidate file, decided purely from its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Source,          // C/C++ translation units
    Header,          // C/C++ headers
    BuildDescriptor, // CMake lists and modules
}

impl FileKind {
    /// Sources and headers go to the C/C++ formatter and the analyzer
    pub fn is_cxx(self) -> bool {
        matches!(self, FileKind::Source | FileKind::Header)
    }
}

/// File name patterns per file kind, as configured in `[patterns]`.
///
/// A pattern is either an exact file name (`CMakeLists.txt`), a suffix
/// pattern (`*.cpp`), a prefix pattern (`test_*`) or a single-wildcard
/// pattern (`test_*.cpp`). Patterns only ever match the file name, never
/// the directories above it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilePatterns {
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,
    /// Defaults to `*.txt`, which also picks up plain text files that are
    /// not CMake lists.
    #[serde(default = "default_build")]
    pub build: Vec<String>,
}

fn default_sources() -> Vec<String> {
    vec!["*.cpp".to_string()]
}

fn default_headers() -> Vec<String> {
    vec!["*.hpp".to_string()]
}

fn default_build() -> Vec<String> {
    vec!["*.txt".to_string()]
}

impl Default for FilePatterns {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            headers: default_headers(),
            build: default_build(),
        }
    }
}

impl FilePatterns {
    /// Classify a path by its file name; `None` when no pattern matches
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let filename = path.file_name()?.to_string_lossy();

        let kinds = [
            (FileKind::Source, &self.sources),
            (FileKind::Header, &self.headers),
            (FileKind::BuildDescriptor, &self.build),
        ];

        kinds
            .into_iter()
            .find(|(_, patterns)| patterns.iter().any(|p| matches_component(&filename, p)))
            .map(|(kind, _)| kind)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.headers.is_empty() && self.build.is_empty()
    }

    /// Patterns that can never match anything we support
    pub fn invalid_patterns(&self) -> Vec<&str> {
        self.sources
            .iter()
            .chain(&self.headers)
            .chain(&self.build)
            .map(String::as_str)
            .filter(|p| p.is_empty() || p.contains('/') || p.matches('*').count() > 1)
            .collect()
    }
}

/// Match a single file name against a pattern with at most one wildcard
fn matches_component(component: &str, pattern: &str) -> bool {
    if pattern == component {
        return true;
    }

    if !pattern.contains('*') {
        return false;
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        // Suffix match like "*.cpp"
        return component.ends_with(suffix);
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        // Prefix match like "test_*"
        return component.starts_with(prefix);
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 2 {
        return component.len() >= parts[0].len() + parts[1].len()
            && component.starts_with(parts[0])
            && component.ends_with(parts[1]);
    }

    false
}
