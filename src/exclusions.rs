//! Per-tool ignore rules and candidate classification.
//!
//! Each tool kind has its own pair of ignore sets: exact files, and whole
//! directories whose subtree is skipped. A file ignored for the formatter may
//! still be analyzed, and the other way around.

use crate::error::{Result, ToolingError};
use crate::scanner::Candidate;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which tool's ignore sets to consult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreKind {
    Format,
    Analyze,
}

impl fmt::Display for IgnoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreKind::Format => f.write_str("format"),
            IgnoreKind::Analyze => f.write_str("analyze"),
        }
    }
}

/// Exact files and directory subtrees excluded from one tool kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl IgnoreSet {
    pub fn new(
        files: impl IntoIterator<Item = PathBuf>,
        dirs: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            files: files.into_iter().collect(),
            dirs: dirs.into_iter().collect(),
        }
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn contains_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }
}

/// Why a file was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Listed as an ignored file
    File,
    /// Lives under this ignored directory
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Ignored(IgnoreReason),
}

impl Verdict {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Verdict::Ignored(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredFile {
    pub path: PathBuf,
    pub reason: IgnoreReason,
}

/// Candidates partitioned for one tool, both halves in enumeration order
#[derive(Debug, Default)]
pub struct Classification {
    pub accepted: Vec<PathBuf>,
    pub ignored: Vec<IgnoredFile>,
}

impl Classification {
    pub fn push(&mut self, path: PathBuf, verdict: Verdict) {
        match verdict {
            Verdict::Accepted => self.accepted.push(path),
            Verdict::Ignored(reason) => self.ignored.push(IgnoredFile { path, reason }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.ignored.is_empty()
    }
}

/// Ignore sets for both tool kinds
#[derive(Debug, Clone, Default)]
pub struct IgnorePolicy {
    format: IgnoreSet,
    analyze: IgnoreSet,
}

impl IgnorePolicy {
    pub fn new(format: IgnoreSet, analyze: IgnoreSet) -> Self {
        Self { format, analyze }
    }

    pub fn set(&self, kind: IgnoreKind) -> &IgnoreSet {
        match kind {
            IgnoreKind::Format => &self.format,
            IgnoreKind::Analyze => &self.analyze,
        }
    }

    /// Decide whether `path`, found under `root`, is ignored for `kind`.
    ///
    /// Exact file rules win. Otherwise every directory from the file's parent
    /// up to and including `root` is checked against the directory rules; the
    /// walk never goes above `root`.
    pub fn resolve(&self, path: &Path, root: &Path, kind: IgnoreKind) -> Result<Verdict> {
        let set = self.set(kind);

        if set.contains_file(path) {
            return Ok(Verdict::Ignored(IgnoreReason::File));
        }

        if path == root || !path.starts_with(root) {
            return Err(ToolingError::OutsideProjectRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            });
        }

        let mut current = path.parent();
        while let Some(dir) = current {
            if set.contains_dir(dir) {
                return Ok(Verdict::Ignored(IgnoreReason::Directory(dir.to_path_buf())));
            }
            if dir == root {
                break;
            }
            current = dir.parent();
        }

        Ok(Verdict::Accepted)
    }

    /// Classify every candidate exactly once for `kind`
    pub fn classify<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a Candidate>,
        kind: IgnoreKind,
    ) -> Result<Classification> {
        let mut classification = Classification::default();
        for candidate in candidates {
            let verdict = self.resolve(&candidate.path, &candidate.root, kind)?;
            classification.push(candidate.path.clone(), verdict);
        }
        Ok(classification)
    }
}
