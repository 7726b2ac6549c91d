//! Candidate file discovery across project roots.

use crate::error::{Result, ToolingError};
use crate::patterns::{FileKind, FilePatterns};

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

/// VCS internal directories that are never traversed
pub const VCS_INTERNALS: &[&str] = &[
    ".git", ".jj", ".svn", ".hg", ".bzr", "_darcs", ".pijul", "CVS", ".fossil",
];

/// A file matched by name under one of the project roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Project root the file was found under
    pub root: PathBuf,
    pub kind: FileKind,
}

/// Walks project roots and yields files matching the configured patterns
pub struct Scanner<'a> {
    roots: &'a [PathBuf],
    patterns: &'a FilePatterns,
    skip_dirs: Vec<PathBuf>,
}

impl<'a> Scanner<'a> {
    pub fn new(roots: &'a [PathBuf], patterns: &'a FilePatterns) -> Self {
        Self {
            roots,
            patterns,
            skip_dirs: Vec::new(),
        }
    }

    /// Never descend into `dir` (the build output directory, for instance)
    pub fn with_skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }

    /// Lazily enumerate candidates, root by root.
    ///
    /// Siblings come out sorted by file name. Overlapping roots yield the same
    /// file more than once.
    pub fn candidates(&self) -> impl Iterator<Item = Result<Candidate>> + 'a {
        let patterns = self.patterns;
        let skip_dirs = self.skip_dirs.clone();
        self.roots
            .iter()
            .flat_map(move |root| walk_root(root, patterns, skip_dirs.clone()))
    }

    /// Enumerate everything up front, failing on the first unreadable entry
    pub fn scan_all(&self) -> Result<Vec<Candidate>> {
        self.candidates().collect()
    }
}

fn walk_root<'p>(
    root: &'p Path,
    patterns: &'p FilePatterns,
    skip_dirs: Vec<PathBuf>,
) -> impl Iterator<Item = Result<Candidate>> + 'p {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        // Only the configured patterns decide what is a candidate
        .git_ignore(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }

            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if VCS_INTERNALS.contains(&name) {
                    return false;
                }
            }

            !skip_dirs.iter().any(|skip| path == skip)
        })
        .build();

    walker.filter_map(move |result| {
        let entry = match result {
            Ok(entry) => entry,
            Err(source) => {
                return Some(Err(ToolingError::Walk {
                    root: root.to_path_buf(),
                    source,
                }))
            }
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            return None;
        }
        let kind = patterns.classify(entry.path())?;

        // Symlinked files are candidates under their link path. Directory
        // links are never descended into.
        if file_type.is_symlink() {
            match entry.path().metadata() {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => return None,
                Err(err) => {
                    warn!("Skipping broken link {}: {}", entry.path().display(), err);
                    return None;
                }
            }
        } else if !file_type.is_file() {
            return None;
        }

        Some(Ok(Candidate {
            path: entry.into_path(),
            root: root.to_path_buf(),
            kind,
        }))
    })
}
