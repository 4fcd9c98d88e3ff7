//! Dockerfile discovery
//!
//! Walks a cloned repository and picks the Dockerfile to build.

use crate::error::BuildResult;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const DOCKERFILE_NAME: &str = "dockerfile";

pub struct DockerfileLocator {
    root: PathBuf,
}

impl DockerfileLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the first file named `Dockerfile` (any letter case) under the root.
    ///
    /// Walk order:
    /// - files of a directory are visited before its subdirectories
    /// - siblings are visited in lexicographic order of their file name
    /// - the `.git` directory is skipped
    /// - a symlink counts when it resolves to a regular file; symlinked
    ///   directories are not descended into
    ///
    /// A Dockerfile closer to the root therefore always wins. Returns
    /// `Ok(None)` when the tree holds no Dockerfile at all.
    pub fn locate(&self) -> BuildResult<Option<PathBuf>> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|entry| !is_git_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                std::io::Error::other(format!("failed to walk {}: {}", self.root.display(), e))
            })?;

            if is_regular_file(&entry) && is_dockerfile(entry.path()) {
                tracing::debug!("Found Dockerfile at: {}", entry.path().display());
                return Ok(Some(entry.into_path()));
            }
        }

        tracing::debug!("No Dockerfile under: {}", self.root.display());
        Ok(None)
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn is_git_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == ".git"
}

fn is_dockerfile(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(DOCKERFILE_NAME))
}
