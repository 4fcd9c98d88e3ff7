use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PREFIX: &str = "gitship-";

/// Ephemeral directory holding the clone
///
/// Removed by [`WorkDir::close`] on the normal path and by `Drop` on any
/// early return or panic. A directory that is already gone is not an error.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create the directory under `root`, or under the system temp dir
    pub fn create(root: Option<&Path>) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        tracing::debug!("Working directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory, logging instead of failing
    pub fn close(self) {
        let path: PathBuf = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!("Removed working directory {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Working directory {} already gone", path.display())
            }
            Err(e) => tracing::warn!(
                "Failed to remove working directory {}: {}",
                path.display(),
                e
            ),
        }
    }
}
