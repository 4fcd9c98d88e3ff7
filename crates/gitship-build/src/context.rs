use crate::error::{BuildError, BuildResult};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::{Component, Path};
use tar::Builder;
use walkdir::WalkDir;

const MAX_CONTEXT_SIZE: usize = 500 * 1024 * 1024; // 500MB

pub struct ContextBuilder;

impl ContextBuilder {
    /// Archive the build context directory as tar.gz
    ///
    /// The `.git` directory of the clone is left out; everything else is
    /// sent to the engine as-is.
    pub fn create_context(context_path: &Path) -> BuildResult<Vec<u8>> {
        if !context_path.is_dir() {
            return Err(BuildError::ContextNotFound(context_path.to_path_buf()));
        }

        tracing::debug!("Creating build context from: {}", context_path.display());

        let mut archive_data = Vec::new();
        {
            let encoder = GzEncoder::new(&mut archive_data, Compression::default());
            let mut tar = Builder::new(encoder);
            tar.follow_symlinks(false);

            let walker = WalkDir::new(context_path)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !(e.depth() > 0 && e.file_name() == ".git"));

            for entry in walker {
                let entry = entry.map_err(std::io::Error::from)?;
                if entry.depth() == 0 {
                    continue;
                }

                let rel = entry.path().strip_prefix(context_path).map_err(|e| {
                    BuildError::InvalidConfig(format!(
                        "{} is outside of the build context: {}",
                        entry.path().display(),
                        e
                    ))
                })?;
                tar.append_path_with_name(entry.path(), rel)?;
            }

            tar.into_inner()?.finish()?;
        }

        tracing::debug!("Build context created: {} bytes", archive_data.len());
        Self::check_context_size(archive_data.len());

        Ok(archive_data)
    }

    /// Dockerfile path relative to the context, in the `/` separated form the
    /// engine expects.
    pub fn relative_dockerfile(context_path: &Path, dockerfile_path: &Path) -> BuildResult<String> {
        let rel = dockerfile_path.strip_prefix(context_path).map_err(|_| {
            BuildError::InvalidConfig(format!(
                "Dockerfile {} is not inside the build context {}",
                dockerfile_path.display(),
                context_path.display()
            ))
        })?;

        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => {
                    return Err(BuildError::InvalidConfig(format!(
                        "Unsupported Dockerfile path: {}",
                        rel.display()
                    )));
                }
            }
        }

        if parts.is_empty() {
            return Err(BuildError::InvalidConfig(format!(
                "Dockerfile path points at the context itself: {}",
                dockerfile_path.display()
            )));
        }

        Ok(parts.join("/"))
    }

    fn check_context_size(size: usize) {
        if size > MAX_CONTEXT_SIZE {
            tracing::warn!(
                "Build context is very large ({}MB); consider trimming the repository",
                size / 1024 / 1024
            );
        }
    }
}
