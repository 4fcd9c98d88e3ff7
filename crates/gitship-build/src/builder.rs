use crate::context::ContextBuilder;
use crate::error::{BuildError, BuildResult};
use crate::progress::BuildProgress;
use crate::reference::ImageReference;
use bollard::Docker;
use bollard::image::BuildImageOptions;
use futures_util::stream::StreamExt;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Number of build output lines kept for the error report
const LOG_TAIL_LINES: usize = 40;

/// Everything the engine needs to build one image
///
/// Fixed before the build starts; the Dockerfile is stored relative to the
/// context directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpec {
    context: PathBuf,
    dockerfile: String,
    image: ImageReference,
}

impl BuildSpec {
    pub fn new(context: &Path, dockerfile_path: &Path, image: ImageReference) -> BuildResult<Self> {
        let dockerfile = ContextBuilder::relative_dockerfile(context, dockerfile_path)?;
        Ok(Self {
            context: context.to_path_buf(),
            dockerfile,
            image,
        })
    }

    pub fn context(&self) -> &Path {
        &self.context
    }

    pub fn dockerfile(&self) -> &str {
        &self.dockerfile
    }

    pub fn image(&self) -> &ImageReference {
        &self.image
    }
}

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltImage {
    pub reference: ImageReference,
    /// Image ID reported by the engine, when it sent one
    pub id: Option<String>,
}

pub struct ImageBuilder {
    docker: Docker,
}

impl ImageBuilder {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Build the image described by `spec`
    ///
    /// Base images are always pulled and intermediate containers are removed,
    /// whether the build succeeds or not.
    pub async fn build_image(&self, spec: &BuildSpec) -> BuildResult<BuiltImage> {
        let full_tag = spec.image().full_tag();
        tracing::info!(
            "Building image {} (Dockerfile={})",
            full_tag,
            spec.dockerfile()
        );

        let context_data = ContextBuilder::create_context(spec.context())?;

        #[allow(deprecated)]
        let options = BuildImageOptions {
            dockerfile: spec.dockerfile(),
            t: full_tag.as_str(),
            rm: true,
            forcerm: true,
            pull: true,
            ..Default::default()
        };
        tracing::debug!("Build options: {:?}", options);

        use bytes::Bytes;
        use http_body_util::{Either, Full};
        let body = Full::new(Bytes::from(context_data));
        #[allow(deprecated)]
        let mut stream = self
            .docker
            .build_image(options, None, Some(Either::Left(body)));

        let progress = BuildProgress::new(&full_tag);
        let mut log = BuildLog::default();
        let mut image_id = None;

        while let Some(msg) = stream.next().await {
            let result = match msg {
                Ok(output) => log.handle(output, &progress).map(|id| {
                    if id.is_some() {
                        image_id = id;
                    }
                }),
                Err(bollard::errors::Error::DockerStreamError { error }) => {
                    Err(BuildError::BuildFailed(error))
                }
                Err(e) => Err(BuildError::DockerConnection(e)),
            };

            if let Err(e) = result {
                progress.finish_error(&e.to_string());
                return Err(log.attach(e));
            }
        }

        progress.finish_success();
        tracing::info!("Successfully built: {}", full_tag);

        Ok(BuiltImage {
            reference: spec.image().clone(),
            id: image_id,
        })
    }
}

/// Tail of the build output, attached to build errors
#[derive(Default)]
struct BuildLog {
    lines: VecDeque<String>,
}

impl BuildLog {
    fn push(&mut self, line: &str) {
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        if self.lines.len() == LOG_TAIL_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    /// Process one streamed build message; returns the image ID if the
    /// message carried one.
    fn handle(
        &mut self,
        output: bollard::models::BuildInfo,
        progress: &BuildProgress,
    ) -> BuildResult<Option<String>> {
        if let Some(stream) = &output.stream {
            for line in stream.lines() {
                tracing::debug!("{}", line);
                progress.set_step(line);
                self.push(line);
            }
        }

        if let Some(error) = output.error {
            return Err(BuildError::BuildFailed(error));
        }

        if let Some(error_detail) = output.error_detail {
            let error_msg = error_detail
                .message
                .unwrap_or_else(|| "Unknown build error".to_string());
            return Err(BuildError::BuildFailed(error_msg));
        }

        if let Some(status) = &output.status {
            tracing::debug!("{}", status);
            self.push(status);
        }

        Ok(output.aux.and_then(|aux| aux.id))
    }

    fn attach(&self, error: BuildError) -> BuildError {
        match error {
            BuildError::BuildFailed(message) if !self.lines.is_empty() => {
                let tail: Vec<&str> = self.lines.iter().map(String::as_str).collect();
                BuildError::BuildFailed(format!(
                    "{}\n--- build log (last {} lines) ---\n{}",
                    message,
                    tail.len(),
                    tail.join("\n")
                ))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn image() -> ImageReference {
        ImageReference::new("public.ecr.aws/alias/demo-app", "v1").unwrap()
    }

    #[test]
    fn test_build_spec_relative_dockerfile() {
        let temp_dir = tempdir().unwrap();
        let dockerfile = temp_dir.path().join("docker").join("Dockerfile");

        let spec = BuildSpec::new(temp_dir.path(), &dockerfile, image()).unwrap();
        assert_eq!(spec.dockerfile(), "docker/Dockerfile");
        assert_eq!(spec.context(), temp_dir.path());
        assert_eq!(spec.image().full_tag(), "public.ecr.aws/alias/demo-app:v1");
    }

    #[test]
    fn test_build_spec_rejects_outside_dockerfile() {
        let context = tempdir().unwrap();
        let other = tempdir().unwrap();

        let result = BuildSpec::new(context.path(), &other.path().join("Dockerfile"), image());
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }

    #[test]
    fn test_build_log_keeps_tail() {
        let mut log = BuildLog::default();
        for i in 0..(LOG_TAIL_LINES + 5) {
            log.push(&format!("line {i}"));
        }
        assert_eq!(log.lines.len(), LOG_TAIL_LINES);
        assert_eq!(log.lines.front().map(String::as_str), Some("line 5"));

        let err = log.attach(BuildError::BuildFailed("boom".to_string()));
        let message = err.to_string();
        assert!(message.contains("boom"));
        assert!(message.contains(&format!("line {}", LOG_TAIL_LINES + 4)));
    }

    #[test]
    fn test_build_log_reports_stream_error() {
        let progress = BuildProgress::new("test");
        let mut log = BuildLog::default();

        let ok = bollard::models::BuildInfo {
            stream: Some("Step 1/2 : FROM alpine\n".to_string()),
            ..Default::default()
        };
        assert!(log.handle(ok, &progress).unwrap().is_none());

        let failed = bollard::models::BuildInfo {
            error: Some("The command '/bin/sh -c false' returned a non-zero code: 1".to_string()),
            ..Default::default()
        };
        let err = log.handle(failed, &progress).unwrap_err();
        assert!(matches!(err, BuildError::BuildFailed(_)));

        let err = log.attach(err).to_string();
        assert!(err.contains("Step 1/2 : FROM alpine"));
        progress.finish_success();
    }

    #[tokio::test]
    #[ignore] // requires a running Docker engine
    async fn test_build_simple_image() {
        let docker = Docker::connect_with_local_defaults().unwrap();
        let builder = ImageBuilder::new(docker);

        let temp_dir = tempdir().unwrap();
        let dockerfile = temp_dir.path().join("Dockerfile");
        fs::write(&dockerfile, "FROM alpine:latest\nCMD echo 'test'").unwrap();

        let image = ImageReference::new("gitship-test", "latest").unwrap();
        let spec = BuildSpec::new(temp_dir.path(), &dockerfile, image).unwrap();

        let built = builder.build_image(&spec).await.unwrap();
        assert_eq!(built.reference.full_tag(), "gitship-test:latest");
        assert!(
            builder
                .docker
                .inspect_image("gitship-test:latest")
                .await
                .is_ok()
        );

        builder
            .docker
            .remove_image(
                "gitship-test:latest",
                None::<bollard::query_parameters::RemoveImageOptions>,
                None,
            )
            .await
            .ok();
    }
}
