//! Image push
//!
//! Pushes a built image to its registry and watches the status stream.

use crate::auth::RegistryCredentials;
use crate::error::{BuildError, BuildResult};
use crate::reference::ImageReference;
use bollard::Docker;
use bollard::models::PushImageInfo;
use futures_util::StreamExt;

pub struct ImagePusher {
    docker: Docker,
}

impl ImagePusher {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Push `image` using `credentials`
    ///
    /// Only the tag of the destination reference is pushed. The push counts
    /// as failed as soon as one streamed status entry carries an error, even
    /// when the engine call itself reports success; transport level errors
    /// of the call are logged and otherwise ignored.
    pub async fn push(
        &self,
        image: &ImageReference,
        credentials: &RegistryCredentials,
    ) -> BuildResult<()> {
        let full_image = image.full_tag();
        let (repository, tag) = push_target(image);

        tracing::info!("Pushing image {}", full_image);

        #[allow(deprecated)]
        let options = bollard::image::PushImageOptions::<String> { tag };

        #[allow(deprecated)]
        let mut stream = self.docker.push_image(
            &repository,
            Some(options),
            Some(credentials.to_docker_credentials()),
        );

        let mut monitor = PushMonitor::default();
        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => monitor.observe(&info)?,
                Err(bollard::errors::Error::DockerStreamError { error }) => {
                    return Err(BuildError::PushFailed { message: error });
                }
                Err(e) => {
                    tracing::warn!("Push call for {} reported: {}", full_image, e);
                }
            }
        }

        tracing::info!(
            "Pushed {} ({} layers pushed, {} already present)",
            full_image,
            monitor.pushed,
            monitor.existing
        );
        Ok(())
    }
}

/// Repository and tag handed to the engine's push call
///
/// Taken from the reference as is; the joined `repository:tag` string is
/// never parsed back, since an all-digit tag reads like a registry port.
pub fn push_target(image: &ImageReference) -> (String, String) {
    (image.repository().to_string(), image.tag().to_string())
}

/// Tracks the streamed push status entries
#[derive(Debug, Default)]
struct PushMonitor {
    last_status: String,
    pushed: usize,
    existing: usize,
}

impl PushMonitor {
    fn observe(&mut self, info: &PushImageInfo) -> BuildResult<()> {
        tracing::debug!("{:?}", info);

        if let Some(err) = &info.error {
            return Err(BuildError::PushFailed {
                message: err.clone(),
            });
        }

        if let Some(status) = &info.status {
            match status.as_str() {
                "Pushed" => self.pushed += 1,
                "Layer already exists" => self.existing += 1,
                "Preparing" | "Waiting" | "Pushing" => {}
                _ => {
                    if *status != self.last_status {
                        tracing::info!("{}", status);
                        self.last_status = status.clone();
                    }
                }
            }
        }

        Ok(())
    }
}
