//! Container engine abstraction

use crate::auth::RegistryCredentials;
use crate::builder::{BuildSpec, BuiltImage, ImageBuilder};
use crate::error::BuildResult;
use crate::pusher::ImagePusher;
use crate::reference::ImageReference;
use async_trait::async_trait;
use bollard::Docker;

/// Build and push operations the workflow needs from a container engine
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Check that the engine answers before any work is started.
    async fn ping(&self) -> BuildResult<()> {
        Ok(())
    }

    /// Build the image described by `spec`, tagged with its destination
    /// reference.
    async fn build(&self, spec: &BuildSpec) -> BuildResult<BuiltImage>;

    /// Push `image` to its registry.
    async fn push(
        &self,
        image: &ImageReference,
        credentials: &RegistryCredentials,
    ) -> BuildResult<()>;
}

/// Docker Engine API backed implementation
pub struct DockerEngine {
    docker: Docker,
    builder: ImageBuilder,
    pusher: ImagePusher,
}

impl DockerEngine {
    pub fn new(docker: Docker) -> Self {
        Self {
            builder: ImageBuilder::new(docker.clone()),
            pusher: ImagePusher::new(docker.clone()),
            docker,
        }
    }

    /// Client for `DOCKER_HOST` or the local socket. Nothing is sent to
    /// the engine until the first call.
    pub fn connect() -> BuildResult<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self::new(docker))
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn ping(&self) -> BuildResult<()> {
        self.docker.ping().await?;
        tracing::debug!("Connected to Docker engine");
        Ok(())
    }

    async fn build(&self, spec: &BuildSpec) -> BuildResult<BuiltImage> {
        let built = self.builder.build_image(spec).await?;
        tracing::debug!("image id: {:?}", built.id);
        Ok(built)
    }

    async fn push(
        &self,
        image: &ImageReference,
        credentials: &RegistryCredentials,
    ) -> BuildResult<()> {
        self.pusher.push(image, credentials).await
    }
}
