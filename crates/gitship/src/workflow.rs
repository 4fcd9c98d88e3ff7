//! The clone → build → publish pipeline
//!
//! The configuration is checked and the engine pinged before anything is
//! cloned. Stages then run strictly one after the other:
//! CLONE → LOCATE → PROVISION → BUILD → AUTH+PUSH → WRITE_RESULT → CLEANUP.
//! The first failing stage ends the run; cleanup of the working directory
//! happens on every path.

use crate::config::Config;
use crate::error::{Result, WorkflowError};
use crate::fetcher;
use crate::output::{self, ImageRecord};
use crate::workdir::WorkDir;
use gitship_build::{
    BuildError, BuildSpec, ContainerEngine, DockerfileLocator, ImageReference,
    RegistryCredentials,
};
use gitship_registry::{RegistryApi, ensure_repository};
use std::path::Path;

pub struct Workflow<'a, R: ?Sized, E: ?Sized> {
    config: &'a Config,
    registry: &'a R,
    engine: &'a E,
}

impl<'a, R, E> Workflow<'a, R, E>
where
    R: RegistryApi + ?Sized,
    E: ContainerEngine + ?Sized,
{
    pub fn new(config: &'a Config, registry: &'a R, engine: &'a E) -> Self {
        Self {
            config,
            registry,
            engine,
        }
    }

    /// Run every stage and return the record that was written
    pub async fn run(&self) -> Result<ImageRecord> {
        self.config.validate()?;
        self.engine.ping().await?;

        let workdir =
            WorkDir::create(self.config.workdir_root.as_deref()).map_err(WorkflowError::WorkDir)?;
        let result = self.run_in(workdir.path()).await;
        workdir.close();

        result
    }

    async fn run_in(&self, dir: &Path) -> Result<ImageRecord> {
        fetcher::shallow_clone(&self.config.git_url, dir).await?;

        let dockerfile = DockerfileLocator::new(dir)
            .locate()?
            .ok_or_else(|| BuildError::DockerfileNotFound(dir.to_path_buf()))?;
        tracing::info!("Dockerfile found: {}", dockerfile.display());

        let repository_uri = ensure_repository(self.registry, &self.config.repo_name).await?;
        let image = ImageReference::new(repository_uri, self.config.tag.as_str())?;

        let spec = BuildSpec::new(dir, &dockerfile, image)?;
        self.engine.build(&spec).await?;

        self.publish(spec.image()).await?;

        let record = ImageRecord::new(spec.image());
        output::write_record(&self.config.output, &record).map_err(|source| {
            WorkflowError::Output {
                path: self.config.output.clone(),
                source,
            }
        })?;
        tracing::info!("Image pushed: {}", record.image);

        Ok(record)
    }

    async fn publish(&self, image: &ImageReference) -> Result<()> {
        let token = self.registry.authorization_token().await?;
        let credentials = RegistryCredentials::from_token(&token, &self.config.registry)?;
        tracing::info!("Logging in to {}", credentials.registry);

        self.engine.push(image, &credentials).await?;
        Ok(())
    }
}
