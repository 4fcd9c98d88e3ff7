use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Dockerfile not found under: {0}")]
    DockerfileNotFound(PathBuf),

    #[error("Build context directory not found: {0}")]
    ContextNotFound(PathBuf),

    #[error("Docker connection error: {0}")]
    DockerConnection(#[from] bollard::errors::Error),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Registry authentication failed for {registry}: {message}")]
    AuthFailed { registry: String, message: String },

    #[error("Invalid image tag: {tag}")]
    InvalidTag { tag: String },

    #[error("Invalid build configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Human readable message with a hint on how to fix the problem.
    pub fn user_message(&self) -> String {
        match self {
            BuildError::DockerfileNotFound(path) => {
                format!(
                    "No Dockerfile found in the cloned repository: {}\n\
                     \n\
                     Make sure the repository contains a file named `Dockerfile`\n\
                     (any letter case) somewhere in its tree.",
                    path.display()
                )
            }
            BuildError::DockerConnection(e) => {
                format!(
                    "Could not talk to the Docker engine: {}\n\
                     \n\
                     Check that Docker is running and that DOCKER_HOST (if set)\n\
                     points at a reachable engine.",
                    e
                )
            }
            BuildError::BuildFailed(msg) => {
                format!(
                    "Image build failed: {}\n\
                     \n\
                     Check the Dockerfile of the source repository.",
                    msg
                )
            }
            BuildError::AuthFailed { registry, message } => {
                format!(
                    "Could not authenticate against {}: {}\n\
                     \n\
                     Check the AWS credentials available to this process.",
                    registry, message
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
