use crate::fetcher::FetchError;
use gitship_build::BuildError;
use gitship_registry::RegistryError;
use std::path::PathBuf;
use thiserror::Error;

/// Any failure that ends a run
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("failed to create the working directory: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to write the result to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkflowError {
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Build(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
